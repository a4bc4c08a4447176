mod fs;
mod props;
