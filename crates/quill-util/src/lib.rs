//! Small helpers shared by Quill's front end and test fixtures: target
//! versions, dotted module names, formatting, and scratch directories.

mod collections;
mod error;
mod fs;
mod names;
mod pretty;
mod tempdir;
mod text;
mod version;

pub use collections::{concat_slices, invert_map, slice_starts_with, strip_slice_prefix};
pub use error::{UsageError, UtilError};
pub use fs::{list_files, load_data_file, with_current_dir, CurrentDirGuard};
pub use names::{
    absolute_name, is_directory_init, package_name, path_to_module_name, replace_extension,
    strip_prefix,
};
pub use pretty::{pretty_conjunction, pretty_dnf};
pub use tempdir::Tempdir;
pub use text::{dedent, maybe_truncate, numeric_sort_key, SortKeyPart};
pub use version::{
    format_version, parse_version, validate_version, TargetVersion, MAX_SUPPORTED,
    MIN_SUPPORTED_V3,
};
