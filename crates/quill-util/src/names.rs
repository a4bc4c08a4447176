//! Helpers for dotted module names and the file paths they come from.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// `text` without `prefix`, or `text` unchanged if it does not start with it.
pub fn strip_prefix<'a>(text: &'a str, prefix: &str) -> &'a str {
    text.strip_prefix(prefix).unwrap_or(text)
}

/// Joins a dotted `prefix` and a possibly relative dotted name.
///
/// Each leading dot of `relative_name` beyond the first goes up one level, so
/// `foo.bar.baz` + `..hello.world` is `foo.bar.hello.world`. Returns `None` if
/// the name has more leading dots than `prefix` has components.
pub fn absolute_name(prefix: &str, relative_name: &str) -> Option<String> {
    let path: Vec<&str> = if prefix.is_empty() {
        Vec::new()
    } else {
        prefix.split('.').collect()
    };
    let name = relative_name.trim_start_matches('.');
    let ndots = relative_name.len() - name.len();
    if ndots > path.len() {
        return None;
    }

    let keep = (path.len() + 1 - ndots).min(path.len());
    let mut out = String::with_capacity(prefix.len() + name.len() + 1);
    for part in &path[..keep] {
        out.push_str(part);
        out.push('.');
    }
    out.push_str(name);
    Some(out)
}

/// Converts a relative source path into a dotted module name, dropping the
/// extension and any `__init__` component.
pub fn path_to_module_name(filename: impl AsRef<Path>) -> String {
    let stem = filename.as_ref().with_extension("");
    let dotted = stem.to_string_lossy().replace(MAIN_SEPARATOR, ".");
    match dotted.find(".__init__") {
        Some(index) => dotted[..index].to_owned(),
        None => dotted,
    }
}

/// Whether `filename` is a package's `__init__` stub.
pub fn is_directory_init(filename: Option<&Path>) -> bool {
    filename
        .and_then(Path::file_stem)
        .is_some_and(|stem| stem == "__init__")
}

/// Package that a module belongs to; a package is its own package.
pub fn package_name(module_name: Option<&str>, is_package: bool) -> String {
    let Some(module_name) = module_name else {
        return String::new();
    };
    if is_package {
        return module_name.to_owned();
    }
    match module_name.rsplit_once('.') {
        Some((package, _)) => package.to_owned(),
        None => String::new(),
    }
}

/// `filename` with its extension replaced; `new_extension` may include the dot.
pub fn replace_extension(filename: impl AsRef<Path>, new_extension: &str) -> PathBuf {
    filename
        .as_ref()
        .with_extension(new_extension.trim_start_matches('.'))
}
