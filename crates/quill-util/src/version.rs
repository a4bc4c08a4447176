use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::UsageError;

/// Oldest 3.x release that is accepted.
pub const MIN_SUPPORTED_V3: TargetVersion = TargetVersion::new(3, 4);
/// Newest release with an opcode mapping.
pub const MAX_SUPPORTED: TargetVersion = TargetVersion::new(3, 6);

/// A validated `<major>.<minor>` version of the analyzed language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetVersion {
    pub major: u32,
    pub minor: u32,
}

impl TargetVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_v2(self) -> bool {
        self.major == 2
    }

    pub fn is_v3(self) -> bool {
        self.major == 3
    }

    /// `subdir/2` for 2.x targets and `subdir/3` for everything else.
    pub fn versioned_path(self, subdir: impl AsRef<Path>) -> PathBuf {
        let leaf = if self.is_v2() { "2" } else { "3" };
        subdir.as_ref().join(leaf)
    }

    pub fn as_parts(self) -> [u32; 2] {
        [self.major, self.minor]
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for TargetVersion {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_version(&parse_version(s)?)
    }
}

/// Parses a dotted version string such as `2.7` into its numeric parts.
pub fn parse_version(version: &str) -> Result<Vec<u32>, UsageError> {
    version
        .trim()
        .split('.')
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| UsageError::new(format!("invalid version string: {version:?}")))
        })
        .collect()
}

pub fn format_version(parts: &[u32]) -> String {
    parts
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Checks that `parts` names a supported `<major>.<minor>` target.
pub fn validate_version(parts: &[u32]) -> Result<TargetVersion, UsageError> {
    let &[major, minor] = parts else {
        return Err(UsageError::new(format!(
            "target version must be <major>.<minor>: {:?}",
            format_version(parts)
        )));
    };
    let version = TargetVersion::new(major, minor);

    if TargetVersion::new(3, 0) <= version && version < MIN_SUPPORTED_V3 {
        // These releases have odd class-building conventions and are not worth
        // the extra handling.
        return Err(UsageError::new(format!(
            "versions 3.0 - 3.3 are not supported. Use {MIN_SUPPORTED_V3} and higher."
        )));
    }
    if version > MAX_SUPPORTED {
        return Err(UsageError::new(format!(
            "versions > {MAX_SUPPORTED} are not yet supported."
        )));
    }
    Ok(version)
}
