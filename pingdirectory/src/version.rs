//! PingDirectory product versions
//!
//! Resources differ between release lines, so the provider is told which
//! version it talks to. Versions are `major.minor.patch.build`; a
//! three-part version is padded with `.0`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

pub const PINGDIRECTORY_9100: ProductVersion = ProductVersion::new(9, 1, 0, 0);
pub const PINGDIRECTORY_9101: ProductVersion = ProductVersion::new(9, 1, 0, 1);
pub const PINGDIRECTORY_9102: ProductVersion = ProductVersion::new(9, 1, 0, 2);
pub const PINGDIRECTORY_9200: ProductVersion = ProductVersion::new(9, 2, 0, 0);
pub const PINGDIRECTORY_9201: ProductVersion = ProductVersion::new(9, 2, 0, 1);
pub const PINGDIRECTORY_9300: ProductVersion = ProductVersion::new(9, 3, 0, 0);

/// Oldest first
pub const SUPPORTED_VERSIONS: &[ProductVersion] = &[
    PINGDIRECTORY_9100,
    PINGDIRECTORY_9101,
    PINGDIRECTORY_9102,
    PINGDIRECTORY_9200,
    PINGDIRECTORY_9201,
    PINGDIRECTORY_9300,
];

#[derive(Debug, Error, PartialEq)]
pub enum VersionError {
    #[error("Invalid PingDirectory version '{0}', expected a version such as 9.3.0.0")]
    Invalid(String),

    #[error("PingDirectory version {version} is not supported. Supported versions: {supported}")]
    Unsupported { version: String, supported: String },
}

impl ProductVersion {
    pub const fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    pub fn at_least(&self, other: &ProductVersion) -> bool {
        self >= other
    }

    fn same_release_line(&self, other: &ProductVersion) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl FromStr for ProductVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::Invalid(s.to_string()))?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch, 0)),
            [major, minor, patch, build] => Ok(Self::new(*major, *minor, *patch, *build)),
            _ => Err(VersionError::Invalid(s.to_string())),
        }
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

pub fn compare(a: &ProductVersion, b: &ProductVersion) -> std::cmp::Ordering {
    a.cmp(b)
}

/// A version the provider can work with, plus a warning when the exact
/// version is unknown but its release line is supported
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVersion {
    pub version: ProductVersion,
    pub warning: Option<String>,
}

/// Map a configured version onto a supported one
///
/// An unknown patch on a supported release line is treated as the newest
/// known version of that line.
pub fn resolve(raw: &str) -> Result<ResolvedVersion, VersionError> {
    let version: ProductVersion = raw.parse()?;
    if SUPPORTED_VERSIONS.contains(&version) {
        return Ok(ResolvedVersion {
            version,
            warning: None,
        });
    }

    let newest_on_line = SUPPORTED_VERSIONS
        .iter()
        .rev()
        .find(|v| v.same_release_line(&version))
        .copied();

    match newest_on_line {
        Some(mapped) => Ok(ResolvedVersion {
            version: mapped,
            warning: Some(format!(
                "PingDirectory version {} is not recognized, assuming {}",
                version, mapped
            )),
        }),
        None => Err(VersionError::Unsupported {
            version: version.to_string(),
            supported: supported_versions_list(),
        }),
    }
}

fn supported_versions_list() -> String {
    SUPPORTED_VERSIONS
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
