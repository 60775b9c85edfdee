use crate::error::{GitflowError, Result};
use std::fmt;

/// Semantic version representation (pre-release and build metadata are dropped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare `MAJOR.MINOR.PATCH[-pre][+meta]` string, such as the
    /// configured initial version
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = semver::Version::parse(input).map_err(|e| {
            GitflowError::version(format!("'{}' is not a semantic version: {}", input, e))
        })?;

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
        })
    }

    /// Parse a version out of a tag name, stripping every leading non-digit
    /// character first (`v1.2.3`, `rc/1.2.3`, `release-1.2.3`, `1.2.3`)
    pub fn from_tag(tag: &str) -> Result<Self> {
        let stripped = tag.trim_start_matches(|c: char| !c.is_ascii_digit());
        Self::parse(stripped).map_err(|_| {
            GitflowError::version(format!(
                "tag '{}' does not contain a MAJOR.MINOR.PATCH version",
                tag
            ))
        })
    }

    /// Resolve the version a bump starts from: the last tag when one exists,
    /// the configured initial version otherwise
    pub fn base(last_tag: Option<&str>, init_version: &str) -> Result<Self> {
        match last_tag {
            Some(tag) => Self::from_tag(tag),
            None => Self::parse(init_version),
        }
    }

    pub fn bump_patch(&self) -> Self {
        Version::new(self.major, self.minor, self.patch + 1)
    }

    pub fn bump_minor(&self) -> Self {
        Version::new(self.major, self.minor + 1, 0)
    }

    pub fn bump_major(&self) -> Self {
        Version::new(self.major + 1, 0, 0)
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => self.bump_major(),
            VersionBump::Minor => self.bump_minor(),
            VersionBump::Patch => self.bump_patch(),
        }
    }

    /// The `MAJOR.MINOR` release family this version belongs to
    pub fn family(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}
