//! Version types for schema compatibility.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CraftworkError, CraftworkResult};

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current crafting recipe file version.
    pub const CRAFTING_RECIPE: Self = Self::new(1, 0, 0);

    /// Current inventory snapshot version.
    pub const INVENTORY_SNAPSHOT: Self = Self::new(1, 0, 0);

    /// Checks if this version can read data from another version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }

    /// Parses a version string found in a file and checks it is readable.
    pub fn check_readable(&self, found: &str) -> CraftworkResult<Self> {
        let data_version: Self = found.parse()?;
        if !self.can_read(&data_version) {
            return Err(CraftworkError::VersionMismatch {
                expected: self.to_string(),
                actual: data_version.to_string(),
            });
        }
        Ok(data_version)
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = CraftworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CraftworkError::InvalidVersion(s.to_string());

        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u16, CraftworkError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u16>()
                .map_err(|_| invalid())
        };

        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}
