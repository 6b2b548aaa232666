//! Platform definitions
//!
//! The crawler tracks a fixed set of commerce platforms. Each platform is a
//! partition key: progress cursors, stored results, and export files are all
//! scoped to exactly one platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A commerce platform tracked by the crawler
///
/// Serializes as the lowercase keyword (the spelling config files use).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// PChome online shopping
    PChome,

    /// Momo online shopping
    Momo,
}

impl Platform {
    /// All known platforms, in scan order
    pub const ALL: [Platform; 2] = [Platform::PChome, Platform::Momo];

    /// Canonical spelling used in the database and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PChome => "PChome",
            Self::Momo => "Momo",
        }
    }

    /// Lowercase keyword used for queries, title matching, and export file names
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::PChome => "pchome",
            Self::Momo => "momo",
        }
    }

    /// Parses a platform from its database string representation
    ///
    /// Returns None if the string doesn't match any known platform.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "PChome" => Some(Self::PChome),
            "Momo" => Some(Self::Momo),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    /// Case-insensitive parse, accepting both the canonical spelling and the
    /// lowercase keyword. Used for config and CLI values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pchome" => Ok(Self::PChome),
            "momo" => Ok(Self::Momo),
            other => Err(format!(
                "unknown platform '{}' (expected one of: pchome, momo)",
                other
            )),
        }
    }
}
