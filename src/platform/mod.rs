// SPDX-License-Identifier: MIT

//! OS-family specific package naming and vendor repository sources.

pub mod packages;
pub mod repo;

use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

pub use packages::{packages_for, Package};
pub use repo::{repo_for, RepoSource};

/// OS families with a supported vendor repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Debian,
    RedHat,
}

impl FromStr for OsFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Debian" => Ok(OsFamily::Debian),
            "RedHat" => Ok(OsFamily::RedHat),
            other => Err(ConfigError::UnsupportedOsFamily {
                family: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Debian => write!(f, "Debian"),
            OsFamily::RedHat => write!(f, "RedHat"),
        }
    }
}
