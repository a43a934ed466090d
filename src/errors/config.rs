// SPDX-License-Identifier: MIT

//! Errors raised while loading or validating node configuration.
//!
//! Every variant is fatal for the current node run: a node never compiles a
//! partial catalog from a configuration it could not fully understand.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read from disk
    #[error("failed to read config file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML was malformed, contained an unknown option key, or held a
    /// value of the wrong type for a known key
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The OS family has no entry in the package capability table
    #[error("Unsupported managed repository for osfamily {family}")]
    UnsupportedOsFamily { family: String },

    /// An instance declares neither a server version nor a custom binary,
    /// so no pg_probackup invocation can be synthesized
    #[error("instance '{instance}' must set either 'version' or 'binary'")]
    MissingBinary { instance: String },

    /// An instance declares an explicit but empty host group list
    #[error("instance '{instance}' declares an empty host_groups list")]
    EmptyHostGroups { instance: String },

    /// A catalog group name resolved to the empty string
    #[error("group name must not be empty (node '{node}')")]
    EmptyGroupName { node: String },
}
