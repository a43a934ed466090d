// SPDX-License-Identifier: MIT

//! Errors surfaced by the shared resource store and the key provider.
//!
//! Both are external collaborators; their failures are propagated fatally
//! and never retried by this crate.

use thiserror::Error;

/// Errors that can occur while talking to a resource store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store backing file could not be read or written
    #[error("resource store i/o failure at '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The store snapshot on disk is not valid JSON for this schema
    #[error("corrupt resource store snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Errors that can occur while fetching public key material
#[derive(Debug, Error)]
pub enum KeyError {
    /// No public key exists for the requested system user
    #[error("no public key found for user '{user}'")]
    Missing { user: String },

    /// The key file exists but could not be read
    #[error("failed to read public key for user '{user}'")]
    Io {
        user: String,
        #[source]
        source: std::io::Error,
    },

    /// The key material does not look like `<type> <base64> [comment]`
    #[error("malformed public key material for user '{user}'")]
    Malformed { user: String },
}
