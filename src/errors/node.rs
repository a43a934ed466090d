// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::{ConfigError, KeyError, StoreError};

/// Umbrella error for a convergence pass. A pass either produces a complete
/// report or fails with the first error encountered; there is no partial
/// success within a single run.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Key(#[from] KeyError),
}
