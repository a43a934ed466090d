// SPDX-License-Identifier: MIT

mod config;
mod exchange;
mod node;

pub use config::ConfigError;
pub use exchange::{KeyError, StoreError};
pub use node::NodeError;
