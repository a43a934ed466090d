// SPDX-License-Identifier: MIT

mod loader;
mod validation;

pub mod consts;

pub use loader::{
    load_and_validate_config, load_config, parse_config, BackupType, Backups, CatalogConfig,
    InstanceConfig, NodeConfig, Role, Secret,
};
pub use validation::validate_config;
