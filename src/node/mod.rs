// SPDX-License-Identifier: MIT

//! Per-role convergence passes.
//!
//! A pass is one full run for one node: synthesize what this node offers,
//! publish it to the shared store, collect what the node's groups offer back,
//! and report the state to realize locally. Passes are idempotent; a repeat
//! run against an unchanged config publishes nothing new.

mod catalog;
mod instance;


pub use catalog::{run_catalog_pass, CatalogReport};
pub use instance::{run_instance_pass, InstanceReport};

use crate::config::NodeConfig;
use crate::errors::{ConfigError, NodeError};
use crate::exchange::ResourceStore;
use crate::keys::KeyProvider;
use crate::platform::{packages_for, repo_for, OsFamily, Package, RepoSource};

/// Report from a pass of either role.
#[derive(Debug)]
pub enum NodeReport {
    Instance(InstanceReport),
    Catalog(CatalogReport),
}

/// Dispatch on the configured role.
pub fn run_pass(
    config: &NodeConfig,
    store: &mut dyn ResourceStore,
    keys: &dyn KeyProvider,
) -> Result<NodeReport, NodeError> {
    match config {
        NodeConfig::Instance(instance) => {
            Ok(NodeReport::Instance(run_instance_pass(instance, store, keys)?))
        }
        NodeConfig::Catalog(catalog) => {
            Ok(NodeReport::Catalog(run_catalog_pass(catalog, store, keys)?))
        }
    }
}

/// Packages and vendor repository for a node, when it opted into package
/// management by setting `os_family`.
pub(crate) fn platform_state(
    os_family: Option<&str>,
    os_release: Option<&str>,
    versions: &[String],
    ensure: Option<&str>,
    debug_symbols: bool,
) -> Result<(Vec<Package>, Option<RepoSource>), ConfigError> {
    let Some(family) = os_family else {
        return Ok((Vec::new(), None));
    };
    let family: OsFamily = family.parse()?;

    let mut packages = Vec::new();
    for version in versions {
        packages.extend(packages_for(family, version, ensure, debug_symbols));
    }

    let repo = match (family, os_release) {
        (OsFamily::Debian, None) => {
            // apt sources need the distribution codename
            tracing::warn!("os_release not set; skipping apt repository for Debian node");
            None
        }
        (_, release) => Some(repo_for(family, release.unwrap_or_default())),
    };

    Ok((packages, repo))
}
