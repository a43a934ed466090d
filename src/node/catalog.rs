// SPDX-License-Identifier: MIT

//! The catalog-side convergence pass.

use crate::config::CatalogConfig;
use crate::errors::NodeError;
use crate::exchange::{
    group_tag, publish_all, realize_for_user, ExportedResource, PublishSummary, RealizedState,
    ResourceStore,
};
use crate::keys::{split_public_key, KeyProvider};
use crate::observability::messages::{
    PassStarted, ResourcesCollected, ResourcesPublished, StateRealized,
};
use crate::platform::{Package, RepoSource};

/// What a catalog pass decided. The realized state carries the instances'
/// keys to authorize for the catalog user, the backup crons to install, and
/// the pending add-instance registrations.
#[derive(Debug)]
pub struct CatalogReport {
    pub fqdn: String,
    pub publish: PublishSummary,
    pub realized: RealizedState,
    pub packages: Vec<Package>,
    pub repo: Option<RepoSource>,
}

/// One full run for a catalog node.
///
/// Publishes the catalog's own key toward its group's instances, then
/// collects everything tagged for the group and realizes what targets the
/// catalog-owning user.
pub fn run_catalog_pass(
    config: &CatalogConfig,
    store: &mut dyn ResourceStore,
    keys: &dyn KeyProvider,
) -> Result<CatalogReport, NodeError> {
    tracing::info!(
        "{}",
        PassStarted {
            role: "catalog",
            fqdn: &config.fqdn
        }
    );

    let raw_key = keys.public_key(config.user())?;
    let (key_type, key) = split_public_key(&raw_key, config.user())?;
    let own_key = ExportedResource::catalog_key(
        &config.fqdn,
        config.group(),
        config.remote_user(),
        &key_type,
        &key,
    );

    let publish = publish_all(store, vec![own_key])?;
    tracing::info!(
        "{}",
        ResourcesPublished {
            created: publish.created,
            replaced: publish.replaced,
            unchanged: publish.unchanged
        }
    );

    let tag = group_tag(config.group());
    let collected = store.collect(&tag)?;
    tracing::debug!(
        "{}",
        ResourcesCollected {
            tag: &tag,
            count: collected.len()
        }
    );
    let realized = realize_for_user(collected, config.user());
    tracing::info!(
        "{}",
        StateRealized {
            user: config.user(),
            authorized_keys: realized.authorized_keys.len(),
            cron_entries: realized.cron_entries.len(),
            one_shot_commands: realized.one_shot_commands.len()
        }
    );

    let versions = config.versions.clone().unwrap_or_default();
    let (packages, repo) = super::platform_state(
        config.os_family.as_deref(),
        config.os_release.as_deref(),
        &versions,
        config.package_ensure.as_deref(),
        config.debug_symbols.unwrap_or(true),
    )?;

    Ok(CatalogReport {
        fqdn: config.fqdn.clone(),
        publish,
        realized,
        packages,
        repo,
    })
}
