// SPDX-License-Identifier: MIT

//! The instance-side convergence pass.

use std::collections::BTreeMap;

use crate::command::{add_instance_command, backup_command, BinarySpec, CommandContext};
use crate::config::InstanceConfig;
use crate::errors::NodeError;
use crate::exchange::{
    group_tag, publish_all, realize_for_user, ExportedResource, PublishSummary, RealizedState,
    ResourceStore,
};
use crate::keys::{split_public_key, KeyProvider};
use crate::observability::messages::{
    JobsSynthesized, PassStarted, ResourcesCollected, ResourcesPublished, StateRealized,
};
use crate::platform::{Package, RepoSource};
use crate::resolver::{BackupParams, ResolveContext, ResolvedOptions};

/// What an instance pass decided: the publish outcome, the state to realize
/// locally, and the packages/repository to keep installed.
#[derive(Debug)]
pub struct InstanceReport {
    pub fqdn: String,
    pub publish: PublishSummary,
    pub realized: RealizedState,
    pub packages: Vec<Package>,
    pub repo: Option<RepoSource>,
}

/// One full run for an instance node.
///
/// Synthesizes a cron-job resource per (group, backup type) plus one
/// add-instance one-shot per group, publishes them alongside the instance's
/// public key, then collects each group's tag and realizes the catalog keys
/// aimed at this host's remote user.
pub fn run_instance_pass(
    config: &InstanceConfig,
    store: &mut dyn ResourceStore,
    keys: &dyn KeyProvider,
) -> Result<InstanceReport, NodeError> {
    tracing::info!(
        "{}",
        PassStarted {
            role: "instance",
            fqdn: &config.fqdn
        }
    );

    let binary = BinarySpec::for_instance(config)?;
    let ctx = CommandContext::for_instance(config);
    let resolve_ctx = ResolveContext {
        cluster: config.cluster(),
        backup_dir: config.backup_dir(),
    };
    let globals = config.global_params();
    let groups = config.target_groups();

    // one key resource per instance, fanned out as one tag per group
    let raw_key = keys.public_key(config.remote_user())?;
    let (key_type, key) = split_public_key(&raw_key, config.remote_user())?;
    let mut resources = vec![ExportedResource::instance_key(
        &config.fqdn,
        config.remote_user(),
        config.catalog_user(),
        &key_type,
        &key,
        &groups,
    )];

    for group in &groups {
        let jobs = config.backups.jobs_for(group);
        let job_count = jobs.map_or(0, |jobs| jobs.len());
        tracing::info!("{}", JobsSynthesized { group, job_count });

        if let Some(jobs) = jobs {
            for (backup_type, params) in jobs {
                let mut layers: Vec<&BackupParams> = vec![&globals];
                if let Some(group_params) = config.group_options.get(group) {
                    layers.push(group_params);
                }
                layers.push(params);

                let opts = ResolvedOptions::resolve(&layers, &resolve_ctx);
                let command = backup_command(&binary, &ctx, &opts, *backup_type);
                resources.push(ExportedResource::cron_job(
                    *backup_type,
                    &config.fqdn,
                    group,
                    config.catalog_user(),
                    command,
                    opts.schedule,
                ));
            }
        }

        resources.push(ExportedResource::add_instance(
            &config.fqdn,
            group,
            config.catalog_user(),
            add_instance_command(&binary, &ctx),
        ));
    }

    let publish = publish_all(store, resources)?;
    tracing::info!(
        "{}",
        ResourcesPublished {
            created: publish.created,
            replaced: publish.replaced,
            unchanged: publish.unchanged
        }
    );

    // collect each group's tag; a resource tagged for several of this
    // instance's groups must still realize once
    let mut collected: BTreeMap<String, ExportedResource> = BTreeMap::new();
    for group in &groups {
        let tag = group_tag(group);
        let resources = store.collect(&tag)?;
        tracing::debug!(
            "{}",
            ResourcesCollected {
                tag: &tag,
                count: resources.len()
            }
        );
        for resource in resources {
            collected.insert(resource.title.clone(), resource);
        }
    }
    let realized = realize_for_user(collected.into_values().collect(), config.remote_user());
    tracing::info!(
        "{}",
        StateRealized {
            user: config.remote_user(),
            authorized_keys: realized.authorized_keys.len(),
            cron_entries: realized.cron_entries.len(),
            one_shot_commands: realized.one_shot_commands.len()
        }
    );

    let versions: Vec<String> = config.version.iter().cloned().collect();
    let (packages, repo) = super::platform_state(
        config.os_family.as_deref(),
        config.os_release.as_deref(),
        &versions,
        config.package_ensure.as_deref(),
        config.debug_symbols.unwrap_or(true),
    )?;

    Ok(InstanceReport {
        fqdn: config.fqdn.clone(),
        publish,
        realized,
        packages,
        repo,
    })
}
