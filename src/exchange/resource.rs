// SPDX-License-Identifier: MIT

//! Exported resources: self-contained artifacts addressed across nodes.
//!
//! A node never addresses another node directly. It publishes resources
//! tagged with the group identity of the intended consumers; whoever carries
//! that group identity collects them on its own schedule. Titles are stable
//! and derived purely from (kind, producing identity, group), so republishing
//! the same content is a no-op and changed content replaces in place.

use serde::{Deserialize, Serialize};

use crate::command::CronSchedule;
use crate::config::consts::TAG_PREFIX;
use crate::config::BackupType;

/// The addressing tag for a catalog group: `pgprobackup-<group>`.
pub fn group_tag(group: &str) -> String {
    format!("{}-{}", TAG_PREFIX, group)
}

/// What a collected resource turns into on the consuming host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePayload {
    /// A public key to authorize for `user` on the consuming host
    AuthorizedKey {
        user: String,
        key_type: String,
        key: String,
    },
    /// A scheduled backup invocation run by `user`
    CronJob {
        user: String,
        command: String,
        schedule: CronSchedule,
    },
    /// A registration command run once by `user`
    OneShot { user: String, command: String },
}

/// One artifact in the shared resource store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedResource {
    pub title: String,
    pub tags: Vec<String>,
    pub payload: ResourcePayload,
}

impl ExportedResource {
    /// A backup cron job for one (instance, group, type):
    /// title `pgprobackup_<type>_<fqdn>-<group>`, tagged for the group.
    pub fn cron_job(
        backup_type: BackupType,
        fqdn: &str,
        group: &str,
        user: &str,
        command: String,
        schedule: CronSchedule,
    ) -> Self {
        ExportedResource {
            title: format!("{}_{}_{}-{}", TAG_PREFIX, backup_type.lower(), fqdn, group),
            tags: vec![group_tag(group)],
            payload: ResourcePayload::CronJob {
                user: user.to_string(),
                command,
                schedule,
            },
        }
    }

    /// The one-shot catalog registration for one (instance, group):
    /// title `pgprobackup_add_instance_<fqdn>-<group>`.
    pub fn add_instance(fqdn: &str, group: &str, user: &str, command: String) -> Self {
        ExportedResource {
            title: format!("{}_add_instance_{}-{}", TAG_PREFIX, fqdn, group),
            tags: vec![group_tag(group)],
            payload: ResourcePayload::OneShot {
                user: user.to_string(),
                command,
            },
        }
    }

    /// An instance's public key, fanned out to every destination group with
    /// one tag per group rather than one copy per group. Title `<user>-<fqdn>`
    /// (keyed on the producing account, not the group, so exactly one key
    /// resource exists per instance).
    pub fn instance_key(
        fqdn: &str,
        producing_user: &str,
        authorize_for: &str,
        key_type: &str,
        key: &str,
        groups: &[String],
    ) -> Self {
        ExportedResource {
            title: format!("{}-{}", producing_user, fqdn),
            tags: groups.iter().map(|group| group_tag(group)).collect(),
            payload: ResourcePayload::AuthorizedKey {
                user: authorize_for.to_string(),
                key_type: key_type.to_string(),
                key: key.to_string(),
            },
        }
    }

    /// A catalog's own public key, published back toward its instances:
    /// title `pgprobackup-<catalog-fqdn>`, tagged with the catalog's group.
    pub fn catalog_key(
        fqdn: &str,
        group: &str,
        authorize_for: &str,
        key_type: &str,
        key: &str,
    ) -> Self {
        ExportedResource {
            title: format!("{}-{}", TAG_PREFIX, fqdn),
            tags: vec![group_tag(group)],
            payload: ResourcePayload::AuthorizedKey {
                user: authorize_for.to_string(),
                key_type: key_type.to_string(),
                key: key.to_string(),
            },
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CronField;

    #[test]
    fn cron_title_and_tag_shape() {
        let schedule = CronSchedule::with_defaults(None, None, None, None);
        let resource = ExportedResource::cron_job(
            BackupType::DELTA,
            "psql.localhost",
            "common",
            "pgbackup",
            "true".to_string(),
            schedule,
        );

        assert_eq!(resource.title, "pgprobackup_delta_psql.localhost-common");
        assert_eq!(resource.tags, vec!["pgprobackup-common".to_string()]);
        assert!(resource.has_tag("pgprobackup-common"));
        assert!(!resource.has_tag("pgprobackup-b01"));
    }

    #[test]
    fn key_fans_out_with_tags_not_copies() {
        let groups = vec!["b01".to_string(), "b02".to_string()];
        let resource = ExportedResource::instance_key(
            "psql.localhost",
            "postgres",
            "pgbackup",
            "ssh-rsa",
            "AAABBBCCC",
            &groups,
        );

        assert_eq!(resource.title, "postgres-psql.localhost");
        assert_eq!(
            resource.tags,
            vec!["pgprobackup-b01".to_string(), "pgprobackup-b02".to_string()]
        );
    }

    #[test]
    fn add_instance_title_uses_the_verb() {
        let resource = ExportedResource::add_instance(
            "psql.localhost",
            "b01",
            "pgbackup",
            "true".to_string(),
        );
        assert_eq!(resource.title, "pgprobackup_add_instance_psql.localhost-b01");
    }

    #[test]
    fn identical_inputs_yield_identical_resources() {
        let schedule = CronSchedule::with_defaults(Some(CronField::Number(1)), None, None, None);
        let build = || {
            ExportedResource::cron_job(
                BackupType::FULL,
                "psql.localhost",
                "common",
                "pgbackup",
                "cmd".to_string(),
                schedule.clone(),
            )
        };
        assert_eq!(build(), build());
    }
}
