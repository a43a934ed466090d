// SPDX-License-Identifier: MIT

//! Precedence resolution of backup option layers.
//!
//! Four layers feed a resolution, in increasing precedence: built-in
//! defaults, instance-level globals, per-group options, per-job options.
//! The result is total: every field of [`ResolvedOptions`] has a defined
//! value, so command synthesis downstream never has to guess.

use crate::command::CronSchedule;
use crate::config::consts::DEFAULT_LOG_LEVEL_FILE;
use crate::resolver::BackupParams;

/// Instance-scoped values the resolver needs to fill documented defaults
/// (the default log file name is derived from the cluster, the default log
/// directory from the backup directory).
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub cluster: &'a str,
    pub backup_dir: &'a str,
}

/// The flattened, fully-determined option set for one backup job.
///
/// Tri-state booleans collapse here to their documented defaults:
/// `stream` and `validate` default on, `temp_slot`, `merge_expired` and
/// `redirect_console` default off, `delete_expired` defaults on (it only
/// matters once a retention value is configured).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub schedule: CronSchedule,

    pub retention_redundancy: Option<u32>,
    pub retention_window: Option<u32>,
    pub delete_expired: bool,
    pub merge_expired: bool,

    pub compress_algorithm: Option<String>,
    pub compress_level: Option<u32>,

    pub threads: Option<u32>,

    pub temp_slot: bool,
    pub slot: Option<String>,

    pub validate: bool,
    pub stream: bool,

    pub log_dir: String,
    pub log_file: String,
    pub log_level_file: String,
    pub log_level_console: Option<String>,
    pub log_rotation_size: Option<String>,
    pub log_rotation_age: Option<String>,
    pub redirect_console: bool,

    pub archive_timeout: Option<u32>,
}

impl ResolvedOptions {
    /// Fold `layers` (lowest precedence first) and fill every remaining gap
    /// with its documented default. Identical inputs always produce an
    /// identical resolution.
    pub fn resolve(layers: &[&BackupParams], ctx: &ResolveContext<'_>) -> ResolvedOptions {
        let merged = BackupParams::folded(layers);

        ResolvedOptions {
            schedule: CronSchedule::with_defaults(
                merged.hour,
                merged.minute,
                merged.weekday,
                merged.monthday,
            ),
            retention_redundancy: merged.retention_redundancy,
            retention_window: merged.retention_window,
            delete_expired: merged.delete_expired.unwrap_or(true),
            merge_expired: merged.merge_expired.unwrap_or(false),
            compress_algorithm: merged.compress_algorithm,
            compress_level: merged.compress_level,
            threads: merged.threads,
            temp_slot: merged.temp_slot.unwrap_or(false),
            slot: merged.slot,
            validate: merged.validate.unwrap_or(true),
            stream: merged.stream.unwrap_or(true),
            log_dir: merged
                .log_dir
                .unwrap_or_else(|| format!("{}/log", ctx.backup_dir)),
            log_file: merged
                .log_file
                .unwrap_or_else(|| format!("{}.log", ctx.cluster)),
            log_level_file: merged
                .log_level_file
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL_FILE.to_string()),
            log_level_console: merged.log_level_console,
            log_rotation_size: merged.log_rotation_size,
            log_rotation_age: merged.log_rotation_age,
            redirect_console: merged.redirect_console.unwrap_or(false),
            archive_timeout: merged.archive_timeout,
        }
    }

    /// True when any retention value is configured; the expired-backup flag
    /// is only meaningful (and only emitted) in that case.
    pub fn has_retention(&self) -> bool {
        self.retention_redundancy.is_some() || self.retention_window.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: ResolveContext<'static> = ResolveContext {
        cluster: "main",
        backup_dir: "/var/lib/pgbackup",
    };

    #[test]
    fn empty_layers_yield_documented_defaults() {
        let resolved = ResolvedOptions::resolve(&[], &CTX);

        assert!(resolved.stream);
        assert!(resolved.validate);
        assert!(!resolved.temp_slot);
        assert!(resolved.delete_expired);
        assert!(!resolved.merge_expired);
        assert_eq!(resolved.log_dir, "/var/lib/pgbackup/log");
        assert_eq!(resolved.log_file, "main.log");
        assert_eq!(resolved.log_level_file, "info");
        assert_eq!(resolved.schedule.hour.to_string(), "4");
        assert_eq!(resolved.schedule.minute.to_string(), "0");
        assert!(!resolved.has_retention());
    }

    #[test]
    fn job_layer_overrides_group_and_instance() {
        let instance = BackupParams {
            threads: Some(2),
            retention_window: Some(14),
            ..Default::default()
        };
        let group = BackupParams {
            threads: Some(4),
            ..Default::default()
        };
        let job = BackupParams {
            threads: Some(8),
            ..Default::default()
        };

        let resolved = ResolvedOptions::resolve(&[&instance, &group, &job], &CTX);
        assert_eq!(resolved.threads, Some(8));
        assert_eq!(resolved.retention_window, Some(14));
    }

    #[test]
    fn absent_job_layer_matches_group_level_resolution() {
        let instance = BackupParams {
            compress_algorithm: Some("zlib".to_string()),
            ..Default::default()
        };
        let group = BackupParams {
            compress_level: Some(2),
            validate: Some(false),
            ..Default::default()
        };
        let empty_job = BackupParams::default();

        let with_empty_job = ResolvedOptions::resolve(&[&instance, &group, &empty_job], &CTX);
        let at_group_level = ResolvedOptions::resolve(&[&instance, &group], &CTX);

        assert_eq!(with_empty_job, at_group_level);
    }

    #[test]
    fn resolution_is_deterministic() {
        let instance = BackupParams {
            threads: Some(4),
            temp_slot: Some(true),
            ..Default::default()
        };
        let job = BackupParams {
            hour: Some(crate::command::CronField::Number(1)),
            ..Default::default()
        };

        let first = ResolvedOptions::resolve(&[&instance, &job], &CTX);
        let second = ResolvedOptions::resolve(&[&instance, &job], &CTX);
        assert_eq!(first, second);
    }

    #[test]
    fn lower_true_survives_higher_unset() {
        let instance = BackupParams {
            merge_expired: Some(true),
            ..Default::default()
        };
        let job = BackupParams::default();

        let resolved = ResolvedOptions::resolve(&[&instance, &job], &CTX);
        assert!(resolved.merge_expired);
    }

    #[test]
    fn explicit_validate_false_is_kept() {
        let job = BackupParams {
            validate: Some(false),
            ..Default::default()
        };
        let resolved = ResolvedOptions::resolve(&[&job], &CTX);
        assert!(!resolved.validate);
    }
}
