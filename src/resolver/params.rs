// SPDX-License-Identifier: MIT

//! One partial option layer for a backup job.
//!
//! Every recognized backup option appears here as an `Option`; an absent key
//! means "inherit from the layer below", which for booleans is distinct from
//! an explicit `false`. Unknown keys are rejected at deserialization time,
//! which aborts the whole node run rather than a single job.

use serde::Deserialize;

use crate::command::CronField;

/// A partial mapping from backup option name to value. Layers are folded
/// lowest-to-highest precedence with [`BackupParams::overlaid_with`]; the
/// last layer that defines a key wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupParams {
    // schedule
    pub hour: Option<CronField>,
    pub minute: Option<CronField>,
    pub weekday: Option<CronField>,
    pub monthday: Option<CronField>,

    // retention
    pub retention_redundancy: Option<u32>,
    pub retention_window: Option<u32>,
    pub delete_expired: Option<bool>,
    pub merge_expired: Option<bool>,

    // compression
    pub compress_algorithm: Option<String>,
    pub compress_level: Option<u32>,

    // concurrency
    pub threads: Option<u32>,

    // replication slot
    pub temp_slot: Option<bool>,
    pub slot: Option<String>,

    // validation
    pub validate: Option<bool>,

    // stream mode
    pub stream: Option<bool>,

    // logging
    pub log_dir: Option<String>,
    pub log_file: Option<String>,
    pub log_level_file: Option<String>,
    pub log_level_console: Option<String>,
    pub log_rotation_size: Option<String>,
    pub log_rotation_age: Option<String>,
    pub redirect_console: Option<bool>,

    // archiving
    pub archive_timeout: Option<u32>,
}

fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
    over.clone().or_else(|| base.clone())
}

impl BackupParams {
    /// Overlay a higher-precedence layer on top of this one. Keys defined in
    /// `over` win; unset keys fall through unchanged, including tri-state
    /// booleans (a lower layer's `true` survives a higher layer's absence).
    pub fn overlaid_with(&self, over: &BackupParams) -> BackupParams {
        BackupParams {
            hour: pick(&self.hour, &over.hour),
            minute: pick(&self.minute, &over.minute),
            weekday: pick(&self.weekday, &over.weekday),
            monthday: pick(&self.monthday, &over.monthday),
            retention_redundancy: pick(&self.retention_redundancy, &over.retention_redundancy),
            retention_window: pick(&self.retention_window, &over.retention_window),
            delete_expired: pick(&self.delete_expired, &over.delete_expired),
            merge_expired: pick(&self.merge_expired, &over.merge_expired),
            compress_algorithm: pick(&self.compress_algorithm, &over.compress_algorithm),
            compress_level: pick(&self.compress_level, &over.compress_level),
            threads: pick(&self.threads, &over.threads),
            temp_slot: pick(&self.temp_slot, &over.temp_slot),
            slot: pick(&self.slot, &over.slot),
            validate: pick(&self.validate, &over.validate),
            stream: pick(&self.stream, &over.stream),
            log_dir: pick(&self.log_dir, &over.log_dir),
            log_file: pick(&self.log_file, &over.log_file),
            log_level_file: pick(&self.log_level_file, &over.log_level_file),
            log_level_console: pick(&self.log_level_console, &over.log_level_console),
            log_rotation_size: pick(&self.log_rotation_size, &over.log_rotation_size),
            log_rotation_age: pick(&self.log_rotation_age, &over.log_rotation_age),
            redirect_console: pick(&self.redirect_console, &over.redirect_console),
            archive_timeout: pick(&self.archive_timeout, &over.archive_timeout),
        }
    }

    /// Fold an ordered list of layers, lowest precedence first.
    pub fn folded(layers: &[&BackupParams]) -> BackupParams {
        layers
            .iter()
            .fold(BackupParams::default(), |acc, layer| acc.overlaid_with(layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_layer_wins() {
        let lower = BackupParams {
            threads: Some(2),
            retention_window: Some(7),
            ..Default::default()
        };
        let upper = BackupParams {
            threads: Some(8),
            ..Default::default()
        };

        let merged = lower.overlaid_with(&upper);
        assert_eq!(merged.threads, Some(8));
        assert_eq!(merged.retention_window, Some(7));
    }

    #[test]
    fn unset_boolean_does_not_override_explicit_true() {
        let lower = BackupParams {
            temp_slot: Some(true),
            ..Default::default()
        };
        let upper = BackupParams::default();

        let merged = lower.overlaid_with(&upper);
        assert_eq!(merged.temp_slot, Some(true));
    }

    #[test]
    fn explicit_false_overrides_lower_true() {
        let lower = BackupParams {
            delete_expired: Some(true),
            ..Default::default()
        };
        let upper = BackupParams {
            delete_expired: Some(false),
            ..Default::default()
        };

        let merged = lower.overlaid_with(&upper);
        assert_eq!(merged.delete_expired, Some(false));
    }

    #[test]
    fn fold_applies_layers_in_order() {
        let a = BackupParams {
            threads: Some(1),
            compress_level: Some(1),
            ..Default::default()
        };
        let b = BackupParams {
            threads: Some(2),
            ..Default::default()
        };
        let c = BackupParams {
            threads: Some(3),
            ..Default::default()
        };

        let merged = BackupParams::folded(&[&a, &b, &c]);
        assert_eq!(merged.threads, Some(3));
        assert_eq!(merged.compress_level, Some(1));
    }

    #[test]
    fn empty_layer_is_identity() {
        let layer = BackupParams {
            retention_redundancy: Some(2),
            merge_expired: Some(true),
            ..Default::default()
        };
        let empty = BackupParams::default();

        assert_eq!(layer.overlaid_with(&empty), layer);
        assert_eq!(empty.overlaid_with(&layer), layer);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<BackupParams, _> = serde_yaml::from_str("threds: 4");
        assert!(result.is_err());
    }

    #[test]
    fn wrong_type_for_known_key_is_rejected() {
        let result: Result<BackupParams, _> = serde_yaml::from_str("threads: lots");
        assert!(result.is_err());
    }
}
