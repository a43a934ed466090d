// SPDX-License-Identifier: MIT

//! Node configuration structures and YAML loading.
//!
//! A node declares exactly one role per run. An *instance* node describes the
//! database host being backed up and the jobs it wants scheduled; a *catalog*
//! node describes the host that receives the backups. Both are reconstructed
//! fresh every run; nothing here has persistent identity beyond the resource
//! titles derived from it.
//!
//! Unknown keys anywhere in a config are a fatal error for the node run
//! (`deny_unknown_fields`), as is a value of the wrong type for a known key.
//!
//! # Example
//! ```yaml
//! role: instance
//! fqdn: psql.localhost
//! cluster: main
//! version: '13'
//! threads: 4
//! host_groups: [b01, b02]
//! backups:
//!   DELTA: {}
//!   FULL:
//!     hour: 1
//!     minute: 13
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::consts::{
    DEFAULT_BACKUP_DIR, DEFAULT_CATALOG_USER, DEFAULT_DB_NAME, DEFAULT_DB_USER, DEFAULT_GROUP,
    DEFAULT_REMOTE_USER,
};
use crate::config::validate_config;
use crate::errors::ConfigError;
use crate::resolver::BackupParams;

/// Which convergence pass this node runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Instance,
    Catalog,
}

/// Backup modes understood by pg_probackup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum BackupType {
    FULL,
    DELTA,
    PAGE,
    PTRACK,
}

impl BackupType {
    /// The `-b` flag value
    pub fn flag(&self) -> &'static str {
        match self {
            BackupType::FULL => "FULL",
            BackupType::DELTA => "DELTA",
            BackupType::PAGE => "PAGE",
            BackupType::PTRACK => "PTRACK",
        }
    }

    /// Lowercased form used in resource titles
    pub fn lower(&self) -> &'static str {
        match self {
            BackupType::FULL => "full",
            BackupType::DELTA => "delta",
            BackupType::PAGE => "page",
            BackupType::PTRACK => "ptrack",
        }
    }
}

impl fmt::Display for BackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

impl FromStr for BackupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FULL" => Ok(BackupType::FULL),
            "DELTA" => Ok(BackupType::DELTA),
            "PAGE" => Ok(BackupType::PAGE),
            "PTRACK" => Ok(BackupType::PTRACK),
            other => Err(format!("unknown backup type '{}'", other)),
        }
    }
}

/// A value that must not leak through `Debug` output or log lines.
/// Accepts either a bare string or the wrapped form `{ secret: ... }`.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Secret {
    Plain(String),
    Wrapped { secret: String },
}

impl Secret {
    pub fn reveal(&self) -> &str {
        match self {
            Secret::Plain(s) => s,
            Secret::Wrapped { secret } => secret,
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// The `backups` section: either an explicit `{group -> {TYPE -> params}}`
/// map, or the flat `{TYPE -> params}` shorthand which targets every group
/// in `host_groups` (default `common`). Mixing group names and backup types
/// at the same level is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Backups {
    Grouped(BTreeMap<String, BTreeMap<BackupType, BackupParams>>),
    Flat(BTreeMap<BackupType, BackupParams>),
}

impl Default for Backups {
    fn default() -> Self {
        Backups::Flat(BTreeMap::new())
    }
}

impl Backups {
    pub fn is_empty(&self) -> bool {
        match self {
            Backups::Grouped(groups) => groups.values().all(|jobs| jobs.is_empty()),
            Backups::Flat(jobs) => jobs.is_empty(),
        }
    }

    /// Jobs destined for `group`, or `None` when the group has no entry.
    pub fn jobs_for(&self, group: &str) -> Option<&BTreeMap<BackupType, BackupParams>> {
        match self {
            Backups::Grouped(groups) => groups.get(group),
            Backups::Flat(jobs) => Some(jobs),
        }
    }
}

impl<'de> Deserialize<'de> for Backups {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let raw: BTreeMap<String, serde_yaml::Value> = BTreeMap::deserialize(deserializer)?;
        let type_keys = raw
            .keys()
            .filter(|key| key.parse::<BackupType>().is_ok())
            .count();

        if type_keys == 0 {
            let mut grouped = BTreeMap::new();
            for (group, value) in raw {
                let jobs: BTreeMap<BackupType, BackupParams> =
                    serde_yaml::from_value(value).map_err(Error::custom)?;
                grouped.insert(group, jobs);
            }
            Ok(Backups::Grouped(grouped))
        } else if type_keys == raw.len() {
            let mut flat = BTreeMap::new();
            for (key, value) in raw {
                let backup_type = key.parse::<BackupType>().map_err(Error::custom)?;
                let params: BackupParams =
                    serde_yaml::from_value(value).map_err(Error::custom)?;
                flat.insert(backup_type, params);
            }
            Ok(Backups::Flat(flat))
        } else {
            Err(Error::custom(
                "backups map mixes backup types and group names at the same level",
            ))
        }
    }
}

/// Configuration for a database-instance node.
///
/// Instance-global backup params live at the top level (the lowest
/// user-supplied precedence layer); `group_options` adds a per-group layer
/// and the per-job maps inside `backups` the highest one. serde cannot
/// combine `flatten` with `deny_unknown_fields`, so the global layer is
/// spelled out field-by-field and collected by [`InstanceConfig::global_params`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceConfig {
    pub role: Role,

    /// Node identity; resource titles derive from it
    pub fqdn: String,
    /// Instance id, defaults to `fqdn`
    pub id: Option<String>,
    /// pg_probackup catalog instance name, defaults to `id`
    pub cluster: Option<String>,

    /// PostgreSQL major version; selects `/usr/bin/pg_probackup-<version>`
    pub version: Option<String>,
    /// Custom binary path; disables the existence guard
    pub binary: Option<String>,
    pub package_ensure: Option<String>,
    /// Debug-symbol packages install alongside the tool; set false to opt out
    pub debug_symbols: Option<bool>,
    pub os_family: Option<String>,
    /// Distribution codename, needed for apt repository sources
    pub os_release: Option<String>,

    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_user: Option<String>,
    pub db_password: Option<Secret>,
    pub db_name: Option<String>,

    pub remote_user: Option<String>,
    /// Emitted as `--remote-port` whenever explicitly set; an unset port
    /// leaves ssh on its default
    pub remote_port: Option<u16>,
    /// Catalog-side account that realizes this instance's resources
    pub catalog_user: Option<String>,

    pub backup_dir: Option<String>,
    pub host_groups: Option<Vec<String>>,
    #[serde(default)]
    pub group_options: BTreeMap<String, BackupParams>,
    #[serde(default)]
    pub backups: Backups,

    // instance-global option layer
    pub hour: Option<crate::command::CronField>,
    pub minute: Option<crate::command::CronField>,
    pub weekday: Option<crate::command::CronField>,
    pub monthday: Option<crate::command::CronField>,
    pub retention_redundancy: Option<u32>,
    pub retention_window: Option<u32>,
    pub delete_expired: Option<bool>,
    pub merge_expired: Option<bool>,
    pub compress_algorithm: Option<String>,
    pub compress_level: Option<u32>,
    pub threads: Option<u32>,
    pub temp_slot: Option<bool>,
    pub slot: Option<String>,
    pub validate: Option<bool>,
    pub stream: Option<bool>,
    pub log_dir: Option<String>,
    pub log_file: Option<String>,
    pub log_level_file: Option<String>,
    pub log_level_console: Option<String>,
    pub log_rotation_size: Option<String>,
    pub log_rotation_age: Option<String>,
    pub redirect_console: Option<bool>,
    pub archive_timeout: Option<u32>,
}

impl InstanceConfig {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.fqdn)
    }

    pub fn cluster(&self) -> &str {
        self.cluster.as_deref().unwrap_or_else(|| self.id())
    }

    pub fn db_user(&self) -> &str {
        self.db_user.as_deref().unwrap_or(DEFAULT_DB_USER)
    }

    pub fn db_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(DEFAULT_DB_NAME)
    }

    pub fn remote_user(&self) -> &str {
        self.remote_user.as_deref().unwrap_or(DEFAULT_REMOTE_USER)
    }

    pub fn catalog_user(&self) -> &str {
        self.catalog_user.as_deref().unwrap_or(DEFAULT_CATALOG_USER)
    }

    pub fn backup_dir(&self) -> &str {
        self.backup_dir.as_deref().unwrap_or(DEFAULT_BACKUP_DIR)
    }

    /// The catalog groups this instance addresses. An explicit grouped
    /// `backups` map wins; otherwise `host_groups`, defaulting to `common`.
    pub fn target_groups(&self) -> Vec<String> {
        match &self.backups {
            Backups::Grouped(groups) if !groups.is_empty() => groups.keys().cloned().collect(),
            _ => self
                .host_groups
                .clone()
                .unwrap_or_else(|| vec![DEFAULT_GROUP.to_string()]),
        }
    }

    /// The instance-global option layer.
    pub fn global_params(&self) -> BackupParams {
        BackupParams {
            hour: self.hour.clone(),
            minute: self.minute.clone(),
            weekday: self.weekday.clone(),
            monthday: self.monthday.clone(),
            retention_redundancy: self.retention_redundancy,
            retention_window: self.retention_window,
            delete_expired: self.delete_expired,
            merge_expired: self.merge_expired,
            compress_algorithm: self.compress_algorithm.clone(),
            compress_level: self.compress_level,
            threads: self.threads,
            temp_slot: self.temp_slot,
            slot: self.slot.clone(),
            validate: self.validate,
            stream: self.stream,
            log_dir: self.log_dir.clone(),
            log_file: self.log_file.clone(),
            log_level_file: self.log_level_file.clone(),
            log_level_console: self.log_level_console.clone(),
            log_rotation_size: self.log_rotation_size.clone(),
            log_rotation_age: self.log_rotation_age.clone(),
            redirect_console: self.redirect_console,
            archive_timeout: self.archive_timeout,
        }
    }
}

/// Configuration for a backup-catalog node.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    pub role: Role,

    /// Node identity; the catalog key resource title derives from it
    pub fqdn: String,
    /// Group identity this catalog collects for, defaults to `common`
    pub group: Option<String>,
    /// Local account that owns the catalog and runs the realized crons
    pub user: Option<String>,
    /// Instance-side account the catalog's own key gets authorized for
    pub remote_user: Option<String>,
    pub backup_dir: Option<String>,

    /// pg_probackup versions to install on this host
    pub versions: Option<Vec<String>>,
    pub package_ensure: Option<String>,
    /// Debug-symbol packages install alongside the tool; set false to opt out
    pub debug_symbols: Option<bool>,
    pub os_family: Option<String>,
    /// Distribution codename, needed for apt repository sources
    pub os_release: Option<String>,
}

impl CatalogConfig {
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_CATALOG_USER)
    }

    pub fn remote_user(&self) -> &str {
        self.remote_user.as_deref().unwrap_or(DEFAULT_REMOTE_USER)
    }

    pub fn backup_dir(&self) -> &str {
        self.backup_dir.as_deref().unwrap_or(DEFAULT_BACKUP_DIR)
    }
}

/// A loaded node configuration of either role.
#[derive(Debug)]
pub enum NodeConfig {
    Instance(InstanceConfig),
    Catalog(CatalogConfig),
}

impl NodeConfig {
    pub fn fqdn(&self) -> &str {
        match self {
            NodeConfig::Instance(cfg) => &cfg.fqdn,
            NodeConfig::Catalog(cfg) => &cfg.fqdn,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            NodeConfig::Instance(_) => Role::Instance,
            NodeConfig::Catalog(_) => Role::Catalog,
        }
    }
}

#[derive(Deserialize)]
struct RoleProbe {
    role: Role,
}

/// Parse a node config from YAML text. The role field is probed first so the
/// rest of the document can be checked against the right schema, unknown
/// keys included.
pub fn parse_config(content: &str) -> Result<NodeConfig, ConfigError> {
    let probe: RoleProbe = serde_yaml::from_str(content)?;
    Ok(match probe.role {
        Role::Instance => NodeConfig::Instance(serde_yaml::from_str(content)?),
        Role::Catalog => NodeConfig::Catalog(serde_yaml::from_str(content)?),
    })
}

/// Load a node config from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NodeConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}

/// Load a node config and run the semantic checks on top of parsing.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<NodeConfig, ConfigError> {
    let config = load_config(path)?;
    validate_config(&config)?;
    Ok(config)
}
