// SPDX-License-Identifier: MIT

//! Canonical pg_probackup command synthesis.
//!
//! Synthesis is a pure function of the resolved options: identical inputs
//! always yield byte-identical command lines, which is what makes resource
//! republishing idempotent. Flags appear in one fixed canonical order, and
//! an option sitting at its documented default emits nothing, with three
//! deliberate exceptions whose defaults do emit (`--stream` and the log
//! filename/level/directory trio) because the original tool expects them on
//! every invocation.

use crate::config::consts::BINARY_DIR;
use crate::config::{BackupType, InstanceConfig};
use crate::errors::ConfigError;
use crate::resolver::ResolvedOptions;

/// Which pg_probackup binary a command invokes, and whether the command is
/// prefixed with an existence guard. Version-named binaries get the guard
/// (`[ -x /usr/bin/pg_probackup-12 ] && ...`) so a cron firing before the
/// package lands fails quietly; custom binaries are assumed present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySpec {
    path: String,
    guarded: bool,
}

impl BinarySpec {
    pub fn versioned(version: &str) -> Self {
        BinarySpec {
            path: format!("{}/pg_probackup-{}", BINARY_DIR, version),
            guarded: true,
        }
    }

    pub fn custom(path: impl Into<String>) -> Self {
        BinarySpec {
            path: path.into(),
            guarded: false,
        }
    }

    /// Pick the binary for an instance: a custom `binary` override wins,
    /// otherwise the version-named one.
    pub fn for_instance(config: &InstanceConfig) -> Result<Self, ConfigError> {
        if let Some(path) = &config.binary {
            return Ok(BinarySpec::custom(path.clone()));
        }
        match &config.version {
            Some(version) => Ok(BinarySpec::versioned(version)),
            None => Err(ConfigError::MissingBinary {
                instance: config.id().to_string(),
            }),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Instance connection identity shared by every command synthesized for one
/// instance.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub cluster: &'a str,
    pub backup_dir: &'a str,
    pub remote_host: &'a str,
    pub remote_user: &'a str,
    /// Emitted whenever explicitly configured, the default ssh port included
    pub remote_port: Option<u16>,
    pub db_user: &'a str,
    pub db_name: &'a str,
}

impl<'a> CommandContext<'a> {
    pub fn for_instance(config: &'a InstanceConfig) -> Self {
        CommandContext {
            cluster: config.cluster(),
            backup_dir: config.backup_dir(),
            remote_host: &config.fqdn,
            remote_user: config.remote_user(),
            remote_port: config.remote_port,
            db_user: config.db_user(),
            db_name: config.db_name(),
        }
    }
}

/// Render the backup invocation for one job.
pub fn backup_command(
    binary: &BinarySpec,
    ctx: &CommandContext<'_>,
    opts: &ResolvedOptions,
    backup_type: BackupType,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("{} backup", binary.path));
    parts.push(format!("-B {}", ctx.backup_dir));
    parts.push(format!("--instance {}", ctx.cluster));
    parts.push(format!("-b {}", backup_type.flag()));
    if opts.stream {
        parts.push("--stream".to_string());
    }
    parts.push(format!("--remote-host={}", ctx.remote_host));
    parts.push(format!("--remote-user={}", ctx.remote_user));
    if let Some(port) = ctx.remote_port {
        parts.push(format!("--remote-port={}", port));
    }
    parts.push(format!("-U {}", ctx.db_user));
    parts.push(format!("-d {}", ctx.db_name));

    parts.push(format!("--log-filename={}", opts.log_file));
    parts.push(format!("--log-level-file={}", opts.log_level_file));
    parts.push(format!("--log-directory={}", opts.log_dir));
    if let Some(size) = &opts.log_rotation_size {
        parts.push(format!("--log-rotation-size={}", size));
    }
    if let Some(age) = &opts.log_rotation_age {
        parts.push(format!("--log-rotation-age={}", age));
    }
    if let Some(level) = &opts.log_level_console {
        parts.push(format!("--log-level-console={}", level));
    }

    if let Some(redundancy) = opts.retention_redundancy {
        parts.push(format!("--retention-redundancy={}", redundancy));
    }
    if let Some(window) = opts.retention_window {
        parts.push(format!("--retention-window={}", window));
    }
    if opts.has_retention() {
        // exactly one of the expired flags; delete wins unless disabled
        if opts.delete_expired {
            parts.push("--delete-expired".to_string());
        } else if opts.merge_expired {
            parts.push("--merge-expired".to_string());
        }
    }

    if let Some(threads) = opts.threads {
        parts.push(format!("--threads={}", threads));
    }
    if let Some(algorithm) = &opts.compress_algorithm {
        parts.push(format!("--compress-algorithm={}", algorithm));
    }
    if let Some(level) = opts.compress_level {
        parts.push(format!("--compress-level={}", level));
    }

    // temp-slot wins over a named slot when both are set; carried from the
    // original as a documented tie-break
    if opts.temp_slot {
        parts.push("--temp-slot".to_string());
    } else if let Some(slot) = &opts.slot {
        parts.push(format!("-S {}", slot));
    }

    if !opts.validate {
        parts.push("--no-validate".to_string());
    }
    if let Some(timeout) = opts.archive_timeout {
        parts.push(format!("--archive-timeout={}", timeout));
    }

    let mut command = if binary.guarded {
        format!("[ -x {} ] && {}", binary.path, parts.join(" "))
    } else {
        parts.join(" ")
    };

    if opts.redirect_console {
        command.push_str(&format!(" >> {}/{} 2>&1", opts.log_dir, opts.log_file));
    }

    command
}

/// Render the one-shot catalog registration command for an instance.
pub fn add_instance_command(binary: &BinarySpec, ctx: &CommandContext<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("{} add-instance", binary.path));
    parts.push(format!("-B {}", ctx.backup_dir));
    parts.push(format!("--instance {}", ctx.cluster));
    parts.push(format!("--remote-host={}", ctx.remote_host));
    parts.push(format!("--remote-user={}", ctx.remote_user));
    if let Some(port) = ctx.remote_port {
        parts.push(format!("--remote-port={}", port));
    }

    if binary.guarded {
        format!("[ -x {} ] && {}", binary.path, parts.join(" "))
    } else {
        parts.join(" ")
    }
}
