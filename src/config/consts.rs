// SPDX-License-Identifier: MIT

/// Catalog group used when a node does not name one explicitly
pub const DEFAULT_GROUP: &str = "common";
/// Base directory for the backup catalog on both node roles
pub const DEFAULT_BACKUP_DIR: &str = "/var/lib/pgbackup";
/// Database role pg_probackup connects as
pub const DEFAULT_DB_USER: &str = "backup";
/// Database pg_probackup connects to
pub const DEFAULT_DB_NAME: &str = "backup";
/// System account on the instance host that backups run against
pub const DEFAULT_REMOTE_USER: &str = "postgres";
/// System account on the catalog host that owns the backup catalog
pub const DEFAULT_CATALOG_USER: &str = "pgbackup";
/// File log level emitted when no override is configured
pub const DEFAULT_LOG_LEVEL_FILE: &str = "info";
/// Directory holding the version-named pg_probackup binaries
pub const BINARY_DIR: &str = "/usr/bin";
/// Prefix shared by every resource tag and by cron/exec resource titles
pub const TAG_PREFIX: &str = "pgprobackup";
