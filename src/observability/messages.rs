// SPDX-License-Identifier: MIT

//! Log message types for node pass lifecycle and resource exchange events.

use std::fmt::{Display, Formatter};

/// A node pass is starting for the given role and host.
///
/// # Log Level
/// `info!`
pub struct PassStarted<'a> {
    pub role: &'a str,
    pub fqdn: &'a str,
}

impl Display for PassStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting {} pass for {}", self.role, self.fqdn)
    }
}

/// Backup jobs were synthesized for one host group.
///
/// # Log Level
/// `info!`
pub struct JobsSynthesized<'a> {
    pub group: &'a str,
    pub job_count: usize,
}

impl Display for JobsSynthesized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Synthesized {} backup job(s) for group '{}'",
            self.job_count, self.group
        )
    }
}

/// Published resources, broken down by exchange outcome.
///
/// # Log Level
/// `info!`
pub struct ResourcesPublished {
    pub created: usize,
    pub replaced: usize,
    pub unchanged: usize,
}

impl Display for ResourcesPublished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Published resources: {} created, {} replaced, {} unchanged",
            self.created, self.replaced, self.unchanged
        )
    }
}

/// Collected resources under one exchange tag.
///
/// # Log Level
/// `debug!`
pub struct ResourcesCollected<'a> {
    pub tag: &'a str,
    pub count: usize,
}

impl Display for ResourcesCollected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Collected {} resource(s) tagged '{}'", self.count, self.tag)
    }
}

/// The local user's realized state after a collect.
///
/// # Log Level
/// `info!`
pub struct StateRealized<'a> {
    pub user: &'a str,
    pub authorized_keys: usize,
    pub cron_entries: usize,
    pub one_shot_commands: usize,
}

impl Display for StateRealized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Realized state for '{}': {} authorized key(s), {} cron entr(ies), {} one-shot command(s)",
            self.user, self.authorized_keys, self.cron_entries, self.one_shot_commands
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_started_names_role_and_host() {
        let msg = PassStarted {
            role: "instance",
            fqdn: "psql.localhost",
        };
        assert_eq!(msg.to_string(), "Starting instance pass for psql.localhost");
    }

    #[test]
    fn publish_summary_reads_naturally() {
        let msg = ResourcesPublished {
            created: 2,
            replaced: 1,
            unchanged: 3,
        };
        assert_eq!(
            msg.to_string(),
            "Published resources: 2 created, 1 replaced, 3 unchanged"
        );
    }
}
