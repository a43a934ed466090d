// SPDX-License-Identifier: MIT

//! Mapping collected resources into realized local state.
//!
//! Realization itself (writing authorized_keys, installing crontabs, running
//! registration commands) belongs to the external agent; this module only
//! produces the declarative description of what that agent should converge
//! toward. Filtering is by the local system user each payload names, which
//! is how a catalog host picks up instance keys and crons while an instance
//! host picks up only the catalog keys aimed at its own account.

use serde::Serialize;

use crate::command::CronSchedule;
use crate::exchange::{ExportedResource, ResourcePayload};

/// A public key to be present in a local user's authorized_keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizedKey {
    pub name: String,
    pub user: String,
    pub key_type: String,
    pub key: String,
}

/// A crontab entry to be present for a local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronEntry {
    pub name: String,
    pub user: String,
    pub command: String,
    pub schedule: CronSchedule,
}

/// A command to run once as a local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneShotCommand {
    pub name: String,
    pub user: String,
    pub command: String,
}

/// Everything one collection pass wants realized on this host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RealizedState {
    pub authorized_keys: Vec<AuthorizedKey>,
    pub cron_entries: Vec<CronEntry>,
    pub one_shot_commands: Vec<OneShotCommand>,
}

impl RealizedState {
    pub fn is_empty(&self) -> bool {
        self.authorized_keys.is_empty()
            && self.cron_entries.is_empty()
            && self.one_shot_commands.is_empty()
    }
}

/// Keep the resources whose payload targets `local_user` and sort them into
/// realized state. Resources aimed at other accounts on the same tag (the
/// reverse direction of the key exchange) fall through untouched.
pub fn realize_for_user(resources: Vec<ExportedResource>, local_user: &str) -> RealizedState {
    let mut state = RealizedState::default();

    for resource in resources {
        match resource.payload {
            ResourcePayload::AuthorizedKey {
                user,
                key_type,
                key,
            } if user == local_user => {
                state.authorized_keys.push(AuthorizedKey {
                    name: resource.title,
                    user,
                    key_type,
                    key,
                });
            }
            ResourcePayload::CronJob {
                user,
                command,
                schedule,
            } if user == local_user => {
                state.cron_entries.push(CronEntry {
                    name: resource.title,
                    user,
                    command,
                    schedule,
                });
            }
            ResourcePayload::OneShot { user, command } if user == local_user => {
                state.one_shot_commands.push(OneShotCommand {
                    name: resource.title,
                    user,
                    command,
                });
            }
            _ => {}
        }
    }

    state
}
