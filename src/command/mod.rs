// SPDX-License-Identifier: MIT

mod backup;
mod schedule;

pub use backup::{add_instance_command, backup_command, BinarySpec, CommandContext};
pub use schedule::{CronField, CronSchedule};
