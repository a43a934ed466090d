// SPDX-License-Identifier: MIT

//! Cron schedule fields for synthesized backup jobs.
//!
//! Each field is either the wildcard `*`, a literal, or an ordered list of
//! range expressions (`["0-2", "4-6"]`). Hour and minute deliberately default
//! to a fixed time (04:00) instead of a wildcard: an unset hour must never
//! turn into a backup that fires every minute of every hour.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One cron field as it appears in configuration and in realized crontab
/// entries.
///
/// # Example
/// ```yaml
/// hour: 1          # literal number
/// minute: '13'     # literal string
/// weekday: ['0-2', '4-6']
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CronField {
    Number(u32),
    Text(String),
    Ranges(Vec<String>),
}

impl CronField {
    /// The wildcard field, matching every slot
    pub fn wildcard() -> Self {
        CronField::Text("*".to_string())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, CronField::Text(s) if s == "*")
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CronField::Number(n) => write!(f, "{}", n),
            CronField::Text(s) => write!(f, "{}", s),
            CronField::Ranges(ranges) => write!(f, "{}", ranges.join(",")),
        }
    }
}

/// A fully-determined cron schedule for one backup job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CronSchedule {
    pub hour: CronField,
    pub minute: CronField,
    pub weekday: CronField,
    pub monthday: CronField,
}

impl CronSchedule {
    /// Fill unset fields with their documented defaults: 04:00 daily with
    /// wildcard weekday and monthday.
    pub fn with_defaults(
        hour: Option<CronField>,
        minute: Option<CronField>,
        weekday: Option<CronField>,
        monthday: Option<CronField>,
    ) -> Self {
        CronSchedule {
            hour: hour.unwrap_or(CronField::Text("4".to_string())),
            minute: minute.unwrap_or(CronField::Text("0".to_string())),
            weekday: weekday.unwrap_or_else(CronField::wildcard),
            monthday: monthday.unwrap_or_else(CronField::wildcard),
        }
    }
}
