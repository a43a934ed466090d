// SPDX-License-Identifier: MIT

mod params;
mod resolved;

pub use params::BackupParams;
pub use resolved::{ResolveContext, ResolvedOptions};
