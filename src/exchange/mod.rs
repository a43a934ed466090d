// SPDX-License-Identifier: MIT

mod collector;
mod publisher;
mod resource;
mod store;

pub use collector::{realize_for_user, AuthorizedKey, CronEntry, OneShotCommand, RealizedState};
pub use publisher::{publish_all, PublishSummary};
pub use resource::{group_tag, ExportedResource, ResourcePayload};
pub use store::{FileStore, MemoryStore, PublishOutcome, ResourceStore};
