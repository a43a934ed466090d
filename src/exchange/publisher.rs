// SPDX-License-Identifier: MIT

//! Publishing a node's complete desired resource set for one run.

use tracing::debug;

use crate::errors::StoreError;
use crate::exchange::{ExportedResource, PublishOutcome, ResourceStore};

/// Tally of what one run's publishes did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub created: usize,
    pub replaced: usize,
    pub unchanged: usize,
}

impl PublishSummary {
    pub fn total(&self) -> usize {
        self.created + self.replaced + self.unchanged
    }

    /// True when the run published nothing the store did not already hold.
    pub fn converged(&self) -> bool {
        self.created == 0 && self.replaced == 0
    }
}

/// Publish every resource of a run's snapshot, in title order as given.
/// Fails on the first store error; within one node run there is no partial
/// publish worth continuing from.
pub fn publish_all(
    store: &mut dyn ResourceStore,
    resources: Vec<ExportedResource>,
) -> Result<PublishSummary, StoreError> {
    let mut summary = PublishSummary::default();

    for resource in resources {
        let title = resource.title.clone();
        let outcome = store.publish(resource)?;
        debug!(title = %title, outcome = ?outcome, "published resource");
        match outcome {
            PublishOutcome::Created => summary.created += 1,
            PublishOutcome::Replaced => summary.replaced += 1,
            PublishOutcome::Unchanged => summary.unchanged += 1,
        }
    }

    Ok(summary)
}
