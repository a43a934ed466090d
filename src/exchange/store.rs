// SPDX-License-Identifier: MIT

//! The shared resource store contract and its bundled adapters.
//!
//! The store is a blackboard: many instance nodes publish, many catalog nodes
//! collect, on independent schedules. The contract is last-write-wins per
//! title and snapshot reads; consistency across nodes is only eventual, and
//! a collector may observe a previous run's artifact until the publisher
//! runs again. Purging resources whose publisher has disappeared is a policy
//! that lives outside this crate.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::exchange::ExportedResource;

/// What a publish did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// No resource existed under this title
    Created,
    /// A resource existed with different tags or payload and was replaced
    Replaced,
    /// An identical resource was already present; the publish was a no-op
    Unchanged,
}

/// Publish/collect contract against the shared store.
pub trait ResourceStore {
    /// Upsert by title. Identical content must be a no-op so repeated runs
    /// converge without churn.
    fn publish(&mut self, resource: ExportedResource) -> Result<PublishOutcome, StoreError>;

    /// Snapshot of every resource carrying `tag`. No ordering guarantee, and
    /// safe to call every run.
    fn collect(&self, tag: &str) -> Result<Vec<ExportedResource>, StoreError>;
}

/// In-memory store, used by tests and by single-process setups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: BTreeMap<String, ExportedResource>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn upsert(
    resources: &mut BTreeMap<String, ExportedResource>,
    resource: ExportedResource,
) -> PublishOutcome {
    match resources.get(&resource.title) {
        Some(existing) if *existing == resource => PublishOutcome::Unchanged,
        Some(_) => {
            resources.insert(resource.title.clone(), resource);
            PublishOutcome::Replaced
        }
        None => {
            resources.insert(resource.title.clone(), resource);
            PublishOutcome::Created
        }
    }
}

fn matching(resources: &BTreeMap<String, ExportedResource>, tag: &str) -> Vec<ExportedResource> {
    resources
        .values()
        .filter(|resource| resource.has_tag(tag))
        .cloned()
        .collect()
}

impl ResourceStore for MemoryStore {
    fn publish(&mut self, resource: ExportedResource) -> Result<PublishOutcome, StoreError> {
        Ok(upsert(&mut self.resources, resource))
    }

    fn collect(&self, tag: &str) -> Result<Vec<ExportedResource>, StoreError> {
        Ok(matching(&self.resources, tag))
    }
}

/// JSON-snapshot store on a shared filesystem path. Every node in the fleet
/// points at the same file; the map is keyed by title so the on-disk
/// snapshot is stable across runs that change nothing. Each write re-reads
/// the snapshot and merges this run's publishes over it, so nodes sharing
/// the file contend per title, not per file. Simultaneous writes to the
/// same title keep whichever lands last.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    resources: BTreeMap<String, ExportedResource>,
    /// Titles published through this handle; only these overwrite the disk
    /// copy on flush
    published: BTreeSet<String>,
}

impl FileStore {
    /// Open a snapshot file, treating a missing file as an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let resources = Self::load(&path)?;
        Ok(FileStore {
            path,
            resources,
            published: BTreeSet::new(),
        })
    }

    fn load(path: &Path) -> Result<BTreeMap<String, ExportedResource>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let mut merged = Self::load(&self.path)?;
        for title in &self.published {
            if let Some(resource) = self.resources.get(title) {
                merged.insert(title.clone(), resource.clone());
            }
        }
        self.resources = merged;

        let snapshot = serde_json::to_string_pretty(&self.resources)?;
        fs::write(&self.path, snapshot).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl ResourceStore for FileStore {
    fn publish(&mut self, resource: ExportedResource) -> Result<PublishOutcome, StoreError> {
        let title = resource.title.clone();
        let outcome = upsert(&mut self.resources, resource);
        if outcome != PublishOutcome::Unchanged {
            self.published.insert(title);
            self.flush()?;
        }
        Ok(outcome)
    }

    fn collect(&self, tag: &str) -> Result<Vec<ExportedResource>, StoreError> {
        Ok(matching(&self.resources, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ResourcePayload;

    fn key_resource(title: &str, tag: &str, key: &str) -> ExportedResource {
        ExportedResource {
            title: title.to_string(),
            tags: vec![tag.to_string()],
            payload: ResourcePayload::AuthorizedKey {
                user: "pgbackup".to_string(),
                key_type: "ssh-rsa".to_string(),
                key: key.to_string(),
            },
        }
    }

    #[test]
    fn publish_is_an_upsert_by_title() {
        let mut store = MemoryStore::new();
        let first = key_resource("postgres-a", "pgprobackup-common", "AAA");

        assert_eq!(
            store.publish(first.clone()).unwrap(),
            PublishOutcome::Created
        );
        assert_eq!(
            store.publish(first.clone()).unwrap(),
            PublishOutcome::Unchanged
        );

        let changed = key_resource("postgres-a", "pgprobackup-common", "BBB");
        assert_eq!(store.publish(changed).unwrap(), PublishOutcome::Replaced);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn collect_filters_by_tag() {
        let mut store = MemoryStore::new();
        store
            .publish(key_resource("postgres-a", "pgprobackup-b01", "AAA"))
            .unwrap();
        store
            .publish(key_resource("postgres-b", "pgprobackup-b02", "BBB"))
            .unwrap();

        let collected = store.collect("pgprobackup-b01").unwrap();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].title, "postgres-a");

        assert!(store.collect("pgprobackup-b03").unwrap().is_empty());
    }

    #[test]
    fn collect_is_idempotent() {
        let mut store = MemoryStore::new();
        store
            .publish(key_resource("postgres-a", "pgprobackup-common", "AAA"))
            .unwrap();

        let first = store.collect("pgprobackup-common").unwrap();
        let second = store.collect("pgprobackup-common").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn multi_tag_resource_is_collectable_by_every_tag() {
        let mut store = MemoryStore::new();
        let mut resource = key_resource("postgres-a", "pgprobackup-b01", "AAA");
        resource.tags.push("pgprobackup-b02".to_string());
        store.publish(resource).unwrap();

        assert_eq!(store.collect("pgprobackup-b01").unwrap().len(), 1);
        assert_eq!(store.collect("pgprobackup-b02").unwrap().len(), 1);
    }

    #[test]
    fn file_store_round_trips_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");

        {
            let mut store = FileStore::open(&path).unwrap();
            assert!(store.is_empty());
            store
                .publish(key_resource("postgres-a", "pgprobackup-common", "AAA"))
                .unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        let collected = reopened.collect("pgprobackup-common").unwrap();
        assert_eq!(collected[0].title, "postgres-a");
    }

    #[test]
    fn interleaved_stores_keep_each_others_titles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");

        // both handles open before either publishes
        let mut first = FileStore::open(&path).unwrap();
        let mut second = FileStore::open(&path).unwrap();

        first
            .publish(key_resource("postgres-a", "pgprobackup-common", "AAA"))
            .unwrap();
        second
            .publish(key_resource("postgres-b", "pgprobackup-common", "BBB"))
            .unwrap();

        // the later write merged over the earlier one instead of clobbering it
        let collected = second.collect("pgprobackup-common").unwrap();
        assert_eq!(collected.len(), 2);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn flush_only_overwrites_titles_published_through_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");

        {
            let mut seeder = FileStore::open(&path).unwrap();
            seeder
                .publish(key_resource("postgres-b", "pgprobackup-common", "OLD"))
                .unwrap();
        }

        // this handle loads the old copy of postgres-b but never publishes it
        let mut stale = FileStore::open(&path).unwrap();

        // another node replaces the title...
        let mut other = FileStore::open(&path).unwrap();
        other
            .publish(key_resource("postgres-b", "pgprobackup-common", "NEW"))
            .unwrap();

        // ...and the stale handle's next unrelated publish must not roll
        // that replacement back
        stale
            .publish(key_resource("postgres-a", "pgprobackup-common", "AAA"))
            .unwrap();

        let reopened = FileStore::open(&path).unwrap();
        let collected = reopened.collect("pgprobackup-common").unwrap();
        let b = collected.iter().find(|r| r.title == "postgres-b").unwrap();
        match &b.payload {
            ResourcePayload::AuthorizedKey { key, .. } => assert_eq!(key, "NEW"),
            other => panic!("expected authorized key payload, got {:?}", other),
        }
    }

    #[test]
    fn file_store_rejects_corrupt_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Snapshot(_))
        ));
    }
}
