use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::defs::SeenRecord;

/// Identity -> record mapping of everything already delivered.
///
/// Ordered by identity so the persisted form diffs cleanly between runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenStore {
    records: BTreeMap<String, SeenRecord>,
}

impl SeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    pub fn record(&mut self, identity: &str, url: &str, timestamp: f64) {
        self.records.insert(
            identity.to_owned(),
            SeenRecord {
                timestamp,
                url: url.to_owned(),
            },
        );
    }

    pub fn get(&self, identity: &str) -> Option<&SeenRecord> {
        self.records.get(identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}
