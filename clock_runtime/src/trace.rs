//! In-memory trace of committed states, one record per clock edge.

use serde::{Deserialize, Serialize};

use clock_kernel::hashing::canonical_serialize;
use clock_kernel::{State, StateValue};

use crate::snapshot::combined_hash;

/// Committed state of every session process after one edge,
/// in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub edge: u64,
    pub processes: Vec<(String, State)>,
}

impl EdgeRecord {
    pub fn state(&self, process: &str) -> Option<&State> {
        self.processes
            .iter()
            .find(|(name, _)| name == process)
            .map(|(_, state)| state)
    }

    pub fn hash(&self) -> String {
        let canonical: Vec<(&str, Vec<u8>)> = self
            .processes
            .iter()
            .map(|(name, state)| (name.as_str(), canonical_serialize(state)))
            .collect();
        combined_hash(canonical.iter().map(|(n, c)| (*n, c.as_slice())))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    records: Vec<EdgeRecord>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EdgeRecord) -> &EdgeRecord {
        let index = self.records.len();
        self.records.push(record);
        &self.records[index]
    }

    /// Drop every record after `edge`.
    pub fn truncate_after(&mut self, edge: u64) {
        self.records.retain(|r| r.edge <= edge);
    }

    pub fn records(&self) -> &[EdgeRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&EdgeRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value of one element of one process across every recorded edge.
    /// Edges where the process or element is absent are skipped.
    pub fn element_history(&self, process: &str, element: &str) -> Vec<StateValue> {
        self.records
            .iter()
            .filter_map(|r| r.state(process)?.get(element).cloned())
            .collect()
    }
}

impl From<Vec<EdgeRecord>> for Trace {
    fn from(records: Vec<EdgeRecord>) -> Self {
        Self { records }
    }
}
