//! Snapshot layer — deterministic in-memory session snapshots.
//!
//! Snapshots contain canonical JSON per process + a combined hash for
//! verification. No timestamps in snapshot content (determinism).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use clock_kernel::hashing::to_hex;
use clock_kernel::State;

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Edge count at which this snapshot was taken.
    pub edge: u64,
    /// Processes in registration order.
    pub processes: Vec<ProcessSnapshot>,
    /// Combined hash over every process's canonical JSON.
    pub hash: String,
    pub kernel_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub name: String,
    /// Canonical JSON of the process state (UTF-8).
    pub canonical_json: String,
}

impl ProcessSnapshot {
    /// Rebuild the state from its canonical JSON.
    pub fn state(&self) -> Result<State> {
        let value: serde_json::Value = serde_json::from_str(&self.canonical_json)?;
        Ok(State::from_json(&value["elements"])?)
    }
}

/// SHA-256 over `name NUL canonical LF` for each entry, in order.
pub fn combined_hash<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> String {
    let mut hasher = Sha256::new();
    for (name, canonical) in entries {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(canonical);
        hasher.update(b"\n");
    }
    to_hex(&hasher.finalize())
}

/// True if the stored hash matches the stored canonical JSON.
pub fn verify_snapshot_hash(snapshot: &Snapshot) -> bool {
    let computed = combined_hash(
        snapshot
            .processes
            .iter()
            .map(|p| (p.name.as_str(), p.canonical_json.as_bytes())),
    );
    computed == snapshot.hash
}

/// Hash and version checks every restore goes through.
pub fn check_snapshot(snapshot: &Snapshot) -> Result<()> {
    if snapshot.kernel_version != clock_kernel::KERNEL_VERSION {
        return Err(RuntimeError::KernelVersion {
            expected: clock_kernel::KERNEL_VERSION,
            found: snapshot.kernel_version,
        });
    }
    if !verify_snapshot_hash(snapshot) {
        return Err(RuntimeError::SnapshotHash {
            edge: snapshot.edge,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_hash_is_order_sensitive() {
        let a = combined_hash([("x", &b"1"[..]), ("y", &b"2"[..])]);
        let b = combined_hash([("y", &b"2"[..]), ("x", &b"1"[..])]);
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_combined_hash_separates_name_and_content() {
        let a = combined_hash([("ab", &b"c"[..])]);
        let b = combined_hash([("a", &b"bc"[..])]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_combined_hash_single_entry_known_value() {
        assert_eq!(
            combined_hash([("p", &b"{}"[..])]),
            clock_kernel::hashing::sha256_hex(b"p\0{}\n")
        );
    }

    #[test]
    fn test_check_snapshot_rejects_other_kernel() {
        let snapshot = Snapshot {
            edge: 3,
            processes: vec![],
            hash: combined_hash(Vec::<(&str, &[u8])>::new()),
            kernel_version: clock_kernel::KERNEL_VERSION + 1,
        };
        assert!(matches!(
            check_snapshot(&snapshot),
            Err(RuntimeError::KernelVersion { .. })
        ));
    }
}
