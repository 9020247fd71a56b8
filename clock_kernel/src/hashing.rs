/// Clock Kernel — Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing of state.
///
/// Rules:
///   - kernel_version first, then elements
///   - elements in name order (UTF-8 byte order)
///   - booleans as JSON booleans, vectors as MSB-first bit strings
///   - compact UTF-8 JSON, no whitespace

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::{State, StateValue};
use crate::KERNEL_VERSION;

/// Canonical serialization of a state to UTF-8 JSON bytes.
pub fn canonical_serialize(state: &State) -> Vec<u8> {
    build_canonical_value(state).to_string().into_bytes()
}

/// SHA-256 of the canonical serialization. Lowercase hex.
pub fn canonical_hash(state: &State) -> String {
    sha256_hex(&canonical_serialize(state))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    to_hex(&Sha256::digest(bytes))
}

/// Lowercase hex of a finished digest.
pub fn to_hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn build_canonical_value(state: &State) -> Value {
    // State keeps declaration order; the canonical form does not.
    let mut entries: Vec<_> = state.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut elements = Map::new();
    for (name, value) in entries {
        let v = match value {
            StateValue::Boolean(b) => Value::Bool(*b),
            StateValue::Vector(bits) => Value::String(bits.to_string()),
        };
        elements.insert(name.clone(), v);
    }

    let mut root = Map::new();
    root.insert(
        "kernel_version".to_string(),
        Value::Number(KERNEL_VERSION.into()),
    );
    root.insert("elements".to_string(), Value::Object(elements));
    Value::Object(root)
}
