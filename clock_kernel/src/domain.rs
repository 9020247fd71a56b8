/// Clock Kernel — Core Domain Types
///
/// Pure data. One closed value type is threaded through state
/// descriptors, live snapshots and proposed updates alike.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::{map, IndexMap};
use serde::{Deserialize, Serialize};

use crate::bitvec::BitVector;
use crate::error::{Error, Result};

// ── Values ─────────────────────────────────────────────────────

/// Value of a single state element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Boolean(bool),
    Vector(BitVector),
}

/// Declared shape of a state element. Vector shapes carry their width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Vector(usize),
}

impl StateValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            StateValue::Boolean(_) => ValueKind::Boolean,
            StateValue::Vector(v) => ValueKind::Vector(v.width()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Boolean(b) => Some(*b),
            StateValue::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&BitVector> {
        match self {
            StateValue::Vector(v) => Some(v),
            StateValue::Boolean(_) => None,
        }
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Boolean(b)
    }
}

impl From<BitVector> for StateValue {
    fn from(v: BitVector) -> Self {
        StateValue::Vector(v)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Boolean(b) => write!(f, "{}", b),
            StateValue::Vector(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Boolean => f.write_str("boolean"),
            ValueKind::Vector(width) => write!(f, "vector of width {}", width),
        }
    }
}

// ── State ──────────────────────────────────────────────────────

/// Named state elements, kept in the order they were first inserted.
/// Equality ignores order.
///
/// The same type serves as state descriptor (initial values), live
/// snapshot, and proposed update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    elements: IndexMap<String, StateValue>,
}

pub type StateDescriptor = State;
pub type StateUpdate = State;

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Replacing an existing element keeps its position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<StateValue>,
    ) -> Option<StateValue> {
        self.elements.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&StateValue> {
        self.elements.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        let value = self.require(name)?;
        value.as_bool().ok_or_else(|| Error::ElementKind {
            name: name.to_string(),
            expected: "boolean",
            found: value.kind(),
        })
    }

    pub fn vector(&self, name: &str) -> Result<&BitVector> {
        let value = self.require(name)?;
        value.as_vector().ok_or_else(|| Error::ElementKind {
            name: name.to_string(),
            expected: "vector",
            found: value.kind(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn iter(&self) -> map::Iter<'_, String, StateValue> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Declared kind of every element, by name.
    pub fn shape(&self) -> BTreeMap<String, ValueKind> {
        self.elements
            .iter()
            .map(|(name, value)| (name.clone(), value.kind()))
            .collect()
    }

    fn require(&self, name: &str) -> Result<&StateValue> {
        self.elements
            .get(name)
            .ok_or_else(|| Error::UnknownElement(name.to_string()))
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = (&'a String, &'a StateValue);
    type IntoIter = map::Iter<'a, String, StateValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<K: Into<String>, V: Into<StateValue>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        for (name, value) in iter {
            state.insert(name, value);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitvec::{unsigned, zero};

    #[test]
    fn test_typed_getters() {
        let state = State::new().with("counter", zero(3)).with("out", true);
        assert_eq!(state.bool("out"), Ok(true));
        assert_eq!(state.vector("counter"), Ok(&zero(3)));
        assert_eq!(
            state.bool("counter"),
            Err(Error::ElementKind {
                name: "counter".into(),
                expected: "boolean",
                found: ValueKind::Vector(3),
            })
        );
        assert_eq!(
            state.vector("missing"),
            Err(Error::UnknownElement("missing".into()))
        );
    }

    #[test]
    fn test_names_keep_declaration_order() {
        let mut state = State::new().with("z", false).with("a", true).with("m", zero(1));
        assert_eq!(state.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);

        state.insert("a", false);
        assert_eq!(state.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_equality_ignores_order() {
        let ab = State::new().with("a", true).with("b", zero(2));
        let ba = State::new().with("b", zero(2)).with("a", true);
        assert_eq!(ab, ba);
        assert_ne!(ab, ba.with("a", false));
    }

    #[test]
    fn test_deserialize_keeps_key_order() {
        let state: State = serde_json::from_str(r#"{"pc":"0011","halt":false,"acc":"1"}"#).unwrap();
        assert_eq!(state.names().collect::<Vec<_>>(), vec!["pc", "halt", "acc"]);
    }

    #[test]
    fn test_serde_form() {
        let state = State::new()
            .with("counter", unsigned(4, 5).unwrap())
            .with("out", false);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"counter":"0101","out":false}"#);
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_shape() {
        let state = State::new().with("c", zero(7)).with("b", true);
        let shape = state.shape();
        assert_eq!(shape["c"], ValueKind::Vector(7));
        assert_eq!(shape["b"], ValueKind::Boolean);
    }
}
