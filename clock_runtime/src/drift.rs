//! Drift detection — determinism verification and state comparison.

use clock_kernel::{State, StateValue};

use crate::error::{Result, RuntimeError};
use crate::session::Session;
use crate::trace::Trace;

/// One element whose value differs between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDrift {
    pub name: String,
    pub before: StateValue,
    pub after: StateValue,
}

/// Element-level comparison of two states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftReport {
    pub changed: Vec<ElementDrift>,
    /// Present only in the second state.
    pub added: Vec<String>,
    /// Present only in the first state.
    pub removed: Vec<String>,
}

impl DriftReport {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn compare_states(state_a: &State, state_b: &State) -> DriftReport {
    let mut report = DriftReport::default();

    for (name, before) in state_a {
        match state_b.get(name) {
            Some(after) if after != before => report.changed.push(ElementDrift {
                name: name.clone(),
                before: before.clone(),
                after: after.clone(),
            }),
            Some(_) => {}
            None => report.removed.push(name.clone()),
        }
    }
    report.added = state_b
        .names()
        .filter(|n| !state_a.contains(n))
        .map(str::to_string)
        .collect();

    report
}

/// First edge at which two traces disagree, or `None` if they agree on
/// every edge. A trace that stops early diverges at its first missing edge.
pub fn first_divergence(trace_a: &Trace, trace_b: &Trace) -> Option<u64> {
    let a = trace_a.records();
    let b = trace_b.records();

    if let Some((ra, _)) = a.iter().zip(b).find(|(ra, rb)| ra != rb) {
        return Some(ra.edge);
    }
    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some(b[a.len()].edge),
        std::cmp::Ordering::Greater => Some(a[b.len()].edge),
    }
}

/// Build the same session twice, run both for `edges`, and require
/// identical traces. Returns the final combined hash.
pub fn verify_determinism<F>(build: F, edges: u64) -> Result<String>
where
    F: Fn() -> Result<Session>,
{
    let mut run1 = build()?;
    let mut run2 = build()?;
    run1.run(edges)?;
    run2.run(edges)?;

    if let Some(edge) = first_divergence(run1.trace(), run2.trace()) {
        return Err(RuntimeError::Determinism { edge });
    }
    Ok(run1.hash())
}
