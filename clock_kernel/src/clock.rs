/// Clock Kernel — Clock
///
/// The synchronization authority. Every edge runs in two global phases:
///   1. every listener computes its proposed next state from the
///      current, pre-edge state of everything
///   2. only then does every listener commit
///
/// Listeners run in registration order within each phase. Because no
/// listener commits before all have computed, that order does not affect
/// the result as long as transition functions only read shared state.
///
/// `fire` borrows the clock immutably and `add`/`remove` need it mutably,
/// so the listener list cannot change while an edge is running.

use std::rc::Rc;

use crate::domain::{State, StateDescriptor, StateUpdate};
use crate::error::Result;
use crate::process::Process;

/// Anything that can be driven by a clock edge.
pub trait ClockListener {
    /// Phase 1: compute and buffer the proposed next state.
    fn compute_next_state(&self) -> Result<()>;

    /// Phase 2: commit the buffered proposal.
    fn update_state(&self) -> Result<()>;

    /// Validate the buffered proposal without committing it.
    /// Used by `Clock::fire_atomic`.
    fn check_update(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct Clock {
    listeners: Vec<Rc<dyn ClockListener>>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Rc<dyn ClockListener>) {
        self.listeners.push(listener);
    }

    /// Remove the first registration of `listener` (by identity).
    /// Returns false, and does nothing, if it was never registered.
    pub fn remove<L: ClockListener + ?Sized>(&mut self, listener: &Rc<L>) -> bool {
        let target = Rc::as_ptr(listener).cast::<()>();
        match self
            .listeners
            .iter()
            .position(|l| Rc::as_ptr(l).cast::<()>() == target)
        {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Run one clock edge.
    ///
    /// The first failure aborts the edge and is returned. A failure in
    /// phase 2 leaves earlier listeners committed and later ones holding
    /// their pre-edge state; there is no rollback. Use `fire_atomic` when
    /// that matters.
    pub fn fire(&self) -> Result<()> {
        tracing::debug!(listeners = self.listeners.len(), "clock edge");
        self.compute_all()?;
        self.commit_all()
    }

    /// Run one clock edge, validating every pending update before any
    /// listener commits. A rejected update leaves every listener in its
    /// pre-edge state.
    pub fn fire_atomic(&self) -> Result<()> {
        tracing::debug!(listeners = self.listeners.len(), "atomic clock edge");
        self.compute_all()?;
        for (index, listener) in self.listeners.iter().enumerate() {
            tracing::trace!(index, "check");
            listener.check_update()?;
        }
        self.commit_all()
    }

    /// Create a process, register it, and hand back a shared handle.
    pub fn process<F>(&mut self, descriptor: StateDescriptor, mapper: F) -> Rc<Process>
    where
        F: Fn(&State) -> Result<StateUpdate> + 'static,
    {
        let process = Rc::new(Process::new(descriptor, mapper));
        self.add(process.clone());
        process
    }

    fn compute_all(&self) -> Result<()> {
        for (index, listener) in self.listeners.iter().enumerate() {
            tracing::trace!(index, "compute next state");
            listener.compute_next_state()?;
        }
        Ok(())
    }

    fn commit_all(&self) -> Result<()> {
        for (index, listener) in self.listeners.iter().enumerate() {
            tracing::trace!(index, "update state");
            listener.update_state()?;
        }
        Ok(())
    }
}
