//! Session — a clock, its named processes, and everything recorded
//! about them.
//!
//! Edge order:
//!   1. clock.fire()             — may fail; nothing is recorded then
//!   2. record committed states  — only if step 1 succeeded
//!   3. advance the edge counter
//!
//! Sessions are single-threaded: processes are shared through `Rc`.

use std::rc::Rc;

use clock_kernel::hashing::canonical_serialize;
use clock_kernel::{Clock, Process, State, StateDescriptor, StateUpdate};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::snapshot::{self, combined_hash, ProcessSnapshot, Snapshot};
use crate::trace::{EdgeRecord, Trace};

#[derive(Default)]
pub struct Session {
    clock: Clock,
    processes: Vec<(String, Rc<Process>)>,
    edge: u64,
    trace: Trace,
    atomic: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Session::new().atomic(config.atomic_edges)
    }

    /// Use `Clock::fire_atomic` for every edge.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Register a new process under a unique name.
    pub fn add_process<F>(
        &mut self,
        name: &str,
        descriptor: StateDescriptor,
        mapper: F,
    ) -> Result<Rc<Process>>
    where
        F: Fn(&State) -> clock_kernel::Result<StateUpdate> + 'static,
    {
        if self.process(name).is_some() {
            return Err(RuntimeError::DuplicateProcess(name.to_string()));
        }
        let process = self.clock.process(descriptor, mapper);
        self.processes.push((name.to_string(), process.clone()));
        Ok(process)
    }

    /// Deregister a process. Its state is kept by any other handle.
    pub fn remove_process(&mut self, name: &str) -> Result<Rc<Process>> {
        let index = self
            .processes
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| RuntimeError::UnknownProcess(name.to_string()))?;
        let (_, process) = self.processes.remove(index);
        self.clock.remove(&process);
        Ok(process)
    }

    pub fn process(&self, name: &str) -> Option<&Rc<Process>> {
        self.processes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Fire one edge and record the committed states.
    ///
    /// A failed edge is not counted or recorded, but listeners that
    /// committed before the failure keep their new state (see
    /// `Clock::fire`). Atomic sessions do not have this problem.
    pub fn step(&mut self) -> Result<&EdgeRecord> {
        let next = self.edge + 1;
        if self.atomic {
            self.clock.fire_atomic()?;
        } else {
            self.clock.fire()?;
        }

        let record = EdgeRecord {
            edge: next,
            processes: self.states(),
        };
        self.edge = next;
        tracing::debug!(edge = next, "edge recorded");
        Ok(self.trace.push(record))
    }

    pub fn run(&mut self, edges: u64) -> Result<()> {
        for _ in 0..edges {
            self.step()?;
        }
        Ok(())
    }

    /// Edges fired successfully so far.
    pub fn edge(&self) -> u64 {
        self.edge
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Current state of every process, in registration order.
    pub fn states(&self) -> Vec<(String, State)> {
        self.processes
            .iter()
            .map(|(name, p)| (name.clone(), p.snapshot()))
            .collect()
    }

    /// Combined canonical hash of every process state.
    pub fn hash(&self) -> String {
        self.snapshot().hash
    }

    pub fn snapshot(&self) -> Snapshot {
        let processes: Vec<ProcessSnapshot> = self
            .processes
            .iter()
            .map(|(name, p)| ProcessSnapshot {
                name: name.clone(),
                canonical_json: String::from_utf8_lossy(&canonical_serialize(&p.snapshot()))
                    .into_owned(),
            })
            .collect();
        let hash = combined_hash(
            processes
                .iter()
                .map(|p| (p.name.as_str(), p.canonical_json.as_bytes())),
        );
        Snapshot {
            edge: self.edge,
            processes,
            hash,
            kernel_version: clock_kernel::KERNEL_VERSION,
        }
    }

    /// Load every process state from a verified snapshot and resume at its
    /// edge. The snapshot must name exactly the registered processes, and
    /// every saved state must have its process's shape. All of that is
    /// checked before any process is touched.
    ///
    /// Trace records after the snapshot's edge are dropped, so the next
    /// step records `snapshot.edge + 1`.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        snapshot::check_snapshot(snapshot)?;

        if let Some(extra) = snapshot
            .processes
            .iter()
            .find(|s| self.process(&s.name).is_none())
        {
            return Err(RuntimeError::UnknownProcess(extra.name.clone()));
        }

        let mut restored = Vec::with_capacity(self.processes.len());
        for (name, process) in &self.processes {
            let saved = snapshot
                .processes
                .iter()
                .find(|s| &s.name == name)
                .ok_or_else(|| RuntimeError::UnknownProcess(name.clone()))?;
            let state = saved.state()?;
            if state.shape() != process.state().shape() {
                return Err(RuntimeError::SnapshotShape(name.clone()));
            }
            restored.push((process.clone(), state));
        }
        for (process, state) in restored {
            process.restore(state)?;
        }

        self.edge = snapshot.edge;
        self.trace.truncate_after(snapshot.edge);
        tracing::info!(edge = self.edge, "session restored from snapshot");
        Ok(())
    }
}
