/// Clock Kernel — Processes
///
/// A process is a named bundle of registers driven by one transition
/// function. On every clock edge it first computes a proposed update from
/// its current state (phase 1), then commits that update through its
/// registers (phase 2).
///
/// State lives behind `RefCell` so that transition functions of other
/// processes can read it through a shared handle while the clock drives
/// the edge.

use std::cell::{Ref, RefCell};
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::bitvec::BitVector;
use crate::clock::ClockListener;
use crate::domain::{State, StateDescriptor, StateUpdate, StateValue};
use crate::error::{Error, Result};
use crate::register::Register;

/// Transition function: current state in, proposed update out.
///
/// Must not mutate the state of any other process. It may read it.
pub type StateMapper = Box<dyn Fn(&State) -> Result<StateUpdate>>;

pub struct Process {
    registers: IndexMap<String, Register>,
    state: RefCell<State>,
    pending: RefCell<Option<StateUpdate>>,
    mapper: StateMapper,
}

impl Process {
    /// Bind one register per descriptor element and adopt the initial
    /// values as the live state. Declaration order is the commit order.
    pub fn new<F>(descriptor: StateDescriptor, mapper: F) -> Process
    where
        F: Fn(&State) -> Result<StateUpdate> + 'static,
    {
        let registers = descriptor
            .iter()
            .map(|(name, value)| (name.clone(), Register::for_value(value)))
            .collect();
        Process {
            registers,
            state: RefCell::new(descriptor),
            pending: RefCell::new(None),
            mapper: Box::new(mapper),
        }
    }

    /// Construct from a JSON descriptor. See `State::from_json`.
    pub fn from_json<F>(descriptor: &Value, mapper: F) -> Result<Process>
    where
        F: Fn(&State) -> Result<StateUpdate> + 'static,
    {
        Ok(Process::new(State::from_json(descriptor)?, mapper))
    }

    /// Borrow the live state. Do not hold the borrow across `fire()`.
    pub fn state(&self) -> Ref<'_, State> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> State {
        self.state.borrow().clone()
    }

    pub fn get(&self, name: &str) -> Option<StateValue> {
        self.state.borrow().get(name).cloned()
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.state.borrow().bool(name)
    }

    pub fn vector(&self, name: &str) -> Result<BitVector> {
        self.state.borrow().vector(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registers.keys().map(String::as_str)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Replace the whole live state, e.g. from a snapshot.
    ///
    /// Every declared element must be present with its declared shape and
    /// no undeclared element may appear. Nothing is written unless the
    /// whole state validates.
    pub fn restore(&self, state: State) -> Result<()> {
        if let Some(extra) = state.names().find(|n| !self.registers.contains_key(*n)) {
            return Err(Error::UnknownElement(extra.to_string()));
        }
        self.validate(&state)?;
        let ordered = self
            .registers
            .keys()
            .filter_map(|name| Some((name.clone(), state.get(name)?.clone())))
            .collect::<State>();
        *self.state.borrow_mut() = ordered;
        self.pending.borrow_mut().take();
        Ok(())
    }

    fn validate(&self, update: &StateUpdate) -> Result<()> {
        let current = self.state.borrow();
        for (name, register) in &self.registers {
            if let Some(old) = current.get(name) {
                register.apply_update(name, old, update.get(name))?;
            }
        }
        Ok(())
    }
}

impl ClockListener for Process {
    fn compute_next_state(&self) -> Result<()> {
        self.pending.borrow_mut().take();
        let update = (self.mapper)(&self.state.borrow())?;
        *self.pending.borrow_mut() = Some(update);
        Ok(())
    }

    /// Commits element by element, in declaration order. A rejected element stops
    /// the commit; elements before it keep their new values.
    fn update_state(&self) -> Result<()> {
        let update = self.pending.borrow_mut().take().unwrap_or_default();

        for name in update.names().filter(|n| !self.registers.contains_key(*n)) {
            tracing::warn!(element = name, "ignoring update for undeclared state element");
        }

        let mut state = self.state.borrow_mut();
        for (name, register) in &self.registers {
            let Some(old) = state.get(name) else {
                continue;
            };
            let next = register.apply_update(name, old, update.get(name))?;
            state.insert(name.clone(), next);
        }
        Ok(())
    }

    fn check_update(&self) -> Result<()> {
        let pending = self.pending.borrow();
        let empty = State::new();
        self.validate(pending.as_ref().unwrap_or(&empty))
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("state", &self.state.borrow())
            .field("pending", &self.pending.borrow())
            .finish_non_exhaustive()
    }
}
