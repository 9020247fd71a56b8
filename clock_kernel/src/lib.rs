#![forbid(unsafe_code)]

//! Clock Kernel — synchronous clocked-register simulation.
//!
//! Registers transition in lock-step on discrete clock edges; values are
//! booleans or fixed-width bit vectors with hardware-style wraparound
//! arithmetic.

/// Kernel v1. Part of every canonical hash.
pub const KERNEL_VERSION: u32 = 1;

pub mod bitvec;
pub mod clock;
pub mod domain;
pub mod error;
pub mod hashing;
pub mod process;
pub mod register;
pub mod state;

pub use bitvec::{all_false, all_true, one, unsigned, vector, zero, BitVector};
pub use clock::{Clock, ClockListener};
pub use domain::{State, StateDescriptor, StateUpdate, StateValue, ValueKind};
pub use error::{Error, Result, UpdateFault};
pub use process::{Process, StateMapper};
pub use register::Register;
