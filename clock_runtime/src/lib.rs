#![forbid(unsafe_code)]

//! Clock Runtime
//!
//! Wraps the clock kernel with named-process sessions, edge traces,
//! in-memory snapshots, a protobuf trace encoding, and drift detection.
//! Nothing is written to disk.
//!
//! No simulation semantics live here — edges, registers and arithmetic
//! are all delegated to the kernel.

pub mod config;
pub mod drift;
pub mod error;
pub mod proto_bridge;
pub mod proto_types;
pub mod session;
pub mod snapshot;
pub mod trace;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use session::Session;
pub use trace::{EdgeRecord, Trace};
