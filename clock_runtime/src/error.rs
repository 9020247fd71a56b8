//! Runtime errors. Kernel errors pass through unchanged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Kernel(#[from] clock_kernel::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("process {0:?} is already registered")]
    DuplicateProcess(String),

    #[error("unknown process {0:?}")]
    UnknownProcess(String),

    #[error("edge order violation in encoded trace: edge {got} after {last}")]
    EdgeOrder { last: u64, got: u64 },

    #[error("corrupt encoded trace: {0}")]
    CorruptTrace(String),

    #[error("snapshot at edge {edge} failed hash verification")]
    SnapshotHash { edge: u64 },

    #[error("snapshot state of process {0:?} does not match its declared shape")]
    SnapshotShape(String),

    #[error("snapshot taken with kernel v{found}, this is kernel v{expected}")]
    KernelVersion { expected: u32, found: u32 },

    #[error("determinism failure: runs diverge at edge {edge}")]
    Determinism { edge: u64 },
}
