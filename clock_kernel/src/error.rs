/// Clock Kernel — Error Taxonomy
///
/// Every fallible kernel operation returns `Result<T>`. Nothing is retried
/// and nothing falls back to a default: the failing operation is aborted
/// and the error goes straight to the caller.

use thiserror::Error;

use crate::domain::ValueKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A state descriptor entry is neither a boolean nor a bit vector.
    #[error("invalid state descriptor element {name:?}: {found}")]
    Construction { name: String, found: String },

    /// A proposed update does not match the declared shape of its element.
    #[error("invalid state update for {name:?}: {reason}")]
    UpdateValidation { name: String, reason: UpdateFault },

    #[error("vector index {index} out of bounds for vector of width {width}")]
    Index { index: isize, width: usize },

    #[error("trying to {op} vectors of width {left} and {right}")]
    Dimension {
        op: &'static str,
        left: usize,
        right: usize,
    },

    #[error("range construction failed: {0}")]
    RangeConstruction(String),

    #[error("unknown state element {0:?}")]
    UnknownElement(String),

    #[error("state element {name:?} is {found}, not {expected}")]
    ElementKind {
        name: String,
        expected: &'static str,
        found: ValueKind,
    },
}

/// Why a register rejected a proposed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateFault {
    #[error("no proposed value")]
    Missing,
    #[error("expected {expected}, got {found}")]
    KindMismatch { expected: ValueKind, found: ValueKind },
}

impl Error {
    pub(crate) fn range(msg: impl Into<String>) -> Self {
        Error::RangeConstruction(msg.into())
    }
}
