/// Clock Kernel — State Descriptor Construction
///
/// Builds descriptors from loosely typed JSON. Booleans become boolean
/// elements and `0`/`1` strings (MSB first) become vectors. Anything else
/// is rejected here, before a register is ever chosen for it.

use serde_json::Value;

use crate::bitvec::BitVector;
use crate::domain::{State, StateValue};
use crate::error::{Error, Result};

impl State {
    /// Parse a state descriptor from a JSON object.
    pub fn from_json(value: &Value) -> Result<State> {
        let object = value.as_object().ok_or_else(|| Error::Construction {
            name: String::new(),
            found: format!("descriptor must be a JSON object, got {}", value),
        })?;

        object
            .iter()
            .map(|(name, element)| Ok((name.clone(), element_from_json(name, element)?)))
            .collect::<Result<State>>()
    }
}

fn element_from_json(name: &str, element: &Value) -> Result<StateValue> {
    match element {
        Value::Bool(b) => Ok(StateValue::Boolean(*b)),
        Value::String(s) => s
            .parse::<BitVector>()
            .map(StateValue::Vector)
            .map_err(|_| Error::Construction {
                name: name.to_string(),
                found: format!("{:?} is not a bit string", s),
            }),
        other => Err(Error::Construction {
            name: name.to_string(),
            found: other.to_string(),
        }),
    }
}
