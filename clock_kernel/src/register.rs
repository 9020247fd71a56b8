/// Clock Kernel — Registers
///
/// A register validates the proposed next value of one named state element
/// and passes it through unchanged. It stores nothing itself: current and
/// next values live in the owning process.

use crate::domain::{StateValue, ValueKind};
use crate::error::{Error, Result, UpdateFault};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Boolean,
    Vector,
}

impl Register {
    /// Register kind bound to an element with this initial value.
    pub fn for_value(initial: &StateValue) -> Register {
        match initial {
            StateValue::Boolean(_) => Register::Boolean,
            StateValue::Vector(_) => Register::Vector,
        }
    }

    /// Validate `proposed` against the shape of `old` and return it.
    ///
    /// Variant must match, and vector widths must be equal. Nothing is
    /// coerced or truncated.
    pub fn apply_update(
        &self,
        name: &str,
        old: &StateValue,
        proposed: Option<&StateValue>,
    ) -> Result<StateValue> {
        let proposed = proposed.ok_or_else(|| Error::UpdateValidation {
            name: name.to_string(),
            reason: UpdateFault::Missing,
        })?;

        let valid = match (self, proposed) {
            (Register::Boolean, StateValue::Boolean(_)) => true,
            (Register::Vector, StateValue::Vector(next)) => {
                old.kind() == ValueKind::Vector(next.width())
            }
            _ => false,
        };

        if !valid {
            return Err(Error::UpdateValidation {
                name: name.to_string(),
                reason: UpdateFault::KindMismatch {
                    expected: old.kind(),
                    found: proposed.kind(),
                },
            });
        }
        Ok(proposed.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitvec::{one, zero};

    #[test]
    fn test_for_value() {
        assert_eq!(Register::for_value(&true.into()), Register::Boolean);
        assert_eq!(Register::for_value(&zero(2).into()), Register::Vector);
    }

    #[test]
    fn test_boolean_register() {
        let reg = Register::Boolean;
        let old = StateValue::Boolean(false);
        assert_eq!(
            reg.apply_update("out", &old, Some(&true.into())),
            Ok(StateValue::Boolean(true))
        );
        let err = reg.apply_update("out", &old, Some(&zero(1).into())).unwrap_err();
        assert_eq!(
            err,
            Error::UpdateValidation {
                name: "out".into(),
                reason: UpdateFault::KindMismatch {
                    expected: ValueKind::Boolean,
                    found: ValueKind::Vector(1),
                },
            }
        );
    }

    #[test]
    fn test_vector_register_width() {
        let reg = Register::Vector;
        let old = StateValue::Vector(zero(3));
        assert_eq!(
            reg.apply_update("c", &old, Some(&one(3).into())),
            Ok(StateValue::Vector(one(3)))
        );
        assert!(matches!(
            reg.apply_update("c", &old, Some(&one(4).into())),
            Err(Error::UpdateValidation {
                reason: UpdateFault::KindMismatch { .. },
                ..
            })
        ));
        assert!(reg.apply_update("c", &old, Some(&false.into())).is_err());
    }

    #[test]
    fn test_missing_update() {
        let err = Register::Vector
            .apply_update("c", &zero(3).into(), None)
            .unwrap_err();
        assert_eq!(
            err,
            Error::UpdateValidation {
                name: "c".into(),
                reason: UpdateFault::Missing,
            }
        );
    }
}
