/// Clock Kernel — Bit Vector Arithmetic
///
/// Immutable fixed-width bit vectors. Index 0 is the least-significant bit.
/// Arithmetic wraps modulo 2^width exactly like hardware adders do;
/// overflow is not an error and no carry-out is exposed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Widest vector `unsigned` will encode.
///
/// Values are checked against `2^width` before encoding, and the limit
/// keeps every accepted value exactly representable even where host
/// integers are floating-point backed. It is a deliberate contract limit,
/// not a property of `u64`.
pub const UNSIGNED_WIDTH_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    bits: Box<[bool]>,
}

impl BitVector {
    fn from_bits(bits: Vec<bool>) -> Self {
        Self {
            bits: bits.into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn get(&self, index: isize) -> Result<bool> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.bits.get(i).copied())
            .ok_or(Error::Index {
                index,
                width: self.width(),
            })
    }

    /// Bits from least to most significant.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|b| !b)
    }

    /// Ripple-carry addition modulo 2^width.
    pub fn add(&self, other: &BitVector) -> Result<BitVector> {
        self.require_same_width("add", other)?;
        let mut carry = false;
        let bits = self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| {
                let sum = a ^ b ^ carry;
                carry = (a && b) || (a && carry) || (b && carry);
                sum
            })
            .collect();
        Ok(BitVector::from_bits(bits))
    }

    pub fn not(&self) -> BitVector {
        BitVector::from_bits(self.iter().map(|b| !b).collect())
    }

    /// Two's complement.
    pub fn negate(&self) -> Result<BitVector> {
        self.not().add(&one(self.width()))
    }

    pub fn subtract(&self, other: &BitVector) -> Result<BitVector> {
        self.require_same_width("subtract", other)?;
        self.add(&other.negate()?)
    }

    /// `self` occupies the high-order bits, `other` the low-order bits.
    pub fn concat(&self, other: &BitVector) -> BitVector {
        BitVector::from_bits(other.iter().chain(self.iter()).collect())
    }

    /// Inclusive hardware-style slice `[from:to]`, with `to` the low bound.
    pub fn range(&self, from: isize, to: isize) -> Result<BitVector> {
        if to < 0 || to > from {
            return Err(Error::range(format!(
                "invalid range [{}:{}]: bounds must satisfy 0 <= to <= from",
                from, to
            )));
        }
        let (from, to) = (from as usize, to as usize);
        if from >= self.width() {
            return Err(Error::range(format!(
                "range [{}:{}] exceeds vector of width {}",
                from,
                to,
                self.width()
            )));
        }
        Ok(BitVector::from_bits(self.bits[to..=from].to_vec()))
    }

    /// Unsigned value of the vector. Fails for vectors wider than 64 bits
    /// that have any bit set above bit 63.
    pub fn to_u64(&self) -> Result<u64> {
        let mut value = 0u64;
        for (i, bit) in self.iter().enumerate().filter(|(_, b)| *b) {
            if i >= 64 {
                return Err(Error::range(format!(
                    "vector of width {} does not fit in 64 bits",
                    self.width()
                )));
            }
            value |= 1u64 << i;
        }
        Ok(value)
    }

    fn require_same_width(&self, op: &'static str, other: &BitVector) -> Result<()> {
        if self.width() != other.width() {
            return Err(Error::Dimension {
                op,
                left: self.width(),
                right: other.width(),
            });
        }
        Ok(())
    }
}

// ── Constructors ───────────────────────────────────────────────

/// Copy `bits` into a new vector. The input is never aliased.
pub fn vector(bits: &[bool]) -> BitVector {
    BitVector::from_bits(bits.to_vec())
}

pub fn all_false(width: usize) -> BitVector {
    BitVector::from_bits(vec![false; width])
}

pub fn zero(width: usize) -> BitVector {
    all_false(width)
}

pub fn all_true(width: usize) -> BitVector {
    BitVector::from_bits(vec![true; width])
}

/// Least-significant bit set. `one(0)` is the empty vector.
pub fn one(width: usize) -> BitVector {
    let mut bits = vec![false; width];
    if let Some(lsb) = bits.first_mut() {
        *lsb = true;
    }
    BitVector::from_bits(bits)
}

/// Binary encoding of `value` in `width` bits.
///
/// Requires `width <= UNSIGNED_WIDTH_LIMIT` and `value < 2^width`.
pub fn unsigned(width: usize, value: u64) -> Result<BitVector> {
    if width > UNSIGNED_WIDTH_LIMIT {
        return Err(Error::range(format!(
            "unsigned width {} exceeds the limit of {}",
            width, UNSIGNED_WIDTH_LIMIT
        )));
    }
    if value >= 1u64 << width {
        return Err(Error::range(format!(
            "value {} does not fit in {} bits",
            value, width
        )));
    }
    Ok(BitVector::from_bits(
        (0..width).map(|i| (value >> i) & 1 == 1).collect(),
    ))
}

// ── Text form ──────────────────────────────────────────────────

/// Most-significant bit first, e.g. `unsigned(3, 6)` prints `110`.
impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().rev() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitVector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .rev()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::range(format!(
                    "invalid bit character {:?} in {:?}",
                    other, s
                ))),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(BitVector::from_bits(bits))
    }
}

impl Serialize for BitVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
