//! Arithmetic over the two-element binary field GF(2).

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An element of GF(2). Addition is XOR, multiplication is AND.
#[derive(Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct BinaryFieldElement(u8);

impl BinaryFieldElement {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Construct from any integer; only the low bit is kept.
    pub fn new(value: u64) -> Self {
        Self((value & 1) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_one(self) -> bool {
        self.0 == 1
    }
}

impl Add for BinaryFieldElement {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl Mul for BinaryFieldElement {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl AddAssign for BinaryFieldElement {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl MulAssign for BinaryFieldElement {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Sum for BinaryFieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl<'a> Sum<&'a BinaryFieldElement> for BinaryFieldElement {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + *b)
    }
}

impl From<bool> for BinaryFieldElement {
    fn from(bit: bool) -> Self {
        Self(bit as u8)
    }
}

impl fmt::Debug for BinaryFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BinaryFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BinaryFieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for BinaryFieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Untrusted encodings are masked back into the field.
        let value = u8::deserialize(deserializer)?;
        Ok(Self(value & 1))
    }
}
