//! Compact ("nBits") target encoding.
//!
//! Format: `0x[size][sign|word]`
//! - size: 1 byte, byte length of the target
//! - sign: bit 23, marks a negative value
//! - word: 23-bit mantissa holding the most significant bytes

use crate::arith;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// A 32-bit compact difficulty target as carried in block headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompactTarget(u32);

/// Result of decoding a compact target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTarget {
    /// Magnitude, reduced modulo 2^256.
    pub value: BigUint,
    /// Sign bit set on a non-zero mantissa.
    pub negative: bool,
    /// Exponent/mantissa combination exceeds 256 bits.
    pub overflow: bool,
}

impl CompactTarget {
    /// Wrap a raw consensus encoding.
    pub const fn from_consensus(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw consensus encoding.
    pub const fn to_consensus(self) -> u32 {
        self.0
    }

    /// Decode into a magnitude plus negative/overflow flags.
    pub fn decode(self) -> DecodedTarget {
        let size = self.0 >> 24;
        let word = self.0 & MANTISSA_MASK;

        let value = if size <= 3 {
            BigUint::from(word >> (8 * (3 - size)))
        } else {
            arith::truncate(BigUint::from(word) << (8 * (size - 3)) as usize)
        };

        let negative = word != 0 && (self.0 & SIGN_BIT) != 0;
        let overflow = word != 0
            && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

        DecodedTarget {
            value,
            negative,
            overflow,
        }
    }

    /// Decode, ignoring the sign and overflow flags.
    ///
    /// Difficulty code reads bits that were already accepted on-chain, so the
    /// flags carry no information there.
    pub fn to_target(self) -> BigUint {
        self.decode().value
    }

    /// Encode a non-negative target below 2^256.
    ///
    /// Precision beyond the 23-bit mantissa is truncated, never rounded.
    pub fn from_target(target: &BigUint) -> Self {
        if target.is_zero() {
            return Self(0);
        }

        let mut size = ((target.bits() + 7) / 8) as u32;
        let mut word = if size <= 3 {
            target.to_u32().unwrap_or(0) << (8 * (3 - size))
        } else {
            (target >> (8 * (size - 3)) as usize)
                .to_u32()
                .unwrap_or(0)
        };

        // Keep the sign bit clear by moving one byte into the exponent.
        if word & SIGN_BIT != 0 {
            word >>= 8;
            size += 1;
        }

        Self(word | (size << 24))
    }
}

impl From<u32> for CompactTarget {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<CompactTarget> for u32 {
    fn from(bits: CompactTarget) -> Self {
        bits.0
    }
}

impl fmt::Display for CompactTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl fmt::LowerHex for CompactTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
