//! 256-bit wrapping arithmetic on `BigUint`.
//!
//! Historical difficulty code ran on a fixed-width unsigned 256-bit integer,
//! so subtraction underflow, multiplication overflow and oversized left shifts
//! all wrap modulo 2^256. Blocks on the live chain were accepted under those
//! semantics, so the retargeting code reproduces them here.

use num_bigint::BigUint;
use num_traits::One;
use once_cell::sync::Lazy;

/// 2^256.
static MODULUS: Lazy<BigUint> = Lazy::new(|| BigUint::one() << 256usize);

/// Reduce a value modulo 2^256.
pub(crate) fn truncate(value: BigUint) -> BigUint {
    if value.bits() <= 256 {
        value
    } else {
        value % &*MODULUS
    }
}

/// `a - b` modulo 2^256. Both operands must already be below 2^256.
pub(crate) fn wrapping_sub(a: &BigUint, b: &BigUint) -> BigUint {
    if a >= b {
        a - b
    } else {
        &*MODULUS - (b - a)
    }
}

/// `a + b` modulo 2^256.
pub(crate) fn wrapping_add(a: &BigUint, b: &BigUint) -> BigUint {
    truncate(a + b)
}

/// `a * m` modulo 2^256, with a 32-bit multiplier.
pub(crate) fn wrapping_mul(a: &BigUint, m: u32) -> BigUint {
    truncate(a * m)
}
