//! Kimoto Gravity Well.
//!
//! Samples a variable number of past blocks: at least a short window's worth
//! and at most a long one. Sampling stops early once the observed block rate
//! leaves an "event horizon" envelope that narrows as more blocks are seen.

use super::cap_and_encode;
use crate::arith;
use crate::chain_index::{ChainEntry, ChainIndex};
use crate::compact::CompactTarget;
use crate::consensus_params::ConsensusRuleSet;
use crate::params::{KGW_PAST_SECONDS_MAX, KGW_PAST_SECONDS_MIN};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::trace;

/// Envelope half-width for a sample of `mass` blocks.
fn event_horizon_deviation(mass: u64) -> f64 {
    1.0 + 0.7084 * (mass as f64 / 39.96).powf(-1.228)
}

pub(crate) fn kimoto_gravity_well<I: ChainIndex + ?Sized>(
    index: &I,
    tip: &ChainEntry,
    rules: &ConsensusRuleSet,
) -> CompactTarget {
    let spacing = rules.pow_target_spacing;
    let blocks_min = (KGW_PAST_SECONDS_MIN / spacing) as u64;
    let blocks_max = (KGW_PAST_SECONDS_MAX / spacing) as u64;

    if tip.height == 0 || u64::from(tip.height) < blocks_min {
        return rules.pow_limit_compact();
    }

    let mut mass: u64 = 0;
    let mut actual_seconds: i64 = 0;
    let mut target_seconds: i64 = 0;
    let mut average = BigUint::zero();

    let mut reading = *tip;
    let mut i: u64 = 1;
    while reading.height > 0 {
        if blocks_max > 0 && i > blocks_max {
            break;
        }
        mass += 1;

        let difficulty = reading.bits.to_target();
        average = if i == 1 {
            difficulty
        } else {
            let step = arith::wrapping_sub(&difficulty, &average) / i;
            arith::wrapping_add(&step, &average)
        };

        actual_seconds = (i64::from(tip.time) - i64::from(reading.time)).max(0);
        target_seconds = spacing * mass as i64;
        let ratio = if actual_seconds != 0 && target_seconds != 0 {
            target_seconds as f64 / actual_seconds as f64
        } else {
            1.0
        };

        let fast = event_horizon_deviation(mass);
        let slow = 1.0 / fast;
        if mass >= blocks_min && (ratio <= slow || ratio >= fast) {
            break;
        }

        match index.predecessor(&reading) {
            Some(prev) => reading = prev,
            None => break,
        }
        i += 1;
    }

    let mut target = average;
    if actual_seconds != 0 && target_seconds != 0 {
        target = arith::wrapping_mul(&target, actual_seconds as u32);
        target /= BigUint::from(target_seconds as u64);
    }

    trace!(mass, actual_seconds, target_seconds, "Kimoto Gravity Well");
    cap_and_encode(target, rules)
}
