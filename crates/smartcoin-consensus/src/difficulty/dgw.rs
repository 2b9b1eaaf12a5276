//! Dark Gravity Wave (v3).

use super::cap_and_encode;
use crate::arith;
use crate::chain_index::{ChainEntry, ChainIndex};
use crate::compact::CompactTarget;
use crate::consensus_params::ConsensusRuleSet;
use crate::params::{DGW_PAST_BLOCKS, DGW_TARGET_SPACING};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::trace;

/// Weighted average of the last 24 targets, scaled by how long those blocks
/// actually took against two minutes each.
pub(crate) fn dark_gravity_wave<I: ChainIndex + ?Sized>(
    index: &I,
    tip: &ChainEntry,
    rules: &ConsensusRuleSet,
) -> CompactTarget {
    if tip.height == 0 || i64::from(tip.height) < DGW_PAST_BLOCKS {
        return rules.pow_limit_compact();
    }

    let mut count: i64 = 0;
    let mut actual_timespan: i64 = 0;
    let mut last_block_time: i64 = 0;
    let mut average = BigUint::zero();

    let mut reading = *tip;
    let mut i: i64 = 1;
    while reading.height > 0 {
        if i > DGW_PAST_BLOCKS {
            break;
        }
        count += 1;

        let difficulty = reading.bits.to_target();
        average = if count == 1 {
            difficulty
        } else {
            let weighted = arith::wrapping_mul(&average, count as u32);
            arith::wrapping_add(&weighted, &difficulty) / BigUint::from((count + 1) as u64)
        };

        let time = i64::from(reading.time);
        if last_block_time > 0 {
            actual_timespan += last_block_time - time;
        }
        last_block_time = time;

        match index.predecessor(&reading) {
            Some(prev) => reading = prev,
            None => break,
        }
        i += 1;
    }

    let window = count * DGW_TARGET_SPACING;
    let actual_timespan = actual_timespan.clamp(window / 3, window * 3);

    let target = arith::wrapping_mul(&average, actual_timespan as u32);
    let target = target / BigUint::from(window as u64);

    trace!(count, actual_timespan, window, "Dark Gravity Wave");
    cap_and_encode(target, rules)
}
