//! Periodic retarget used before the Kimoto Gravity Well fork.

use super::{cap_and_encode, last_non_min_difficulty_bits, next_height, window_start};
use crate::arith;
use crate::chain_index::{ChainEntry, ChainIndex};
use crate::compact::CompactTarget;
use crate::consensus_params::ConsensusRuleSet;
use crate::params::LEGACY_MIN_DIFFICULTY_SPACINGS;
use num_bigint::BigUint;
use tracing::trace;

pub(crate) fn legacy_retarget<I: ChainIndex + ?Sized>(
    index: &I,
    tip: &ChainEntry,
    candidate_time: u32,
    rules: &ConsensusRuleSet,
) -> CompactTarget {
    let ceiling = rules.pow_limit_compact();
    let interval = rules.difficulty_adjustment_interval();
    let next = i64::from(next_height(tip));

    if next % interval != 0 {
        if !rules.pow_allow_min_difficulty_blocks {
            return tip.bits;
        }
        let stall = rules.pow_target_spacing * LEGACY_MIN_DIFFICULTY_SPACINGS;
        if i64::from(candidate_time) > i64::from(tip.time) + stall {
            return ceiling;
        }
        return last_non_min_difficulty_bits(index, tip, interval, ceiling);
    }

    // The first retarget after genesis can only reach back to block 0.
    let blocks_back = if next == interval {
        interval - 1
    } else if tip.height >= rules.adjustment_interval_fork_height {
        4 * interval
    } else {
        interval
    };

    match window_start(index, tip, blocks_back) {
        Some(first) => calculate_next_work_required(tip, i64::from(first.time), rules),
        None => ceiling,
    }
}

/// Retarget from `tip` given the time of the first block in the window.
///
/// Elapsed time is quartered from the adjustment-interval fork on (the window
/// is four intervals long there), clamped to `[timespan/4, timespan*4]`, and
/// applied as `target * elapsed / timespan`.
pub fn calculate_next_work_required(
    tip: &ChainEntry,
    first_block_time: i64,
    rules: &ConsensusRuleSet,
) -> CompactTarget {
    if rules.pow_no_retargeting {
        return tip.bits;
    }

    let timespan = rules.pow_target_timespan;
    let mut elapsed = i64::from(tip.time) - first_block_time;
    if tip.height >= rules.adjustment_interval_fork_height {
        elapsed /= 4;
    }
    let elapsed = elapsed.clamp(timespan / 4, timespan * 4);

    // The multiplier is 32 bits wide, as on the historical chain.
    let target = arith::wrapping_mul(&tip.bits.to_target(), elapsed as u32);
    let target = target / BigUint::from(timespan as u64);

    trace!(elapsed, timespan, "Legacy retarget");
    cap_and_encode(target, rules)
}
