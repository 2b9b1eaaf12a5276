//! DigiShield: per-block retarget with asymmetric clamps.

use super::{cap_and_encode, last_non_min_difficulty_bits, next_height, window_start};
use crate::arith;
use crate::chain_index::{ChainEntry, ChainIndex};
use crate::compact::CompactTarget;
use crate::consensus_params::ConsensusRuleSet;
use crate::params::{DIGISHIELD_FORK2_SPACING, DIGISHIELD_X11_SPACING};
use num_bigint::BigUint;
use tracing::trace;

/// Spacing DigiShield aims for at `next_height`.
pub(crate) fn digishield_spacing(rules: &ConsensusRuleSet, next_height: u32) -> i64 {
    if next_height >= rules.x11_fork_height {
        DIGISHIELD_X11_SPACING
    } else if next_height >= rules.fork2_height {
        DIGISHIELD_FORK2_SPACING
    } else {
        rules.pow_target_spacing
    }
}

pub(crate) fn digishield<I: ChainIndex + ?Sized>(
    index: &I,
    tip: &ChainEntry,
    rules: &ConsensusRuleSet,
) -> CompactTarget {
    let next = next_height(tip);
    let spacing = digishield_spacing(rules, next);
    let timespan = spacing;
    let interval = timespan / spacing;

    if i64::from(next) % interval != 0 {
        return last_non_min_difficulty_bits(index, tip, interval, rules.pow_limit_compact());
    }

    let blocks_back = if i64::from(next) != interval {
        interval
    } else {
        interval - 1
    };
    let Some(first) = window_start(index, tip, blocks_back) else {
        return rules.pow_limit_compact();
    };

    let elapsed = (i64::from(tip.time) - i64::from(first.time))
        .clamp(timespan - timespan / 4, timespan + timespan / 2);

    let target = arith::wrapping_mul(&tip.bits.to_target(), elapsed as u32);
    let target = target / BigUint::from(timespan as u64);

    trace!(spacing, elapsed, "DigiShield");
    cap_and_encode(target, rules)
}
