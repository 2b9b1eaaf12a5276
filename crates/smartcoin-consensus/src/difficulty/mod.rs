//! Difficulty retargeting.
//!
//! The required target for a candidate block is produced by one of several
//! historical algorithms, chosen purely from the candidate height
//! (`tip.height + 1`) against the fork heights of the active rule-set:
//!
//! | Next height            | Algorithm           |
//! |------------------------|---------------------|
//! | no-retarget networks   | parent bits         |
//! | `>= fork4`             | Dark Gravity Wave   |
//! | `>= fork2 + 1`         | DigiShield          |
//! | `== fork2`             | parent bits         |
//! | `>= fork1`             | Kimoto Gravity Well |
//! | below fork1            | legacy retarget     |
//!
//! All targets are computed with the wrapping 256-bit arithmetic of the
//! historical implementation and re-encoded to compact form, so results are
//! bit-for-bit what the live network accepted.

mod dgw;
mod digishield;
mod kgw;
mod legacy;

pub use legacy::calculate_next_work_required;

use crate::chain_index::{ChainEntry, ChainIndex};
use crate::compact::CompactTarget;
use crate::consensus_params::ConsensusRuleSet;
use crate::header::BlockHeader;
use num_bigint::BigUint;
use std::fmt;
use tracing::{debug, instrument, warn};

/// The retargeting strategy in force for a candidate block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetargetAlgorithm {
    /// Every block keeps its parent's bits.
    NoRetarget,
    /// 24-block weighted average, from fork4.
    DarkGravityWave,
    /// Per-block retarget with asymmetric clamps, after fork2.
    DigiShield,
    /// The block exactly at fork2 keeps its parent's bits.
    Fork2Pause,
    /// Adaptive-window average, from fork1.
    KimotoGravityWell,
    /// Periodic retarget every `timespan / spacing` blocks.
    Legacy,
}

impl RetargetAlgorithm {
    /// Pick the algorithm for a block at `next_height`. First match wins.
    pub fn select(rules: &ConsensusRuleSet, next_height: u32) -> Self {
        if rules.pow_no_retargeting {
            RetargetAlgorithm::NoRetarget
        } else if next_height >= rules.fork4_height {
            RetargetAlgorithm::DarkGravityWave
        } else if u64::from(next_height) >= u64::from(rules.fork2_height) + 1 {
            RetargetAlgorithm::DigiShield
        } else if next_height == rules.fork2_height {
            RetargetAlgorithm::Fork2Pause
        } else if next_height >= rules.fork1_height {
            RetargetAlgorithm::KimotoGravityWell
        } else {
            RetargetAlgorithm::Legacy
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RetargetAlgorithm::NoRetarget => "no-retarget",
            RetargetAlgorithm::DarkGravityWave => "dark-gravity-wave",
            RetargetAlgorithm::DigiShield => "digishield",
            RetargetAlgorithm::Fork2Pause => "fork2-pause",
            RetargetAlgorithm::KimotoGravityWell => "kimoto-gravity-well",
            RetargetAlgorithm::Legacy => "legacy",
        }
    }
}

impl fmt::Display for RetargetAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compact bits required for `candidate`, whose parent is `tip`.
///
/// `rules` must be the rule-set active at `tip.height + 1`. Never fails:
/// missing history degrades to the ceiling.
#[instrument(skip(index, tip, candidate, rules), fields(height = next_height(tip)))]
pub fn get_required_difficulty<I: ChainIndex + ?Sized>(
    index: &I,
    tip: &ChainEntry,
    candidate: &BlockHeader,
    rules: &ConsensusRuleSet,
) -> CompactTarget {
    let algorithm = RetargetAlgorithm::select(rules, next_height(tip));

    let bits = match algorithm {
        RetargetAlgorithm::NoRetarget | RetargetAlgorithm::Fork2Pause => tip.bits,
        RetargetAlgorithm::DarkGravityWave => dgw::dark_gravity_wave(index, tip, rules),
        RetargetAlgorithm::DigiShield => digishield::digishield(index, tip, rules),
        RetargetAlgorithm::KimotoGravityWell => kgw::kimoto_gravity_well(index, tip, rules),
        RetargetAlgorithm::Legacy => legacy::legacy_retarget(index, tip, candidate.time, rules),
    };

    debug!(%algorithm, parent_bits = %tip.bits, %bits, "Required difficulty");
    bits
}

/// Height of the block being built on `tip`.
pub(crate) fn next_height(tip: &ChainEntry) -> u32 {
    tip.height.saturating_add(1)
}

/// Clamp a target to the network ceiling and encode it.
pub(crate) fn cap_and_encode(target: BigUint, rules: &ConsensusRuleSet) -> CompactTarget {
    if target > rules.pow_limit {
        CompactTarget::from_target(&rules.pow_limit)
    } else {
        CompactTarget::from_target(&target)
    }
}

/// Bits of the most recent block that was not mined under the
/// min-difficulty allowance.
///
/// Walks back from `tip` while the block has a parent, is not on a retarget
/// boundary and carries exactly the ceiling bits.
pub(crate) fn last_non_min_difficulty_bits<I: ChainIndex + ?Sized>(
    index: &I,
    tip: &ChainEntry,
    interval: i64,
    ceiling: CompactTarget,
) -> CompactTarget {
    let mut current = *tip;
    while i64::from(current.height) % interval != 0 && current.bits == ceiling {
        match index.predecessor(&current) {
            Some(prev) => current = prev,
            None => break,
        }
    }
    current.bits
}

/// The block `blocks` steps behind `tip`, or `None` if the index does not
/// reach that far.
pub(crate) fn window_start<I: ChainIndex + ?Sized>(
    index: &I,
    tip: &ChainEntry,
    blocks: i64,
) -> Option<ChainEntry> {
    let steps = u32::try_from(blocks.max(0)).unwrap_or(u32::MAX);
    let (entry, taken) = index.ancestor(tip, steps);
    if taken == steps {
        Some(entry)
    } else {
        warn!(
            tip = tip.height,
            wanted = steps,
            reached = taken,
            "Retarget window runs past the available chain history"
        );
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chain_index::InMemoryChain;
    use crate::consensus_params::tests::sample_rules;
    use crate::header::BlockHash;

    pub(crate) const T0: u32 = 1_500_000_000;

    /// Contiguous chain of `len` blocks from `base`, with time and bits
    /// generated per offset.
    pub(crate) fn synthetic_chain(
        base: u32,
        len: u32,
        time: impl Fn(u32) -> u32,
        bits: impl Fn(u32) -> u32,
    ) -> InMemoryChain {
        let mut chain = InMemoryChain::starting_at(base);
        for i in 0..len {
            chain.push(time(i), CompactTarget::from_consensus(bits(i)));
        }
        chain
    }

    pub(crate) fn candidate_at(time: u32) -> BlockHeader {
        BlockHeader {
            version: 1,
            prev_block_hash: BlockHash::ZERO,
            merkle_root: BlockHash::ZERO,
            time,
            bits: CompactTarget::from_consensus(0),
            nonce: 0,
        }
    }

    #[test]
    fn test_selection_boundaries() {
        let rules = sample_rules(0);
        let select = |next| RetargetAlgorithm::select(&rules, next);

        assert_eq!(select(1), RetargetAlgorithm::Legacy);
        assert_eq!(select(34_999), RetargetAlgorithm::Legacy);
        assert_eq!(select(35_000), RetargetAlgorithm::KimotoGravityWell);
        assert_eq!(select(199_999), RetargetAlgorithm::KimotoGravityWell);
        assert_eq!(select(200_000), RetargetAlgorithm::Fork2Pause);
        assert_eq!(select(200_001), RetargetAlgorithm::DigiShield);
        assert_eq!(select(384_999), RetargetAlgorithm::DigiShield);
        assert_eq!(select(385_000), RetargetAlgorithm::DarkGravityWave);
        assert_eq!(select(u32::MAX), RetargetAlgorithm::DarkGravityWave);
    }

    #[test]
    fn test_no_retarget_overrides_everything() {
        let mut rules = sample_rules(0);
        rules.pow_no_retargeting = true;
        for next in [1, 35_000, 200_000, 250_000, 400_000] {
            assert_eq!(RetargetAlgorithm::select(&rules, next), RetargetAlgorithm::NoRetarget);
        }
    }

    #[test]
    fn test_zero_fork_heights_select_dgw() {
        let mut rules = sample_rules(0);
        rules.fork1_height = 0;
        rules.fork2_height = 0;
        rules.x11_fork_height = 0;
        rules.fork4_height = 0;
        assert_eq!(RetargetAlgorithm::select(&rules, 1), RetargetAlgorithm::DarkGravityWave);
    }

    #[test]
    fn test_fork2_pause_keeps_parent_bits() {
        let rules = sample_rules(0);
        let chain = synthetic_chain(199_990, 10, |i| T0 + 500 * i, |_| 0x1b0404cb);
        let tip = *chain.tip().unwrap();
        assert_eq!(tip.height, 199_999);

        let bits = get_required_difficulty(&chain, &tip, &candidate_at(tip.time + 10_000), &rules);
        assert_eq!(bits, tip.bits);
    }

    #[test]
    fn test_no_retarget_keeps_parent_bits() {
        let mut rules = sample_rules(0);
        rules.pow_no_retargeting = true;
        let chain = synthetic_chain(0, 100, |i| T0 + i, |_| 0x207fffff);
        let tip = *chain.tip().unwrap();
        let bits = get_required_difficulty(&chain, &tip, &candidate_at(T0 + 1_000_000), &rules);
        assert_eq!(bits, CompactTarget::from_consensus(0x207fffff));
    }

    #[test]
    fn test_last_non_min_difficulty_walk() {
        let ceiling = CompactTarget::from_consensus(0x1e0fffff);
        // Heights 0..=9; 6..=9 mined at the ceiling, 5 at a real target.
        let chain = synthetic_chain(
            0,
            10,
            |i| T0 + i,
            |i| if i >= 6 { 0x1e0fffff } else { 0x1c1a1206 },
        );
        let tip = *chain.tip().unwrap();
        assert_eq!(
            last_non_min_difficulty_bits(&chain, &tip, 60, ceiling),
            CompactTarget::from_consensus(0x1c1a1206)
        );

        // A retarget boundary stops the walk even at the ceiling.
        assert_eq!(last_non_min_difficulty_bits(&chain, &tip, 4, ceiling), ceiling);
    }

    #[test]
    fn test_window_start_reports_short_history() {
        let chain = synthetic_chain(100, 10, |i| T0 + i, |_| 0x1c1a1206);
        let tip = *chain.tip().unwrap();
        assert_eq!(window_start(&chain, &tip, 9).map(|e| e.height), Some(100));
        assert!(window_start(&chain, &tip, 10).is_none());
    }
}
