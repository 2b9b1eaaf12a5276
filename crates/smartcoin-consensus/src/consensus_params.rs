//! Height-indexed consensus rule-sets.
//!
//! A network's consensus rules changed at a few fixed heights. Each change is
//! a complete `ConsensusRuleSet` tagged with the height it takes effect at,
//! and the `ConsensusRuleStore` answers "which rules govern height H" with a
//! binary search over the effective heights.

use crate::compact::CompactTarget;
use crate::header::BlockHash;
use crate::{ConsensusError, ConsensusResult};
use num_bigint::BigUint;

/// One complete set of consensus parameters.
///
/// Heights are block heights; time values are seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusRuleSet {
    /// First height these rules govern.
    pub height_effective: u32,

    /// Easiest allowed target (the PoW ceiling).
    pub pow_limit: BigUint,
    /// Intended seconds between blocks.
    pub pow_target_spacing: i64,
    /// Seconds covered by one legacy retarget window.
    pub pow_target_timespan: i64,
    /// From this height the legacy retarget looks back four windows and
    /// damps the elapsed time by four.
    pub adjustment_interval_fork_height: u32,
    /// Kimoto Gravity Well activation.
    pub fork1_height: u32,
    /// DigiShield with 30 second spacing. The block exactly at this height
    /// keeps its parent's bits.
    pub fork2_height: u32,
    /// Two minute spacing for DigiShield.
    pub x11_fork_height: u32,
    /// Subsidy step; not consulted by retargeting.
    pub fork3_height: u32,
    /// Dark Gravity Wave activation.
    pub fork4_height: u32,

    /// Every block keeps its parent's bits.
    pub pow_no_retargeting: bool,
    /// Blocks may fall back to the ceiling when the chain stalls.
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_allow_digishield_min_difficulty_blocks: bool,
    pub digishield_difficulty_calculation: bool,
    /// Non-AuxPoW block versions are still accepted.
    pub allow_legacy_blocks: bool,

    /// Merged-mining chain id.
    pub auxpow_chain_id: i32,
    pub strict_chain_id: bool,

    pub coinbase_maturity: u32,
    pub subsidy_halving_interval: u32,
    pub majority_enforce_block_upgrade: u32,
    pub majority_reject_block_outdated: u32,
    pub majority_window: u32,
    pub bip34_height: u32,
    pub bip34_hash: BlockHash,
    pub rule_change_activation_threshold: u32,
    pub miner_confirmation_window: u32,
    pub minimum_chain_work: BigUint,
    pub default_assume_valid: BlockHash,
}

impl ConsensusRuleSet {
    /// Blocks per legacy retarget window.
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    /// The ceiling in compact form.
    pub fn pow_limit_compact(&self) -> CompactTarget {
        CompactTarget::from_target(&self.pow_limit)
    }
}

/// Ordered collection of rule-sets for one network.
#[derive(Debug, Clone)]
pub struct ConsensusRuleStore {
    /// Sorted by strictly increasing effective height, first entry at 0.
    rule_sets: Vec<ConsensusRuleSet>,
}

impl ConsensusRuleStore {
    /// Build a store, rejecting tables that cannot answer every height.
    pub fn new(rule_sets: Vec<ConsensusRuleSet>) -> ConsensusResult<Self> {
        let first = rule_sets
            .first()
            .ok_or_else(|| ConsensusError::InvalidRuleStore("no rule-sets".to_string()))?;

        if first.height_effective != 0 {
            return Err(ConsensusError::InvalidRuleStore(format!(
                "first rule-set takes effect at {}, expected 0",
                first.height_effective
            )));
        }

        if let Some(pair) = rule_sets
            .windows(2)
            .find(|pair| pair[0].height_effective >= pair[1].height_effective)
        {
            return Err(ConsensusError::InvalidRuleStore(format!(
                "effective heights not strictly increasing: {} then {}",
                pair[0].height_effective, pair[1].height_effective
            )));
        }

        if let Some(rules) = rule_sets
            .iter()
            .find(|r| r.pow_target_spacing <= 0 || r.difficulty_adjustment_interval() <= 0)
        {
            return Err(ConsensusError::InvalidRuleStore(format!(
                "rule-set at {} has spacing {} and timespan {}",
                rules.height_effective, rules.pow_target_spacing, rules.pow_target_timespan
            )));
        }

        Ok(Self { rule_sets })
    }

    /// The rule-set with the greatest effective height not above `height`.
    pub fn get(&self, height: u32) -> &ConsensusRuleSet {
        let idx = self
            .rule_sets
            .partition_point(|rules| rules.height_effective <= height);
        // The first entry is effective at 0, so idx >= 1.
        &self.rule_sets[idx.saturating_sub(1)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsensusRuleSet> {
        self.rule_sets.iter()
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use num_traits::One;

    /// A rule-set with main-network retarget values, for unit tests.
    pub(crate) fn sample_rules(height_effective: u32) -> ConsensusRuleSet {
        ConsensusRuleSet {
            height_effective,
            pow_limit: (BigUint::one() << 236usize) - 1u32,
            pow_target_spacing: 40,
            pow_target_timespan: 2400,
            adjustment_interval_fork_height: 15_001,
            fork1_height: 35_000,
            fork2_height: 200_000,
            x11_fork_height: 289_872,
            fork3_height: 300_000,
            fork4_height: 385_000,
            pow_no_retargeting: false,
            pow_allow_min_difficulty_blocks: false,
            pow_allow_digishield_min_difficulty_blocks: false,
            digishield_difficulty_calculation: false,
            allow_legacy_blocks: true,
            auxpow_chain_id: 0x62,
            strict_chain_id: false,
            coinbase_maturity: 15,
            subsidy_halving_interval: 647_800,
            majority_enforce_block_upgrade: 1500,
            majority_reject_block_outdated: 1900,
            majority_window: 2000,
            bip34_height: 1_000_000,
            bip34_hash: BlockHash::ZERO,
            rule_change_activation_threshold: 9576,
            miner_confirmation_window: 10_080,
            minimum_chain_work: BigUint::from(0u32),
            default_assume_valid: BlockHash::ZERO,
        }
    }

    #[test]
    fn test_interval_and_ceiling() {
        let rules = sample_rules(0);
        assert_eq!(rules.difficulty_adjustment_interval(), 60);
        assert_eq!(rules.pow_limit_compact(), CompactTarget::from_consensus(0x1e0fffff));
    }

    #[test]
    fn test_lookup_picks_latest_effective() {
        let store = ConsensusRuleStore::new(vec![
            sample_rules(0),
            sample_rules(145_000),
            sample_rules(157_500),
            sample_rules(158_100),
        ])
        .unwrap();

        assert_eq!(store.get(0).height_effective, 0);
        assert_eq!(store.get(144_999).height_effective, 0);
        assert_eq!(store.get(145_000).height_effective, 145_000);
        assert_eq!(store.get(157_499).height_effective, 145_000);
        assert_eq!(store.get(157_500).height_effective, 157_500);
        assert_eq!(store.get(158_099).height_effective, 157_500);
        assert_eq!(store.get(158_100).height_effective, 158_100);
        assert_eq!(store.get(u32::MAX).height_effective, 158_100);
    }

    #[test]
    fn test_single_entry_answers_everything() {
        let store = ConsensusRuleStore::new(vec![sample_rules(0)]).unwrap();
        for height in [0, 1, 35_000, 385_000, u32::MAX] {
            assert_eq!(store.get(height).height_effective, 0);
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_tables() {
        assert!(matches!(
            ConsensusRuleStore::new(vec![]),
            Err(ConsensusError::InvalidRuleStore(_))
        ));
        assert!(ConsensusRuleStore::new(vec![sample_rules(10)]).is_err());
        assert!(ConsensusRuleStore::new(vec![sample_rules(0), sample_rules(0)]).is_err());
        assert!(
            ConsensusRuleStore::new(vec![sample_rules(0), sample_rules(20), sample_rules(10)])
                .is_err()
        );

        let mut zero_spacing = sample_rules(0);
        zero_spacing.pow_target_spacing = 0;
        assert!(ConsensusRuleStore::new(vec![zero_spacing]).is_err());

        let mut short_timespan = sample_rules(0);
        short_timespan.pow_target_timespan = 10;
        assert!(ConsensusRuleStore::new(vec![short_timespan]).is_err());
    }
}
