//! Proof-of-work target verification.

use crate::compact::CompactTarget;
use crate::consensus_params::ConsensusRuleSet;
use crate::header::BlockHash;
use num_traits::Zero;
use std::fmt;
use tracing::debug;

/// Outcome of checking a hash against compact bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowCheck {
    /// Target in range and the hash meets it.
    Valid,
    /// Bits carry the sign flag.
    NegativeTarget,
    /// Bits decode to zero.
    ZeroTarget,
    /// Bits do not fit in 256 bits.
    OverflowTarget,
    /// Target easier than the network ceiling.
    AboveLimit,
    /// Target well-formed but the hash is larger.
    HashAboveTarget,
}

impl PowCheck {
    pub fn is_valid(self) -> bool {
        self == PowCheck::Valid
    }
}

impl fmt::Display for PowCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            PowCheck::Valid => "valid",
            PowCheck::NegativeTarget => "negative target",
            PowCheck::ZeroTarget => "zero target",
            PowCheck::OverflowTarget => "target overflows 256 bits",
            PowCheck::AboveLimit => "target above proof-of-work limit",
            PowCheck::HashAboveTarget => "hash above target",
        };
        f.write_str(reason)
    }
}

/// Check `hash` against `bits`, naming the reason on rejection.
pub fn check_proof_of_work_detailed(
    hash: &BlockHash,
    bits: CompactTarget,
    rules: &ConsensusRuleSet,
) -> PowCheck {
    let decoded = bits.decode();

    let verdict = if decoded.negative {
        PowCheck::NegativeTarget
    } else if decoded.overflow {
        PowCheck::OverflowTarget
    } else if decoded.value.is_zero() {
        PowCheck::ZeroTarget
    } else if decoded.value > rules.pow_limit {
        PowCheck::AboveLimit
    } else if hash.to_biguint() > decoded.value {
        PowCheck::HashAboveTarget
    } else {
        PowCheck::Valid
    };

    if !verdict.is_valid() {
        debug!(%hash, %bits, reason = %verdict, "Proof of work rejected");
    }
    verdict
}

/// True iff the bits are well-formed, within the ceiling, and `hash` meets
/// them.
pub fn check_proof_of_work(
    hash: &BlockHash,
    bits: CompactTarget,
    rules: &ConsensusRuleSet,
) -> bool {
    check_proof_of_work_detailed(hash, bits, rules).is_valid()
}

/// Whether a candidate may be mined at the ceiling because the chain stalled.
///
/// Only applies on networks that allow it, from height 157500 on, and once
/// the candidate is more than two spacings later than the tip.
pub fn allows_min_difficulty_for_block(
    rules: &ConsensusRuleSet,
    tip_height: u32,
    tip_time: u32,
    candidate_time: u32,
) -> bool {
    if !rules.pow_allow_min_difficulty_blocks {
        return false;
    }
    if tip_height < crate::params::MIN_DIFFICULTY_ACTIVATION_HEIGHT {
        return false;
    }
    i64::from(candidate_time) > i64::from(tip_time) + rules.pow_target_spacing * 2
}
