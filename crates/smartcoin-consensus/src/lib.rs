//! # smartcoin-consensus
//!
//! Consensus core for the Smartcoin blockchain.
//!
//! This crate provides:
//! - Height-indexed consensus rule-set lookup
//! - Difficulty retargeting across the historical algorithms
//! - Proof-of-work hashing (scrypt / X11) and target verification
//! - Deterministic genesis construction for main, test and regtest
//!
//! ## Difficulty
//!
//! Smartcoin changed its retargeting algorithm several times by hard fork:
//! a Litecoin-style periodic retarget, then Kimoto Gravity Well, a single
//! paused block at fork2, DigiShield, and finally Dark Gravity Wave. All of
//! them reproduce the wrapping 256-bit arithmetic of the chain's original
//! validation code.
//!
//! ## Proof of Work
//!
//! scrypt (N=1024, r=1, p=1) except for headers timestamped inside the X11
//! window, which are hashed with X11. The identity hash is always double
//! SHA-256 of the 80-byte header.

mod arith;
pub mod chain_index;
pub mod chain_params;
pub mod compact;
pub mod consensus_params;
pub mod difficulty;
mod error;
pub mod genesis;
pub mod header;
pub mod network;
pub mod pow;
pub mod pow_hash;
pub mod transaction;

pub use chain_index::{ChainEntry, ChainIndex, InMemoryChain};
pub use compact::{CompactTarget, DecodedTarget};
pub use consensus_params::{ConsensusRuleSet, ConsensusRuleStore};
pub use difficulty::{calculate_next_work_required, get_required_difficulty, RetargetAlgorithm};
pub use error::{ConsensusError, ConsensusResult};
pub use genesis::{build_genesis, GenesisBlock, GenesisParams};
pub use header::{sha256d, BlockHash, BlockHeader, HEADER_SIZE};
pub use network::{Network, NetworkProfile};
pub use pow::{
    allows_min_difficulty_for_block, check_proof_of_work, check_proof_of_work_detailed, PowCheck,
};
pub use pow_hash::{compute_pow_hash, PowAlgorithm};
pub use transaction::{Script, Transaction, COIN};

/// Smartcoin consensus constants shared by every network.
pub mod params {
    /// Tip height from which stalled chains may fall back to the ceiling.
    pub const MIN_DIFFICULTY_ACTIVATION_HEIGHT: u32 = 157_500;

    /// Legacy retarget: a candidate this many spacings after the tip may be
    /// mined at the ceiling (on networks that allow it).
    pub const LEGACY_MIN_DIFFICULTY_SPACINGS: i64 = 90;

    /// Kimoto Gravity Well minimum sample, in seconds (0.0185 days).
    pub const KGW_PAST_SECONDS_MIN: i64 = 1_598;

    /// Kimoto Gravity Well maximum sample, in seconds (0.23125 days).
    pub const KGW_PAST_SECONDS_MAX: i64 = 19_980;

    /// DigiShield spacing from fork2 on, in seconds.
    pub const DIGISHIELD_FORK2_SPACING: i64 = 30;

    /// DigiShield spacing from the X11 fork height on, in seconds.
    pub const DIGISHIELD_X11_SPACING: i64 = 120;

    /// Dark Gravity Wave sample size, and the minimum tip height it needs.
    pub const DGW_PAST_BLOCKS: i64 = 24;

    /// Dark Gravity Wave target spacing, in seconds.
    pub const DGW_TARGET_SPACING: i64 = 120;
}
