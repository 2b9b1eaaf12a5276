//! Test harness for integration tests.
//!
//! Wraps a selected network profile with the shortcuts the suites need.

use crate::generators::candidate_header;
use smartcoin_consensus::{
    ChainEntry, ChainIndex, CompactTarget, ConsensusRuleSet, InMemoryChain, Network, NetworkProfile,
    RetargetAlgorithm,
};

/// Test context bound to one network profile.
pub struct TestContext {
    /// The process-wide profile.
    pub profile: &'static NetworkProfile,
}

impl TestContext {
    /// Create a context for `network`.
    pub fn new(network: Network) -> Self {
        let profile = NetworkProfile::get(network).expect("built-in profile must build");
        Self { profile }
    }

    pub fn main() -> Self {
        Self::new(Network::Main)
    }

    pub fn test() -> Self {
        Self::new(Network::Test)
    }

    pub fn regtest() -> Self {
        Self::new(Network::Regtest)
    }

    pub fn rules_at(&self, height: u32) -> &ConsensusRuleSet {
        self.profile.rule_set(height)
    }

    /// Algorithm that would retarget a block at `height`.
    pub fn algorithm_at(&self, height: u32) -> RetargetAlgorithm {
        RetargetAlgorithm::select(self.rules_at(height), height)
    }

    /// Bits required for a block at `time` on top of the chain's tip.
    pub fn next_bits(&self, chain: &InMemoryChain, time: u32) -> CompactTarget {
        let tip = *chain.tip().expect("chain must not be empty");
        self.next_bits_on(chain, &tip, time)
    }

    /// Bits required for a block at `time` on top of `tip`.
    pub fn next_bits_on<I: ChainIndex + ?Sized>(
        &self,
        index: &I,
        tip: &ChainEntry,
        time: u32,
    ) -> CompactTarget {
        self.profile.required_difficulty(index, tip, &candidate_header(tip, time))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::main()
    }
}

/// Route `tracing` output through the test writer. Safe to call repeatedly.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
