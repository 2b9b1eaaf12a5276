//! Test data generators for integration tests.
//!
//! Provides synthetic chains, candidate headers and the historical retarget
//! fixtures recorded from the live main network.

use smartcoin_consensus::{
    check_proof_of_work, BlockHash, BlockHeader, ChainEntry, CompactTarget, ConsensusRuleSet,
    InMemoryChain,
};

/// A time in December 2013, before the X11 window.
pub const BASE_TIME: u32 = 1_386_474_927;

/// Build a chain entry from raw bits.
pub fn entry(height: u32, time: u32, bits: u32) -> ChainEntry {
    ChainEntry::new(height, time, CompactTarget::from_consensus(bits))
}

/// A contiguous chain of `len` blocks from `base`. Both closures receive the
/// offset from `base`.
pub fn chain_with(
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

/// A chain with constant spacing and constant bits.
pub fn steady_chain(
    base: u32,
    len: u32,
    start_time: u32,
    spacing: u32,
    bits: u32,
) -> InMemoryChain {
    chain_with(base, len, |i| start_time + spacing * i, |_| bits)
}

/// Header for a block at `time`, built on `parent`.
pub fn candidate_header(parent: &ChainEntry, time: u32) -> BlockHeader {
    BlockHeader {
        version: 1,
        prev_block_hash: parent.hash,
        merkle_root: BlockHash::ZERO,
        time,
        bits: parent.bits,
        nonce: 0,
    }
}

/// Increment the nonce until the header's PoW hash meets its own bits.
/// Returns `None` if `max_tries` nonces all fail.
pub fn mine_header(
    mut header: BlockHeader,
    rules: &ConsensusRuleSet,
    max_tries: u32,
) -> Option<BlockHeader> {
    for nonce in 0..max_tries {
        header.nonce = nonce;
        let hash = header.pow_hash().ok()?;
        if check_proof_of_work(&hash, header.bits, rules) {
            return Some(header);
        }
    }
    None
}

// ============================================================================
// Historical retarget fixtures
// ============================================================================

/// One recorded legacy retarget on the main network.
#[derive(Debug, Clone, Copy)]
pub struct RetargetFixture {
    pub tip_height: u32,
    pub tip_time: u32,
    pub tip_bits: u32,
    /// Time of the block at the start of the retarget window.
    pub first_block_time: i64,
    pub expected_bits: u32,
}

impl RetargetFixture {
    pub fn tip(&self) -> ChainEntry {
        entry(self.tip_height, self.tip_time, self.tip_bits)
    }

    /// The window from its first block up to the tip, with the recorded
    /// times at both ends and evenly spread times in between. Every block
    /// carries the tip's bits.
    pub fn window(&self, lookback: u32) -> InMemoryChain {
        let base = self.tip_height - lookback;
        let first = self.first_block_time as u32;
        let span = i64::from(self.tip_time) - self.first_block_time;
        chain_with(
            base,
            lookback + 1,
            |i| {
                if i == lookback {
                    self.tip_time
                } else {
                    (i64::from(first) + span * i64::from(i) / i64::from(lookback)) as u32
                }
            },
            |_| self.tip_bits,
        )
    }
}

pub const RETARGET_FIXTURES: [RetargetFixture; 6] = [
    RetargetFixture {
        tip_height: 239,
        tip_time: 1_386_475_638,
        tip_bits: 0x1e0ffff0,
        first_block_time: 1_386_474_927,
        expected_bits: 0x1e04bd6b,
    },
    RetargetFixture {
        tip_height: 9_599,
        tip_time: 1_386_954_113,
        tip_bits: 0x1c1a1206,
        first_block_time: 1_386_942_008,
        expected_bits: 0x1c684818,
    },
    RetargetFixture {
        tip_height: 145_000,
        tip_time: 1_395_094_679,
        tip_bits: 0x1b499dfd,
        first_block_time: 1_395_094_427,
        expected_bits: 0x1b12677f,
    },
    RetargetFixture {
        tip_height: 145_001,
        tip_time: 1_395_094_727,
        tip_bits: 0x1b671062,
        first_block_time: 1_395_094_679,
        expected_bits: 0x1b19c418,
    },
    RetargetFixture {
        tip_height: 145_107,
        tip_time: 1_395_101_360,
        tip_bits: 0x1b3439cd,
        first_block_time: 1_395_100_835,
        expected_bits: 0x1b0d0e73,
    },
    RetargetFixture {
        tip_height: 149_423,
        tip_time: 1_395_380_447,
        tip_bits: 0x1b446f21,
        first_block_time: 1_395_380_517,
        expected_bits: 0x1b111bc8,
    },
];
