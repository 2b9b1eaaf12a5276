//! Network selection and per-network profiles.
//!
//! A profile bundles everything that differs between main, test and regtest:
//! wire magic, port, genesis, checkpoints, address prefixes, seeds and the
//! consensus rule table. Each profile is built and genesis-checked at most
//! once per process, then handed out as `&'static NetworkProfile`.

use crate::chain_index::{ChainEntry, ChainIndex};
use crate::chain_params;
use crate::compact::CompactTarget;
use crate::consensus_params::{ConsensusRuleSet, ConsensusRuleStore};
use crate::difficulty::get_required_difficulty;
use crate::genesis::{GenesisBlock, GenesisParams};
use crate::header::{BlockHash, BlockHeader};
use crate::pow::check_proof_of_work;
use crate::{ConsensusError, ConsensusResult};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Test, Network::Regtest];

    pub fn name(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ConsensusError::UnknownNetwork(other.to_string())),
        }
    }
}

/// A hardcoded block hash at a given height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub height: u32,
    pub hash: BlockHash,
}

/// Transaction statistics used to estimate sync progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainTxData {
    /// UNIX time of the last known block.
    pub time: i64,
    /// Transactions between genesis and that block.
    pub tx_count: u64,
    /// Estimated transactions per second after it.
    pub tx_rate: f64,
}

/// Version bytes for base58 encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base58Prefixes {
    pub pubkey_address: Vec<u8>,
    pub script_address: Vec<u8>,
    pub secret_key: Vec<u8>,
    pub ext_public_key: Vec<u8>,
    pub ext_secret_key: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsSeed {
    pub name: &'static str,
    pub host: &'static str,
}

/// Everything the node needs to know about one network.
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    pub network: Network,
    /// P2P message start bytes.
    pub message_start: [u8; 4],
    pub default_port: u16,
    pub prune_after_height: u64,
    pub genesis_params: GenesisParams,
    /// The genesis block, built and checked against `genesis_params`.
    pub genesis: GenesisBlock,
    /// Sorted by height.
    pub checkpoints: Vec<Checkpoint>,
    pub chain_tx_data: ChainTxData,
    pub base58_prefixes: Base58Prefixes,
    pub dns_seeds: Vec<DnsSeed>,
    pub mining_requires_peers: bool,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    pub rules: ConsensusRuleStore,
}

static MAIN: OnceCell<NetworkProfile> = OnceCell::new();
static TEST: OnceCell<NetworkProfile> = OnceCell::new();
static REGTEST: OnceCell<NetworkProfile> = OnceCell::new();

impl NetworkProfile {
    /// The process-wide profile for a network name ("main", "test",
    /// "regtest"). Builds and genesis-checks it on first use.
    pub fn select(name: &str) -> ConsensusResult<&'static NetworkProfile> {
        Self::get(name.parse()?)
    }

    /// The process-wide profile for `network`.
    pub fn get(network: Network) -> ConsensusResult<&'static NetworkProfile> {
        let cell = match network {
            Network::Main => &MAIN,
            Network::Test => &TEST,
            Network::Regtest => &REGTEST,
        };
        cell.get_or_try_init(|| chain_params::build_profile(network))
    }

    /// Rule-set governing a block at `height`.
    pub fn rule_set(&self, height: u32) -> &ConsensusRuleSet {
        self.rules.get(height)
    }

    pub fn genesis_hash(&self) -> BlockHash {
        self.genesis.hash()
    }

    /// Bits required for `candidate` on top of `tip`, using the rules active
    /// at the candidate's height.
    pub fn required_difficulty<I: ChainIndex + ?Sized>(
        &self,
        index: &I,
        tip: &ChainEntry,
        candidate: &BlockHeader,
    ) -> CompactTarget {
        let rules = self.rule_set(tip.height.saturating_add(1));
        get_required_difficulty(index, tip, candidate, rules)
    }

    /// Check a PoW hash against bits, using the rules active at `height`.
    pub fn check_proof_of_work(&self, hash: &BlockHash, bits: CompactTarget, height: u32) -> bool {
        check_proof_of_work(hash, bits, self.rule_set(height))
    }

    /// Hardcoded hash at `height`, if there is a checkpoint there.
    pub fn checkpoint(&self, height: u32) -> Option<&BlockHash> {
        self.checkpoints
            .binary_search_by_key(&height, |c| c.height)
            .ok()
            .map(|i| &self.checkpoints[i].hash)
    }

    pub fn last_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }
}
