//! Genesis block construction.
//!
//! Every network bootstraps from a block built deterministically out of a
//! handful of literal parameters. The result is checked against the network's
//! hardcoded hash and merkle root before the profile is handed out.

use crate::compact::CompactTarget;
use crate::header::{BlockHash, BlockHeader};
use crate::transaction::{OutPoint, Script, Transaction, TxIn, TxOut, OP_0, OP_CHECKSIG};
use crate::{ConsensusError, ConsensusResult};
use tracing::debug;

/// Headline embedded in every Smartcoin genesis coinbase.
pub const GENESIS_MESSAGE: &str =
    "5 reasons Big Block of Cheese Day Part IV could be a very bad idea";

/// First number pushed by the genesis coinbase script (0x1d00ffff).
const GENESIS_SCRIPT_BITS: i64 = 486_604_799;

/// Second number pushed by the genesis coinbase script.
const GENESIS_SCRIPT_EXTRA: i64 = 4;

/// Literal inputs for a genesis block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisParams {
    pub time: u32,
    pub nonce: u32,
    pub bits: CompactTarget,
    pub version: i32,
    /// Coinbase output value in base units.
    pub reward: i64,
    /// Hash the built block must reproduce.
    pub expected_hash: BlockHash,
    /// Merkle root the built block must reproduce.
    pub expected_merkle_root: BlockHash,
}

/// A built genesis block: header plus its single coinbase transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisBlock {
    pub header: BlockHeader,
    pub coinbase: Transaction,
}

impl GenesisBlock {
    pub fn hash(&self) -> BlockHash {
        self.header.hash()
    }
}

/// Output script shared by the network genesis blocks (`OP_0 OP_CHECKSIG`).
pub fn genesis_output_script() -> Script {
    Script::new().push_opcode(OP_0).push_opcode(OP_CHECKSIG)
}

/// Build a genesis block.
///
/// The coinbase spends the null outpoint with script
/// `push(486604799) push(4) push(message)` and pays `reward` to
/// `output_script`. With a single transaction the merkle root is its txid.
pub fn build_genesis(
    message: &str,
    output_script: &Script,
    time: u32,
    nonce: u32,
    bits: CompactTarget,
    version: i32,
    reward: i64,
) -> GenesisBlock {
    let script_sig = Script::new()
        .push_int(GENESIS_SCRIPT_BITS)
        .push_script_num(GENESIS_SCRIPT_EXTRA)
        .push_slice(message.as_bytes());

    let coinbase = Transaction {
        version: 1,
        inputs: vec![TxIn {
            prevout: OutPoint::NULL,
            script_sig,
            sequence: u32::MAX,
        }],
        outputs: vec![TxOut {
            value: reward,
            script_pubkey: output_script.clone(),
        }],
        lock_time: 0,
    };

    let header = BlockHeader {
        version,
        prev_block_hash: BlockHash::ZERO,
        merkle_root: coinbase.txid(),
        time,
        bits,
        nonce,
    };

    GenesisBlock { header, coinbase }
}

/// Build the genesis block for `params` using the network message and script.
pub fn build_network_genesis(params: &GenesisParams) -> GenesisBlock {
    build_genesis(
        GENESIS_MESSAGE,
        &genesis_output_script(),
        params.time,
        params.nonce,
        params.bits,
        params.version,
        params.reward,
    )
}

/// Build the genesis block and compare it with the expected hash and merkle
/// root.
pub fn verify_genesis(network: &str, params: &GenesisParams) -> ConsensusResult<GenesisBlock> {
    let block = build_network_genesis(params);

    let merkle_root = block.header.merkle_root;
    if merkle_root != params.expected_merkle_root {
        return Err(ConsensusError::GenesisMismatch {
            network: network.to_string(),
            field: "merkle root",
            got: merkle_root.to_string(),
            expected: params.expected_merkle_root.to_string(),
        });
    }

    let hash = block.hash();
    if hash != params.expected_hash {
        return Err(ConsensusError::GenesisMismatch {
            network: network.to_string(),
            field: "hash",
            got: hash.to_string(),
            expected: params.expected_hash.to_string(),
        });
    }

    debug!(network, %hash, "Genesis block verified");
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::COIN;

    const MAIN_GENESIS_HASH: &str =
        "142d2acd2480363e89fad37be56ff3b8993dd8da2be2525d75b02e202b0467a7";
    const MAIN_MERKLE_ROOT: &str =
        "bc7cd78fd30e1ec47e66da50b6eedbaec8d95d01e68f58cb0b2c5e83e9cb8dd3";

    fn main_params() -> GenesisParams {
        GenesisParams {
            time: 1390694380,
            nonce: 134632,
            bits: CompactTarget::from_consensus(0x1e0ffff0),
            version: 1,
            reward: 0,
            expected_hash: MAIN_GENESIS_HASH.parse().unwrap(),
            expected_merkle_root: MAIN_MERKLE_ROOT.parse().unwrap(),
        }
    }

    #[test]
    fn test_main_genesis_coinbase_bytes() {
        let block = build_network_genesis(&main_params());
        assert_eq!(
            hex::encode(block.coinbase.serialize()),
            "01000000010000000000000000000000000000000000000000000000000000000000000000\
             ffffffff4a04ffff001d0104423520726561736f6e732042696720426c6f636b206f6620\
             43686565736520446179205061727420495620636f756c6420626520612076657279206261\
             642069646561ffffffff0100000000000000000200ac00000000"
        );
        assert!(block.coinbase.is_coinbase());
    }

    #[test]
    fn test_main_genesis_matches() {
        let block = verify_genesis("main", &main_params()).unwrap();
        assert_eq!(block.header.merkle_root.to_string(), MAIN_MERKLE_ROOT);
        assert_eq!(block.hash().to_string(), MAIN_GENESIS_HASH);
        assert_eq!(block.header.prev_block_hash, BlockHash::ZERO);
    }

    #[test]
    fn test_reward_changes_merkle_root() {
        let mut params = main_params();
        params.reward = 88 * COIN;
        let block = build_network_genesis(&params);
        assert_eq!(
            block.header.merkle_root.to_string(),
            "401c7be7b6c88a32fb1563165b3aa729e44e447cd3d19cb5ced56719e4495de5"
        );
    }

    #[test]
    fn test_mismatch_reports_field() {
        let mut params = main_params();
        params.nonce += 1;
        match verify_genesis("main", &params) {
            Err(ConsensusError::GenesisMismatch { field, network, .. }) => {
                assert_eq!(field, "hash");
                assert_eq!(network, "main");
            }
            other => panic!("expected hash mismatch, got {other:?}"),
        }

        let mut params = main_params();
        params.reward = 1;
        match verify_genesis("main", &params) {
            Err(ConsensusError::GenesisMismatch { field, .. }) => {
                assert_eq!(field, "merkle root")
            }
            other => panic!("expected merkle mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_long_message_uses_pushdata1() {
        // 90-byte headline with a pay-to-pubkey output.
        let message = "Wired 09/Jan/2014 The Grand Experiment Goes Live: \
                       Overstock.com Is Now Accepting Bitcoins";
        let pubkey = hex::decode(
            "040184710fa689ad5023690c80f3a49c8f13f8d45b8c857fbcbc8bc4a8e4d3eb4b\
             10f4d4604fa08dce601aaf0f470216fe1b51850b4acf21b179c45070ac7b03a9",
        )
        .unwrap();
        let script = Script::new().push_slice(&pubkey).push_opcode(OP_CHECKSIG);

        let block = build_genesis(
            message,
            &script,
            1390095618,
            28917698,
            CompactTarget::from_consensus(0x1e0ffff0),
            1,
            50 * COIN,
        );
        assert_eq!(
            block.header.merkle_root.to_string(),
            "e0028eb9648db56b1ac77cf090b99048a8007e2bb64b68f092c03c7f56a662c7"
        );
    }
}
