//! Hardcoded parameter tables for each network.
//!
//! Rule-sets on test and regtest are derived from the network's base set with
//! struct update syntax, mirroring how the rules were amended at each fork.

use crate::compact::CompactTarget;
use crate::consensus_params::{ConsensusRuleSet, ConsensusRuleStore};
use crate::genesis::{verify_genesis, GenesisParams};
use crate::header::BlockHash;
use crate::network::{
    Base58Prefixes, ChainTxData, Checkpoint, DnsSeed, Network, NetworkProfile,
};
use crate::transaction::COIN;
use crate::ConsensusResult;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::info;

/// Build and genesis-check the profile for `network`.
pub fn build_profile(network: Network) -> ConsensusResult<NetworkProfile> {
    let profile = match network {
        Network::Main => main_profile()?,
        Network::Test => test_profile()?,
        Network::Regtest => regtest_profile()?,
    };

    info!(
        network = %profile.network,
        genesis = %profile.genesis_hash(),
        rule_sets = profile.rules.len(),
        "Network profile ready"
    );
    Ok(profile)
}

/// `2^bits - 1`.
fn pow_limit(bits: usize) -> BigUint {
    (BigUint::one() << bits) - 1u32
}

fn uint_hex(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("valid chain work hex")
}

fn checkpoints(entries: &[(u32, &str)]) -> Vec<Checkpoint> {
    entries
        .iter()
        .map(|&(height, hash)| Checkpoint {
            height,
            hash: BlockHash::from_hex_const(hash),
        })
        .collect()
}

fn bitcoin_test_prefixes(pubkey: u8, script: u8, secret: u8) -> Base58Prefixes {
    Base58Prefixes {
        pubkey_address: vec![pubkey],
        script_address: vec![script],
        secret_key: vec![secret],
        ext_public_key: vec![0x04, 0x35, 0x87, 0xcf],
        ext_secret_key: vec![0x04, 0x35, 0x83, 0x94],
    }
}

// ============================================================================
// Main network
// ============================================================================

/// Single rule-set; every fork on main is expressed through fork heights.
pub fn main_rules() -> Vec<ConsensusRuleSet> {
    vec![ConsensusRuleSet {
        height_effective: 0,
        pow_limit: pow_limit(236),
        pow_target_spacing: 40,
        pow_target_timespan: 60 * 40,
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
        auxpow_chain_id: 0x0062,
        strict_chain_id: false,
        coinbase_maturity: 15,
        subsidy_halving_interval: 647_800,
        majority_enforce_block_upgrade: 1500,
        majority_reject_block_outdated: 1900,
        majority_window: 2000,
        bip34_height: 1_000_000,
        bip34_hash: BlockHash::from_hex_const(
            "3bcf5c1125fd5b01ed7106d064dc02c5a5662b16f37f8d29bf9259a722a8c6ba",
        ),
        rule_change_activation_threshold: 9576,
        miner_confirmation_window: 10_080,
        minimum_chain_work: uint_hex("141a39e783aad4f660f"),
        default_assume_valid: BlockHash::from_hex_const(
            "b343373a54c719686ac59c3f004ad8c5cbe1e7b9bbb3e2bafc404a697530d2bb",
        ),
    }]
}

fn main_profile() -> ConsensusResult<NetworkProfile> {
    let genesis_params = GenesisParams {
        time: 1390694380,
        nonce: 134632,
        bits: CompactTarget::from_consensus(0x1e0ffff0),
        version: 1,
        reward: 0,
        expected_hash: BlockHash::from_hex_const(
            "142d2acd2480363e89fad37be56ff3b8993dd8da2be2525d75b02e202b0467a7",
        ),
        expected_merkle_root: BlockHash::from_hex_const(
            "bc7cd78fd30e1ec47e66da50b6eedbaec8d95d01e68f58cb0b2c5e83e9cb8dd3",
        ),
    };
    let genesis = verify_genesis(Network::Main.name(), &genesis_params)?;

    Ok(NetworkProfile {
        network: Network::Main,
        message_start: [0xde, 0xfa, 0xce, 0xd0],
        default_port: 58585,
        prune_after_height: 100_000,
        genesis_params,
        genesis,
        checkpoints: checkpoints(&[
            (100, "51e6152ac01691360850108d3acbfdb6bc72312a6d50e551424a745a7ddc28ec"),
            (1_000, "d8d586d8e99ecdff7d9bcc412e1b8f301e2c5641768b537801e9a7f0619297d6"),
            (10_000, "12b0fee6a4a6324a1c3a0f94bfc4cdc3c373a90d680209042dbb612b4349616a"),
            (100_000, "0c0628dc3b5df07c22fff9ace256b83e9b6c8c7c664b49b2ab5d3b2e485efb7e"),
            (500_000, "50bb03ea8bc032d627c4e2b24e913b822915c2a622ce4a4ae48d531fb2f746ff"),
            (1_000_000, "3bcf5c1125fd5b01ed7106d064dc02c5a5662b16f37f8d29bf9259a722a8c6ba"),
            (1_500_000, "b49e622f7a25b8281d1d5285fff910f260417dad864a1f4344eac675563d3743"),
            (2_000_000, "e189dbd6d907239010d1153b4eba5592f32ef65d8898006ab5b6b9e114e0d7f3"),
            (2_500_000, "b343373a54c719686ac59c3f004ad8c5cbe1e7b9bbb3e2bafc404a697530d2bb"),
        ]),
        chain_tx_data: ChainTxData {
            time: 1585966963,
            tx_count: 2_800_000,
            tx_rate: 0.0083,
        },
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![63],
            script_address: vec![5],
            secret_key: vec![176],
            ext_public_key: vec![0x02, 0xfa, 0xca, 0xfd],
            ext_secret_key: vec![0x02, 0xfa, 0xc3, 0x98],
        },
        dns_seeds: Vec::new(),
        mining_requires_peers: true,
        default_consistency_checks: false,
        require_standard: true,
        mine_blocks_on_demand: false,
        rules: ConsensusRuleStore::new(main_rules())?,
    })
}

// ============================================================================
// Test network
// ============================================================================

/// Four rule-sets: pre-DigiShield, DigiShield at 145000, min-difficulty
/// blocks at 157500 and AuxPoW-only at 158100.
///
/// Fork heights are all zero on test, so Dark Gravity Wave governs every
/// block regardless of which rule-set is active.
pub fn test_rules() -> Vec<ConsensusRuleSet> {
    let base = ConsensusRuleSet {
        height_effective: 0,
        pow_limit: pow_limit(236),
        pow_target_spacing: 60,
        pow_target_timespan: 4 * 60 * 60,
        adjustment_interval_fork_height: 0,
        fork1_height: 0,
        fork2_height: 0,
        x11_fork_height: 0,
        fork3_height: 0,
        fork4_height: 0,
        pow_no_retargeting: false,
        pow_allow_min_difficulty_blocks: true,
        pow_allow_digishield_min_difficulty_blocks: false,
        digishield_difficulty_calculation: false,
        allow_legacy_blocks: true,
        auxpow_chain_id: 0x0062,
        strict_chain_id: false,
        coinbase_maturity: 30,
        subsidy_halving_interval: 100_000,
        majority_enforce_block_upgrade: 501,
        majority_reject_block_outdated: 750,
        majority_window: 1000,
        bip34_height: 708_658,
        bip34_hash: BlockHash::from_hex_const(
            "21b8b97dcdb94caa67c7f8f6dbf22e61e0cfe0e46e1fff3528b22864659e9b38",
        ),
        rule_change_activation_threshold: 2880,
        miner_confirmation_window: 10_080,
        minimum_chain_work: uint_hex("1030d1382ade"),
        default_assume_valid: BlockHash::from_hex_const(
            "6943eaeaba98dc7d09f7e73398daccb4abcabb18b66c8c875e52b07638d93951",
        ),
    };

    let digishield = ConsensusRuleSet {
        height_effective: 145_000,
        pow_target_timespan: 60,
        digishield_difficulty_calculation: true,
        pow_allow_min_difficulty_blocks: false,
        coinbase_maturity: 240,
        ..base.clone()
    };

    let min_difficulty = ConsensusRuleSet {
        height_effective: 157_500,
        pow_allow_digishield_min_difficulty_blocks: true,
        pow_allow_min_difficulty_blocks: true,
        ..digishield.clone()
    };

    let auxpow = ConsensusRuleSet {
        height_effective: 158_100,
        allow_legacy_blocks: false,
        ..min_difficulty.clone()
    };

    vec![base, digishield, min_difficulty, auxpow]
}

fn test_profile() -> ConsensusResult<NetworkProfile> {
    let genesis_params = GenesisParams {
        time: 1391503289,
        nonce: 997879,
        bits: CompactTarget::from_consensus(0x1e0ffff0),
        version: 1,
        reward: 88 * COIN,
        expected_hash: BlockHash::from_hex_const(
            "93587a681030071b0485acfe14923d6eb9fd695ecec3bd2c59e43312a3f3fcf3",
        ),
        expected_merkle_root: BlockHash::from_hex_const(
            "401c7be7b6c88a32fb1563165b3aa729e44e447cd3d19cb5ced56719e4495de5",
        ),
    };
    let genesis = verify_genesis(Network::Test.name(), &genesis_params)?;

    Ok(NetworkProfile {
        network: Network::Test,
        message_start: [0xfc, 0xc1, 0xb7, 0xdc],
        default_port: 44556,
        prune_after_height: 1000,
        genesis_params,
        genesis,
        checkpoints: checkpoints(&[
            (483_173, "a804201ca0aceb7e937ef7a3c613a9b7589245b10cc095148c4ce4965b0b73b5"),
            (591_117, "5f6b93b2c28cedf32467d900369b8be6700f0649388a7dbfd3ebd4a01b1ffad8"),
            (658_924, "ed6c8324d9a77195ee080f225a0fca6346495e08ded99bcda47a8eea5a8a620b"),
            (703_635, "839fa54617adcd582d53030a37455c14a87a806f6615aa8213f13e196230ff7f"),
            (1_000_000, "1fe4d44ea4d1edb031f52f0d7c635db8190dc871a190654c41d2450086b8ef0e"),
            (1_202_214, "a2179767a87ee4e95944703976fee63578ec04fa3ac2fc1c9c2c83587d096977"),
        ]),
        chain_tx_data: ChainTxData {
            time: 1514565123,
            tx_count: 2_005_610,
            tx_rate: 1000.0,
        },
        base58_prefixes: bitcoin_test_prefixes(113, 196, 241),
        dns_seeds: vec![DnsSeed {
            name: "jrn.me.uk",
            host: "testseed.jrn.me.uk",
        }],
        mining_requires_peers: true,
        default_consistency_checks: false,
        require_standard: false,
        mine_blocks_on_demand: false,
        rules: ConsensusRuleStore::new(test_rules())?,
    })
}

// ============================================================================
// Regression test network
// ============================================================================

/// No retargeting at all; DigiShield at 10 and AuxPoW-only at 20 only change
/// the non-difficulty flags.
pub fn regtest_rules() -> Vec<ConsensusRuleSet> {
    let base = ConsensusRuleSet {
        height_effective: 0,
        pow_limit: pow_limit(255),
        pow_target_spacing: 1,
        pow_target_timespan: 4 * 60 * 60,
        adjustment_interval_fork_height: 0,
        fork1_height: 0,
        fork2_height: 0,
        x11_fork_height: 0,
        fork3_height: 0,
        fork4_height: 0,
        pow_no_retargeting: true,
        pow_allow_min_difficulty_blocks: true,
        pow_allow_digishield_min_difficulty_blocks: false,
        digishield_difficulty_calculation: false,
        allow_legacy_blocks: true,
        auxpow_chain_id: 0x0062,
        strict_chain_id: true,
        coinbase_maturity: 60,
        subsidy_halving_interval: 150,
        majority_enforce_block_upgrade: 750,
        majority_reject_block_outdated: 950,
        majority_window: 1000,
        bip34_height: 100_000_000,
        bip34_hash: BlockHash::ZERO,
        rule_change_activation_threshold: 540,
        miner_confirmation_window: 720,
        minimum_chain_work: BigUint::zero(),
        default_assume_valid: BlockHash::ZERO,
    };

    let digishield = ConsensusRuleSet {
        height_effective: 10,
        pow_target_timespan: 1,
        digishield_difficulty_calculation: true,
        ..base.clone()
    };

    let auxpow = ConsensusRuleSet {
        height_effective: 20,
        allow_legacy_blocks: false,
        ..digishield.clone()
    };

    vec![base, digishield, auxpow]
}

fn regtest_profile() -> ConsensusResult<NetworkProfile> {
    let genesis_params = GenesisParams {
        time: 1296688602,
        nonce: 2,
        bits: CompactTarget::from_consensus(0x207fffff),
        version: 1,
        reward: 88 * COIN,
        expected_hash: BlockHash::from_hex_const(
            "5ca593d746c54e989a7f242d90152e5abeb9bc668b79a1ff99d1381cd4a64a71",
        ),
        expected_merkle_root: BlockHash::from_hex_const(
            "401c7be7b6c88a32fb1563165b3aa729e44e447cd3d19cb5ced56719e4495de5",
        ),
    };
    let genesis = verify_genesis(Network::Regtest.name(), &genesis_params)?;

    Ok(NetworkProfile {
        network: Network::Regtest,
        message_start: [0xfa, 0xbf, 0xb5, 0xda],
        default_port: 18444,
        prune_after_height: 1000,
        genesis_params,
        genesis,
        checkpoints: Vec::new(),
        chain_tx_data: ChainTxData {
            time: 0,
            tx_count: 0,
            tx_rate: 0.0,
        },
        base58_prefixes: bitcoin_test_prefixes(111, 196, 239),
        dns_seeds: Vec::new(),
        mining_requires_peers: false,
        default_consistency_checks: true,
        require_standard: false,
        mine_blocks_on_demand: true,
        rules: ConsensusRuleStore::new(regtest_rules())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::RetargetAlgorithm;

    #[test]
    fn test_all_profiles_build() {
        for network in Network::ALL {
            let profile = build_profile(network).unwrap();
            assert_eq!(profile.network, network);
            assert_eq!(profile.genesis_hash(), profile.genesis_params.expected_hash);
        }
    }

    #[test]
    fn test_main_rules() {
        let profile = build_profile(Network::Main).unwrap();
        let rules = profile.rule_set(0);
        assert_eq!(rules.pow_limit_compact().to_consensus(), 0x1e0fffff);
        assert_eq!(rules.difficulty_adjustment_interval(), 60);
        assert!(std::ptr::eq(profile.rule_set(0), profile.rule_set(3_000_000)));
        assert_eq!(profile.message_start, [0xde, 0xfa, 0xce, 0xd0]);
        assert_eq!(profile.default_port, 58585);
        assert!(profile.dns_seeds.is_empty());
    }

    #[test]
    fn test_test_network_rule_heights() {
        let profile = build_profile(Network::Test).unwrap();
        let effective: Vec<u32> = profile.rules.iter().map(|r| r.height_effective).collect();
        assert_eq!(effective, vec![0, 145_000, 157_500, 158_100]);

        let early = profile.rule_set(144_999);
        assert!(early.pow_allow_min_difficulty_blocks);
        assert!(!early.digishield_difficulty_calculation);
        assert_eq!(early.pow_target_timespan, 14_400);

        let digishield = profile.rule_set(150_000);
        assert!(!digishield.pow_allow_min_difficulty_blocks);
        assert_eq!(digishield.coinbase_maturity, 240);
        assert_eq!(digishield.pow_target_timespan, 60);

        let min_difficulty = profile.rule_set(157_600);
        assert!(min_difficulty.pow_allow_digishield_min_difficulty_blocks);
        assert!(min_difficulty.allow_legacy_blocks);

        let auxpow = profile.rule_set(158_100);
        assert!(!auxpow.allow_legacy_blocks);
        assert!(auxpow.pow_allow_min_difficulty_blocks);

        assert_eq!(
            RetargetAlgorithm::select(profile.rule_set(1), 1),
            RetargetAlgorithm::DarkGravityWave
        );
    }

    #[test]
    fn test_regtest_never_retargets() {
        let profile = build_profile(Network::Regtest).unwrap();
        for height in [1, 10, 20, 1_000_000] {
            let rules = profile.rule_set(height);
            assert!(rules.pow_no_retargeting);
            assert!(rules.strict_chain_id);
        }
        assert_eq!(profile.rule_set(0).pow_limit_compact().to_consensus(), 0x207fffff);
        assert_eq!(profile.rule_set(10).pow_target_timespan, 1);
        assert!(!profile.rule_set(20).allow_legacy_blocks);
        assert!(profile.mine_blocks_on_demand);
    }

    #[test]
    fn test_checkpoints_sorted() {
        for network in Network::ALL {
            let profile = build_profile(network).unwrap();
            assert!(profile
                .checkpoints
                .windows(2)
                .all(|w| w[0].height < w[1].height));
        }
    }
}
