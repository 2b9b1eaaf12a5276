//! Property-based tests using proptest.
//!
//! These tests verify invariants of rule lookup, compact target encoding,
//! proof-of-work validation and retargeting using randomly generated data
//! with shrinking support.

use crate::generators::*;
use crate::harness::*;
use num_bigint::BigUint;
use proptest::prelude::*;
use smartcoin_consensus::{check_proof_of_work, BlockHash, CompactTarget, Network, NetworkProfile};

// ============================================================================
// Proptest Strategies for Core Types
// ============================================================================

/// Generate arbitrary 32-byte hashes
fn arb_hash() -> impl Strategy<Value = BlockHash> {
    prop::array::uniform32(any::<u8>()).prop_map(BlockHash::from_bytes)
}

/// Generate arbitrary block heights
fn arb_height() -> impl Strategy<Value = u32> {
    any::<u32>()
}

/// Generate arbitrary network selections
fn arb_network() -> impl Strategy<Value = Network> {
    prop::sample::select(Network::ALL.to_vec())
}

/// Generate arbitrary compact bits, well-formed or not
fn arb_bits() -> impl Strategy<Value = CompactTarget> {
    any::<u32>().prop_map(CompactTarget::from_consensus)
}

/// Generate targets that fit the 23-bit mantissa exactly
fn arb_representable_target() -> impl Strategy<Value = BigUint> {
    (1u32..=0x7f_ffff, 0usize..=29)
        .prop_map(|(mantissa, shift)| BigUint::from(mantissa) << (8 * shift))
}

/// Generate block spacings, including out-of-order timestamps
fn arb_spacing() -> impl Strategy<Value = i64> {
    -60i64..=2_000
}

fn profile(network: Network) -> &'static NetworkProfile {
    NetworkProfile::get(network).unwrap()
}

// ============================================================================
// Rule Lookup Property Tests
// ============================================================================

proptest! {
    /// The active rule-set never takes effect after the queried height.
    #[test]
    fn rule_lookup_not_in_future(network in arb_network(), height in arb_height()) {
        let rules = profile(network).rule_set(height);
        prop_assert!(rules.height_effective <= height);
    }

    /// No rule-set lies strictly between the chosen one and the height.
    #[test]
    fn rule_lookup_is_latest(network in arb_network(), height in arb_height()) {
        let profile = profile(network);
        let chosen = profile.rule_set(height).height_effective;
        prop_assert!(profile
            .rules
            .iter()
            .all(|r| r.height_effective <= chosen || r.height_effective > height));
    }

    /// Lookup is monotonic in height.
    #[test]
    fn rule_lookup_monotonic(network in arb_network(), a in arb_height(), b in arb_height()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let profile = profile(network);
        prop_assert!(
            profile.rule_set(low).height_effective <= profile.rule_set(high).height_effective
        );
    }
}

// ============================================================================
// Compact Target Property Tests
// ============================================================================

proptest! {
    /// Targets within mantissa precision survive encode then decode.
    #[test]
    fn compact_preserves_representable_targets(target in arb_representable_target()) {
        let compact = CompactTarget::from_target(&target);
        let decoded = compact.decode();
        prop_assert!(!decoded.negative);
        prop_assert!(!decoded.overflow);
        prop_assert_eq!(decoded.value, target);
    }

    /// Encoding never rounds up.
    #[test]
    fn compact_never_rounds_up(bytes in prop::array::uniform32(any::<u8>())) {
        let mut bytes = bytes;
        bytes[31] &= 0x7f;
        let target = BigUint::from_bytes_le(&bytes);
        prop_assert!(CompactTarget::from_target(&target).to_target() <= target);
    }
}

// ============================================================================
// Proof-of-Work Property Tests
// ============================================================================

proptest! {
    /// Acceptance implies a well-formed target within the ceiling that the
    /// hash does not exceed.
    #[test]
    fn pow_acceptance_implies_bounds(
        hash in arb_hash(),
        bits in arb_bits(),
        height in arb_height(),
    ) {
        let rules = profile(Network::Main).rule_set(height);
        if check_proof_of_work(&hash, bits, rules) {
            let decoded = bits.decode();
            prop_assert!(!decoded.negative);
            prop_assert!(!decoded.overflow);
            prop_assert!(decoded.value > BigUint::from(0u32));
            prop_assert!(decoded.value <= rules.pow_limit);
            prop_assert!(hash.to_biguint() <= decoded.value);
        }
    }

    /// A hash equal to a valid target is always accepted.
    #[test]
    fn pow_accepts_hash_at_target(target in arb_representable_target()) {
        let rules = profile(Network::Regtest).rule_set(0);
        let compact = CompactTarget::from_target(&target);
        prop_assume!(compact.to_target() <= rules.pow_limit);

        let mut bytes = [0u8; 32];
        let le = compact.to_target().to_bytes_le();
        bytes[..le.len()].copy_from_slice(&le);
        prop_assert!(check_proof_of_work(&BlockHash::from_bytes(bytes), compact, rules));
    }
}

// ============================================================================
// Retarget Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the block times, the required target stays within the
    /// ceiling and decodes cleanly.
    #[test]
    fn required_bits_within_ceiling(
        spacings in prop::collection::vec(arb_spacing(), 30),
        base in prop::sample::select(vec![35_000u32, 210_000, 300_000, 400_000]),
    ) {
        let ctx = TestContext::main();
        let times: Vec<u32> = spacings
            .iter()
            .scan(i64::from(BASE_TIME), |t, s| {
                *t += s;
                Some(*t as u32)
            })
            .collect();
        let chain = chain_with(base, times.len() as u32, |i| times[i as usize], |_| 0x1c1a1206);

        let bits = ctx.next_bits(&chain, *times.last().unwrap() + 40);
        let rules = ctx.rules_at(base + times.len() as u32);
        let decoded = bits.decode();
        prop_assert!(!decoded.negative);
        prop_assert!(!decoded.overflow);
        prop_assert!(decoded.value <= rules.pow_limit);
    }
}
