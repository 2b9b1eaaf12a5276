//! Operator subcommands.
//!
//! Each command takes the selected profile and returns the report to print,
//! so `main` stays a thin dispatcher.

use anyhow::{bail, Context, Result};
use smartcoin_consensus::{
    check_proof_of_work_detailed, BlockHeader, ChainEntry, InMemoryChain, NetworkProfile,
    PowAlgorithm, RetargetAlgorithm,
};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

/// Profile summary. Reaching this point means the genesis self-check passed.
pub fn check(profile: &NetworkProfile) -> Result<String> {
    let genesis = &profile.genesis;
    let pow_hash = genesis.header.pow_hash()?;
    let rules = profile.rule_set(0);
    let verdict = check_proof_of_work_detailed(&pow_hash, genesis.header.bits, rules);
    info!(network = %profile.network, genesis = %genesis.hash(), pow = %verdict, "Profile ready");

    let mut out = String::new();
    writeln!(out, "Network:          {}", profile.network)?;
    writeln!(out, "Message start:    {}", hex::encode(profile.message_start))?;
    writeln!(out, "Default port:     {}", profile.default_port)?;
    writeln!(out, "Genesis hash:     {}", genesis.hash())?;
    writeln!(out, "Genesis PoW:      {} ({})", pow_hash, verdict)?;
    writeln!(out, "Rule-sets:        {}", profile.rules.len())?;
    writeln!(out, "Checkpoints:      {}", profile.checkpoints.len())?;
    if let Some(last) = profile.last_checkpoint() {
        writeln!(out, "Last checkpoint:  {} at {}", last.hash, last.height)?;
    }
    writeln!(out, "DNS seeds:        {}", profile.dns_seeds.len())?;
    Ok(out)
}

/// The rule-set governing `height` and the retarget algorithm a block there
/// would use.
pub fn rules(profile: &NetworkProfile, height: u32) -> Result<String> {
    let rules = profile.rule_set(height);
    let algorithm = RetargetAlgorithm::select(rules, height);

    let mut out = String::new();
    writeln!(out, "Height:              {}", height)?;
    writeln!(out, "Effective from:      {}", rules.height_effective)?;
    writeln!(out, "Retarget algorithm:  {}", algorithm)?;
    writeln!(out, "PoW limit:           {}", rules.pow_limit_compact())?;
    writeln!(out, "Target spacing:      {}s", rules.pow_target_spacing)?;
    writeln!(out, "Target timespan:     {}s", rules.pow_target_timespan)?;
    writeln!(
        out,
        "Forks:               interval={} fork1={} fork2={} x11={} fork3={} fork4={}",
        rules.adjustment_interval_fork_height,
        rules.fork1_height,
        rules.fork2_height,
        rules.x11_fork_height,
        rules.fork3_height,
        rules.fork4_height
    )?;
    writeln!(out, "No retargeting:      {}", rules.pow_no_retargeting)?;
    writeln!(out, "Min-difficulty:      {}", rules.pow_allow_min_difficulty_blocks)?;
    writeln!(out, "AuxPoW chain id:     {:#x}", rules.auxpow_chain_id)?;
    writeln!(out, "Coinbase maturity:   {}", rules.coinbase_maturity)?;
    Ok(out)
}

/// Genesis header and coinbase in wire form.
pub fn genesis(profile: &NetworkProfile) -> Result<String> {
    let genesis = &profile.genesis;
    let header = &genesis.header;

    let mut out = String::new();
    writeln!(out, "Hash:         {}", genesis.hash())?;
    writeln!(out, "Merkle root:  {}", header.merkle_root)?;
    writeln!(out, "Time:         {}", header.time)?;
    writeln!(out, "Nonce:        {}", header.nonce)?;
    writeln!(out, "Bits:         {}", header.bits)?;
    writeln!(out, "Version:      {}", header.version)?;
    writeln!(out, "PoW algorithm: {}", PowAlgorithm::for_time(header.time).name())?;
    writeln!(out, "Header:       {}", hex::encode(header.serialize()))?;
    writeln!(out, "Coinbase:     {}", hex::encode(genesis.coinbase.serialize()))?;
    Ok(out)
}

/// Read a JSON array of `{height, time, bits}` entries ending at the tip.
pub fn load_headers(path: &Path) -> Result<Vec<ChainEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read headers file {}", path.display()))?;
    let entries: Vec<ChainEntry> =
        serde_json::from_str(&content).context("Failed to parse headers file")?;
    debug!(count = entries.len(), "Loaded chain entries");
    Ok(entries)
}

/// Bits required for a block at `candidate_time` on top of the last entry.
pub fn next_work(
    profile: &NetworkProfile,
    entries: Vec<ChainEntry>,
    candidate_time: u32,
) -> Result<String> {
    let chain =
        InMemoryChain::from_entries(entries).context("Header heights are not contiguous")?;
    let Some(tip) = chain.tip().copied() else {
        bail!("Headers file holds no entries");
    };

    let next_height = tip.height.saturating_add(1);
    let algorithm = RetargetAlgorithm::select(profile.rule_set(next_height), next_height);
    let candidate = BlockHeader {
        version: 1,
        prev_block_hash: tip.hash,
        merkle_root: Default::default(),
        time: candidate_time,
        bits: tip.bits,
        nonce: 0,
    };
    let bits = profile.required_difficulty(&chain, &tip, &candidate);
    info!(height = next_height, %algorithm, %bits, "Computed next work");

    let mut out = String::new();
    writeln!(out, "Tip:        {} (bits {})", tip.height, tip.bits)?;
    writeln!(out, "Height:     {}", next_height)?;
    writeln!(out, "Algorithm:  {}", algorithm)?;
    writeln!(out, "Bits:       {}", bits)?;
    Ok(out)
}
