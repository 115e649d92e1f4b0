//! Scratchpad PoW CLI
//!
//! A command-line tool for mining and verifying scratchpad proofs.
//!
//! # Commands
//!
//! - `hash` - SHA3-256 of hex or text input
//! - `verify` - Check one nonce against a target
//! - `mine` - Search a nonce range (multi-threaded)
//! - `benchmark` - Time scratchpad init and verification
//! - `params` - Show algorithm parameters
//!
//! All byte inputs are hex, with or without a `0x` prefix.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use scratchpow::algorithm::{self, MiningEngine};
use scratchpow::config::MinerConfig;
use scratchpow::miner::{Miner, MiningOutcome};

#[derive(Parser)]
#[command(name = "scratchpow")]
#[command(version = "0.1.0")]
#[command(about = "Scratchpad SHA3 proof-of-work miner and verifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Miner config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mix rounds per nonce (overrides config)
    #[arg(long, global = true)]
    rounds: Option<usize>,

    /// Worker threads (overrides config)
    #[arg(short, long, global = true)]
    threads: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SHA3-256 digest of the input
    Hash {
        /// Input bytes as hex
        #[arg(required_unless_present = "text")]
        input: Option<String>,

        /// Hash this UTF-8 text instead of hex input
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,
    },

    /// Verify one nonce against a target
    Verify {
        #[command(flatten)]
        template: TemplateArgs,

        /// The nonce to check
        #[arg(long)]
        nonce: u64,
    },

    /// Search a nonce range for a valid proof
    Mine {
        #[command(flatten)]
        template: TemplateArgs,

        /// First nonce to try
        #[arg(long, default_value = "0")]
        start: u64,

        /// Number of nonces to try (default: until u64::MAX)
        #[arg(long)]
        count: Option<u64>,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of nonces to verify
        #[arg(short, long, default_value = "1000")]
        count: u32,
    },

    /// Show algorithm parameters
    Params,
}

#[derive(clap::Args)]
struct TemplateArgs {
    /// Previous block hash (at least 32 bytes)
    #[arg(long)]
    prev_hash: String,

    /// Miner address (at least 32 bytes)
    #[arg(long)]
    miner_addr: String,

    /// Block header without the nonce (exactly 140 bytes)
    #[arg(long)]
    header_prefix: String,

    /// Target as a 256-bit big-endian number
    #[arg(long)]
    target: String,
}

/// Decoded template inputs
struct Template {
    prev_hash: Vec<u8>,
    miner_addr: Vec<u8>,
    header_prefix: Vec<u8>,
    target: Vec<u8>,
}

impl TemplateArgs {
    fn decode(&self) -> anyhow::Result<Template> {
        Ok(Template {
            prev_hash: parse_hex("prev-hash", &self.prev_hash)?,
            miner_addr: parse_hex("miner-addr", &self.miner_addr)?,
            header_prefix: parse_hex("header-prefix", &self.header_prefix)?,
            target: parse_hex("target", &self.target)?,
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Hash { input, text } => cmd_hash(input.as_deref(), text.as_deref()),
        Commands::Verify { template, nonce } => cmd_verify(&config, &template, nonce),
        Commands::Mine {
            template,
            start,
            count,
        } => cmd_mine(&config, &template, start, count),
        Commands::Benchmark { count } => cmd_benchmark(&config, count),
        Commands::Params => cmd_params(),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

/// Config file (or defaults) with CLI overrides applied
fn load_config(cli: &Cli) -> anyhow::Result<MinerConfig> {
    let mut config = match &cli.config {
        Some(path) => MinerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MinerConfig::default(),
    };

    if let Some(rounds) = cli.rounds {
        config.rounds = rounds;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    config.validate()?;
    Ok(config)
}

fn parse_hex(name: &str, value: &str) -> anyhow::Result<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).with_context(|| format!("--{} is not valid hex", name))
}

fn cmd_hash(input: Option<&str>, text: Option<&str>) -> anyhow::Result<()> {
    let bytes = match (input, text) {
        (_, Some(text)) => text.as_bytes().to_vec(),
        (Some(input), None) => parse_hex("input", input)?,
        (None, None) => anyhow::bail!("provide hex input or --text"),
    };

    println!("{}", hex::encode(algorithm::hash256(&bytes)));
    Ok(())
}

fn cmd_verify(config: &MinerConfig, args: &TemplateArgs, nonce: u64) -> anyhow::Result<()> {
    let template = args.decode()?;

    let result = algorithm::verify(
        &template.prev_hash,
        &template.miner_addr,
        config.rounds,
        &template.header_prefix,
        nonce,
        &template.target,
    )?;

    println!("Digest: {}", hex::encode(result.digest));
    println!("Rounds: {}", config.rounds);
    println!("Valid:  {}", result.valid);
    Ok(())
}

fn cmd_mine(
    config: &MinerConfig,
    args: &TemplateArgs,
    start: u64,
    count: Option<u64>,
) -> anyhow::Result<()> {
    let template = args.decode()?;
    let end = match count {
        Some(count) => start.saturating_add(count),
        None => u64::MAX,
    };

    info!("Starting mining...");
    info!("Threads: {}", config.threads);
    info!("Rounds: {}", config.rounds);
    info!("Nonce range: {}..{}", start, end);

    let miner = Miner::new(config, &template.prev_hash, &template.miner_addr)?;

    let stop = AtomicBool::new(false);
    let mut last_report = Instant::now();
    let outcome = miner.mine(
        &template.header_prefix,
        &template.target,
        start..end,
        &stop,
        |stats| {
            // Report hashrate every 5 seconds
            if last_report.elapsed() >= Duration::from_secs(5) {
                info!(
                    "Hashrate: {:.2} H/s | Hashes: {} | Time: {:.0}s",
                    stats.hashrate(),
                    stats.hashes,
                    stats.elapsed.as_secs_f64()
                );
                last_report = Instant::now();
            }
        },
    )?;

    match outcome {
        MiningOutcome::Found(solution) => {
            println!("Found valid proof!");
            println!("Nonce: {}", solution.nonce);
            println!("Digest: {}", hex::encode(solution.digest));
        }
        MiningOutcome::Exhausted => warn!("No valid nonce in {}..{}", start, end),
        MiningOutcome::Stopped => warn!("Mining stopped"),
    }

    Ok(())
}

fn cmd_benchmark(config: &MinerConfig, count: u32) -> anyhow::Result<()> {
    println!(
        "Running benchmark: scratchpad init + {} verifications at {} rounds...",
        count, config.rounds
    );

    let prev_hash = [0u8; 32];
    let miner_addr = [1u8; 32];
    let header = [0u8; algorithm::HEADER_PREFIX_LEN];
    let target = [0xFFu8; algorithm::TARGET_LEN];

    let init_start = Instant::now();
    let engine = MiningEngine::for_template(&prev_hash, &miner_addr, config.rounds)?;
    let init_elapsed = init_start.elapsed();

    let start = Instant::now();
    for nonce in 0..count as u64 {
        let _ = engine.compute_and_verify(&header, nonce, &target)?;
    }
    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Scratchpad init: {:.2} ms", init_elapsed.as_secs_f64() * 1000.0);
    println!("  Verifications: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate (single thread): {:.2} H/s", hashrate);

    Ok(())
}

fn cmd_params() -> anyhow::Result<()> {
    println!("Algorithm parameters:");
    println!("  Hash: SHA3-256 (domain 0x{:02x})", algorithm::SHA3_DOMAIN);
    println!(
        "  Scratchpad: {} chunks x {} bytes = {} MiB",
        algorithm::SCRATCHPAD_CHUNKS,
        algorithm::CHUNK_BYTES,
        algorithm::SCRATCHPAD_SIZE / (1024 * 1024)
    );
    println!(
        "  Rounds: {} (allowed {}-{})",
        algorithm::DEFAULT_ROUNDS,
        algorithm::MIN_ROUNDS,
        algorithm::MAX_ROUNDS
    );
    println!("  Header prefix: {} bytes", algorithm::HEADER_PREFIX_LEN);
    Ok(())
}
