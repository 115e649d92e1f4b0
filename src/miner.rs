//! Nonce search driver
//!
//! Wraps one [`MiningEngine`] per template and walks a caller-bounded nonce
//! range in batches on a dedicated rayon pool, reporting progress between
//! batches and honouring a stop flag.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info};
use thiserror::Error;

use crate::algorithm::{MiningEngine, Solution};
use crate::config::{ConfigError, MinerConfig};

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("Engine error: {0}")]
    Engine(#[from] scratchpow_core::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Progress of a running search
#[derive(Debug, Clone, Copy)]
pub struct MiningStats {
    /// Nonces evaluated so far
    pub hashes: u64,
    pub elapsed: Duration,
}

impl MiningStats {
    pub fn hashrate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.hashes as f64 / secs
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningOutcome {
    Found(Solution),
    /// Every nonce in the range was tried
    Exhausted,
    /// The stop flag was raised between batches
    Stopped,
}

/// Miner bound to one template
pub struct Miner {
    engine: MiningEngine,
    pool: rayon::ThreadPool,
    batch_size: u64,
}

impl Miner {
    /// Validate `config` and build the scratchpad for `(prev_hash, miner_addr)`.
    pub fn new(
        config: &MinerConfig,
        prev_hash: &[u8],
        miner_addr: &[u8],
    ) -> Result<Self, MinerError> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("scratchpow-worker-{}", i))
            .build()?;

        let start = Instant::now();
        let engine =
            pool.install(|| MiningEngine::for_template(prev_hash, miner_addr, config.rounds))?;
        debug!("scratchpad ready in {:?}", start.elapsed());

        Ok(Self {
            engine,
            pool,
            batch_size: config.batch_size,
        })
    }

    pub fn engine(&self) -> &MiningEngine {
        &self.engine
    }

    /// Search `nonces` for a digest at or below `target`.
    ///
    /// `on_progress` runs after every batch that does not find a solution.
    pub fn mine(
        &self,
        header_prefix: &[u8],
        target: &[u8],
        nonces: Range<u64>,
        stop: &AtomicBool,
        mut on_progress: impl FnMut(&MiningStats),
    ) -> Result<MiningOutcome, MinerError> {
        let started = Instant::now();
        let mut stats = MiningStats {
            hashes: 0,
            elapsed: Duration::ZERO,
        };

        // Surface argument errors even when the range is empty
        self.engine.search(header_prefix, target, 0..0)?;

        let mut next = nonces.start;
        while next < nonces.end {
            if stop.load(Ordering::Relaxed) {
                info!("mining stopped after {} hashes", stats.hashes);
                return Ok(MiningOutcome::Stopped);
            }

            let batch_end = next.saturating_add(self.batch_size).min(nonces.end);
            let found = self
                .pool
                .install(|| self.engine.search(header_prefix, target, next..batch_end))?;

            if let Some(solution) = found {
                info!(
                    "found nonce {} ({})",
                    solution.nonce,
                    hex::encode(solution.digest)
                );
                return Ok(MiningOutcome::Found(solution));
            }

            stats.hashes += batch_end - next;
            stats.elapsed = started.elapsed();
            on_progress(&stats);
            next = batch_end;
        }

        info!("nonce range {}..{} exhausted", nonces.start, nonces.end);
        Ok(MiningOutcome::Exhausted)
    }
}
