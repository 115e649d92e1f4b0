//! Scratchpad PoW Miner Library
//!
//! Mining and verification front end for the memory-hard SHA3 scratchpad
//! proof-of-work.
//!
//! # Overview
//!
//! Each mining template `(prev_hash, miner_addr)` seeds a 2 MiB scratchpad.
//! Every nonce attempt then runs 256-2048 rounds of SHA3-256 lookups against
//! it, so miners need the whole scratchpad resident in memory.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::AtomicBool;
//! use scratchpow::config::MinerConfig;
//! use scratchpow::miner::{Miner, MiningOutcome};
//!
//! let config = MinerConfig { rounds: 256, threads: 2, batch_size: 64 };
//! let miner = Miner::new(&config, &[0u8; 32], &[1u8; 32]).unwrap();
//!
//! let stop = AtomicBool::new(false);
//! let outcome = miner.mine(&[0u8; 140], &[0xFF; 32], 0..64, &stop, |_| {}).unwrap();
//! assert!(matches!(outcome, MiningOutcome::Found(_)));
//! ```

// Re-export the core algorithm
pub use scratchpow_core as algorithm;

pub mod config;
pub mod miner;

// Convenience re-exports
pub use algorithm::{hash256, meets_target, MiningEngine, Verification};
