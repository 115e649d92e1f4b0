//! # Scratchpad PoW Core Algorithm
//!
//! A memory-hard proof-of-work built entirely on SHA3-256 (FIPS 202,
//! domain separator 0x06). Miners and verifiers must produce bit-identical
//! results, so everything in this crate is consensus-critical.
//!
//! ## Algorithm Parameters
//!
//! - 65,536 chunks × 32 bytes = 2 MiB scratchpad per mining template
//! - Scratchpad seeded from `(prev_hash, miner_addr)`, filled in counter mode
//! - 256-2048 mix rounds per nonce (default 512)
//! - One scratchpad lookup and one SHA3-256 call per round
//!
//! ## Input Format
//!
//! ```text
//! attempt = header_prefix || nonce
//!           ^^^^^^^^^^^^^    ^^^^^
//!           140 bytes        8 bytes (little-endian u64)
//! ```
//!
//! The final digest is compared to the target as a 256-bit big-endian
//! integer; `digest <= target` is a valid proof.
//!
//! ## Example
//!
//! ```rust
//! use scratchpow_core::{MiningEngine, hash256};
//!
//! // Standalone hash primitive
//! let digest = hash256(b"block header bytes");
//! assert_eq!(digest.len(), 32);
//!
//! // One engine per template, shared by every worker for that template
//! let engine = MiningEngine::for_template(&[0u8; 32], &[1u8; 32], 256).unwrap();
//! let attempt = engine.compute_and_verify(&[0u8; 140], 0, &[0xFF; 32]).unwrap();
//! assert!(attempt.valid);
//! ```

mod engine;
mod error;
mod keccak;
mod params;

pub use engine::{
    MiningEngine, Scratchpad, Solution, Verification, chunk_index, derive_seed, meets_target,
    verify,
};
pub use error::{Error, ErrorKind};
pub use keccak::{Sha3_256, hash256, hash256_concat, keccak_f1600};
pub use params::*;
