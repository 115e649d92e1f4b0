//! Scratchpad PoW Algorithm Parameters
//!
//! Every value here is consensus data: changing any of them produces
//! digests that no other verifier will agree with.

/// Number of chunks in the scratchpad (power of two)
pub const SCRATCHPAD_CHUNKS: usize = 65_536;

/// Size of one scratchpad chunk in bytes (one SHA3-256 digest)
pub const CHUNK_BYTES: usize = 32;

/// Total scratchpad footprint (2 MiB)
pub const SCRATCHPAD_SIZE: usize = SCRATCHPAD_CHUNKS * CHUNK_BYTES;

/// Mask applied to the derived chunk index (SCRATCHPAD_CHUNKS - 1)
pub const CHUNK_MASK: usize = SCRATCHPAD_CHUNKS - 1;

/// Default number of mix rounds per nonce
pub const DEFAULT_ROUNDS: usize = 512;

/// Smallest accepted round count
pub const MIN_ROUNDS: usize = 256;

/// Largest accepted round count
pub const MAX_ROUNDS: usize = 2048;

/// Length of the block header without its trailing nonce
pub const HEADER_PREFIX_LEN: usize = 140;

/// Minimum length of the previous block hash and miner address
pub const SEED_INPUT_LEN: usize = 32;

/// Number of target bytes taken into the comparison
pub const TARGET_LEN: usize = 32;

/// SHA3-256 output size
pub const HASH_SIZE: usize = 32;

/// SHA3-256 sponge rate in bytes (1600 - 2 * 256 bits)
pub const SHA3_256_RATE: usize = 136;

/// FIPS 202 SHA3 domain separator. Keccak-256 uses 0x01 and is NOT compatible.
pub const SHA3_DOMAIN: u8 = 0x06;
