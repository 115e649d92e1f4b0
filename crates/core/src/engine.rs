//! Mining engine: scratchpad construction and nonce verification
//!
//! ```text
//! seed     = SHA3(prev_hash[0:32] || miner_addr[0:32])
//! chunk[i] = SHA3(seed || le64(i))                        i in 0..65536
//! state    = SHA3(header_prefix || le64(nonce))
//! repeat rounds:
//!     state = SHA3(state || chunk[le32(state[0:4]) & 0xFFFF])
//! digest   = SHA3(state)
//! valid    = digest <= target[0:32]                       (big-endian)
//! ```
//!
//! `initialize_scratchpad` and `set_rounds` take `&mut self`, while
//! `compute_and_verify` and `search` take `&self`. Any number of threads may
//! verify against one engine, and the borrow checker keeps writers out until
//! every reader is gone.

use core::ops::Range;

use log::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Error;
use crate::params::*;
use crate::keccak::{hash256, hash256_concat};

/// The 2 MiB per-template lookup table
///
/// Either all zero (fresh or cleared) or the complete output of one
/// initialization pass.
#[derive(Clone)]
pub struct Scratchpad {
    chunks: Vec<[u8; CHUNK_BYTES]>,
}

impl Scratchpad {
    /// Allocate a zeroed scratchpad
    pub fn new() -> Self {
        Self {
            chunks: vec![[0u8; CHUNK_BYTES]; SCRATCHPAD_CHUNKS],
        }
    }

    /// Chunk at `index`, masked into range
    #[inline(always)]
    pub fn chunk(&self, index: usize) -> &[u8; CHUNK_BYTES] {
        &self.chunks[index & CHUNK_MASK]
    }

    /// The whole buffer as contiguous bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.chunks.as_flattened()
    }

    pub fn is_zeroed(&self) -> bool {
        self.chunks.iter().flatten().all(|&b| b == 0)
    }

    fn clear(&mut self) {
        self.chunks.fill([0u8; CHUNK_BYTES]);
    }

    /// Counter-mode expansion of `seed` into every chunk
    #[cfg(feature = "parallel")]
    fn fill(&mut self, seed: &[u8; HASH_SIZE]) {
        self.chunks
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, chunk)| *chunk = expand_chunk(seed, index as u64));
    }

    /// Counter-mode expansion of `seed` into every chunk (sequential fallback)
    #[cfg(not(feature = "parallel"))]
    fn fill(&mut self, seed: &[u8; HASH_SIZE]) {
        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            *chunk = expand_chunk(seed, index as u64);
        }
    }
}

impl Default for Scratchpad {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one nonce attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    /// Final digest, returned whether or not it meets the target
    pub digest: [u8; HASH_SIZE],
    /// `digest <= target`
    pub valid: bool,
}

/// A nonce whose digest meets the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub digest: [u8; HASH_SIZE],
}

/// Scratchpad PoW engine
///
/// Owns one scratchpad and the round count used by verification. Build one
/// per mining template with [`MiningEngine::for_template`], or reuse one
/// through [`MiningEngine::initialize_scratchpad`].
pub struct MiningEngine {
    scratchpad: Scratchpad,
    initialized: bool,
    rounds: usize,
}

impl MiningEngine {
    /// Create an uninitialized engine with a zeroed 2 MiB scratchpad and
    /// the default round count.
    pub fn new() -> Self {
        Self {
            scratchpad: Scratchpad::new(),
            initialized: false,
            rounds: DEFAULT_ROUNDS,
        }
    }

    /// Create an engine that is ready to verify nonces for one template.
    pub fn for_template(
        prev_hash: &[u8],
        miner_addr: &[u8],
        rounds: usize,
    ) -> Result<Self, Error> {
        check_rounds(rounds)?;
        leading_bytes("prev_hash", prev_hash)?;
        leading_bytes("miner_addr", miner_addr)?;

        let mut engine = Self::new();
        engine.rounds = rounds;
        engine.initialize_scratchpad(prev_hash, miner_addr)?;
        Ok(engine)
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn scratchpad(&self) -> &Scratchpad {
        &self.scratchpad
    }

    /// Set the mix round count for subsequent verifications.
    ///
    /// Fails unless `MIN_ROUNDS <= rounds <= MAX_ROUNDS`; the scratchpad is
    /// not affected either way.
    pub fn set_rounds(&mut self, rounds: usize) -> Result<(), Error> {
        check_rounds(rounds)?;
        if rounds != self.rounds {
            debug!("rounds changed {} -> {}", self.rounds, rounds);
        }
        self.rounds = rounds;
        Ok(())
    }

    /// Rebuild the scratchpad for a new template.
    ///
    /// Only the first 32 bytes of each input are used. Inputs are validated
    /// before anything is touched; once validation passes the scratchpad is
    /// cleared, the engine is marked uninitialized, and then refilled.
    pub fn initialize_scratchpad(
        &mut self,
        prev_hash: &[u8],
        miner_addr: &[u8],
    ) -> Result<(), Error> {
        let prev_hash = leading_bytes("prev_hash", prev_hash)?;
        let miner_addr = leading_bytes("miner_addr", miner_addr)?;

        self.initialized = false;
        self.scratchpad.clear();

        let seed = derive_seed(prev_hash, miner_addr);
        self.scratchpad.fill(&seed);
        self.initialized = true;

        debug!(
            "scratchpad initialized: {} chunks, seed {:02x?}..",
            SCRATCHPAD_CHUNKS,
            &seed[..4]
        );
        Ok(())
    }

    /// Run the mix loop for one nonce and compare against `target`.
    ///
    /// Checks, in order: the engine is initialized, `header_prefix` is
    /// exactly 140 bytes, `target` has at least 32 bytes.
    pub fn compute_and_verify(
        &self,
        header_prefix: &[u8],
        nonce: u64,
        target: &[u8],
    ) -> Result<Verification, Error> {
        let target = self.check_attempt(header_prefix, target)?;
        let digest = self.mix(header_prefix, nonce, self.rounds);

        Ok(Verification {
            digest,
            valid: meets_target(&digest, target),
        })
    }

    /// Look for a nonce in `nonces` whose digest meets `target`.
    ///
    /// Returns `Ok(None)` when the range is exhausted. Preconditions match
    /// [`compute_and_verify`](Self::compute_and_verify).
    pub fn search(
        &self,
        header_prefix: &[u8],
        target: &[u8],
        nonces: Range<u64>,
    ) -> Result<Option<Solution>, Error> {
        let target = self.check_attempt(header_prefix, target)?;
        trace!("searching nonces {}..{}", nonces.start, nonces.end);

        Ok(self
            .scan(header_prefix, target, nonces)
            .map(|(nonce, digest)| Solution { nonce, digest }))
    }

    /// Parallel scan: any valid nonce in the range may be returned
    #[cfg(feature = "parallel")]
    fn scan(
        &self,
        header_prefix: &[u8],
        target: &[u8; TARGET_LEN],
        nonces: Range<u64>,
    ) -> Option<(u64, [u8; HASH_SIZE])> {
        let rounds = self.rounds;
        nonces
            .into_par_iter()
            .map(|nonce| (nonce, self.mix(header_prefix, nonce, rounds)))
            .find_any(|(_, digest)| meets_target(digest, target))
    }

    /// Sequential scan: returns the lowest valid nonce
    #[cfg(not(feature = "parallel"))]
    fn scan(
        &self,
        header_prefix: &[u8],
        target: &[u8; TARGET_LEN],
        nonces: Range<u64>,
    ) -> Option<(u64, [u8; HASH_SIZE])> {
        let rounds = self.rounds;
        nonces
            .map(|nonce| (nonce, self.mix(header_prefix, nonce, rounds)))
            .find(|(_, digest)| meets_target(digest, target))
    }

    fn check_attempt<'t>(
        &self,
        header_prefix: &[u8],
        target: &'t [u8],
    ) -> Result<&'t [u8; TARGET_LEN], Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if header_prefix.len() != HEADER_PREFIX_LEN {
            return Err(Error::HeaderPrefixLength(header_prefix.len()));
        }
        leading_bytes("target", target)
    }

    /// Header hash, `rounds` scratchpad lookups, then the finalization hash.
    /// `rounds` is passed in so a single call never sees two values.
    fn mix(&self, header_prefix: &[u8], nonce: u64, rounds: usize) -> [u8; HASH_SIZE] {
        let mut state = hash256_concat(header_prefix, &nonce.to_le_bytes());

        let mut round_input = [0u8; 2 * HASH_SIZE];
        for _ in 0..rounds {
            let chunk = self.scratchpad.chunk(chunk_index(&state));
            round_input[..HASH_SIZE].copy_from_slice(&state);
            round_input[HASH_SIZE..].copy_from_slice(chunk);
            state = hash256(&round_input);
        }

        hash256(&state)
    }
}

impl Default for MiningEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-template seed: `SHA3(prev_hash || miner_addr)`
pub fn derive_seed(
    prev_hash: &[u8; SEED_INPUT_LEN],
    miner_addr: &[u8; SEED_INPUT_LEN],
) -> [u8; HASH_SIZE] {
    let mut material = [0u8; 2 * SEED_INPUT_LEN];
    material[..SEED_INPUT_LEN].copy_from_slice(prev_hash);
    material[SEED_INPUT_LEN..].copy_from_slice(miner_addr);
    hash256(&material)
}

/// Chunk `counter` of the scratchpad: `SHA3(seed || le64(counter))`
#[inline(always)]
fn expand_chunk(seed: &[u8; HASH_SIZE], counter: u64) -> [u8; CHUNK_BYTES] {
    let mut input = [0u8; HASH_SIZE + 8];
    input[..HASH_SIZE].copy_from_slice(seed);
    input[HASH_SIZE..].copy_from_slice(&counter.to_le_bytes());
    hash256(&input)
}

/// Scratchpad chunk addressed by a mix state: first four bytes read as a
/// little-endian u32, masked to the chunk count.
#[inline(always)]
pub fn chunk_index(state: &[u8; HASH_SIZE]) -> usize {
    let word = u32::from_le_bytes([state[0], state[1], state[2], state[3]]);
    word as usize & CHUNK_MASK
}

/// Check whether a digest satisfies a target.
///
/// Both are 256-bit big-endian integers; equality counts as valid.
///
/// # Example
///
/// ```rust
/// use scratchpow_core::meets_target;
///
/// let mut target = [0u8; 32];
/// target[0] = 0x01;
///
/// let mut digest = [0xFFu8; 32];
/// digest[0] = 0x00;
/// assert!(meets_target(&digest, &target));   // 0x00FF.. < 0x0100..
/// assert!(meets_target(&target, &target));   // equal is valid
///
/// digest[0] = 0x01;
/// assert!(!meets_target(&digest, &target));  // 0x01FF.. > 0x0100..
/// ```
#[inline(always)]
pub fn meets_target(digest: &[u8; HASH_SIZE], target: &[u8; TARGET_LEN]) -> bool {
    // Lexicographic array order is most-significant-byte-first order
    digest <= target
}

/// Convenience function for single-shot verification
///
/// Builds a throwaway engine for the template and checks one nonce. For more
/// than one nonce per template, keep a [`MiningEngine`] around instead; the
/// scratchpad costs 65,536 hashes to build.
pub fn verify(
    prev_hash: &[u8],
    miner_addr: &[u8],
    rounds: usize,
    header_prefix: &[u8],
    nonce: u64,
    target: &[u8],
) -> Result<Verification, Error> {
    MiningEngine::for_template(prev_hash, miner_addr, rounds)?
        .compute_and_verify(header_prefix, nonce, target)
}

fn check_rounds(rounds: usize) -> Result<(), Error> {
    if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&rounds) {
        return Err(Error::RoundsOutOfRange(rounds));
    }
    Ok(())
}

/// First 32 bytes of a minimum-length input
fn leading_bytes<'a>(field: &'static str, input: &'a [u8]) -> Result<&'a [u8; 32], Error> {
    input
        .get(..32)
        .and_then(|head| head.try_into().ok())
        .ok_or(Error::InputTooShort {
            field,
            min: 32,
            len: input.len(),
        })
}
