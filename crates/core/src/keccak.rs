//! SHA3-256 built directly on the Keccak-f[1600] permutation
//!
//! The sponge absorbs at a rate of 136 bytes with the FIPS 202 domain
//! separator 0x06. Round constants, rotation offsets and the pi lane order
//! are the standard Keccak tables; any deviation silently forks consensus.

use crate::params::{HASH_SIZE, SHA3_256_RATE, SHA3_DOMAIN};

/// Number of 64-bit lanes in the permutation state
const LANES: usize = 25;

/// Lanes covered by one rate block (136 / 8)
const RATE_LANES: usize = SHA3_256_RATE / 8;

/// Iota round constants
const ROUND_CONSTANTS: [u64; 24] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// Rho rotation offsets, in pi traversal order
const RHO_OFFSETS: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Pi destination lanes, starting from lane 1
const PI_LANES: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// Keccak-f[1600]: 24 rounds of theta, rho+pi, chi and iota over 25 lanes.
pub fn keccak_f1600(state: &mut [u64; LANES]) {
    for round_constant in ROUND_CONSTANTS {
        // Theta
        let mut parity = [0u64; 5];
        for (x, column) in parity.iter_mut().enumerate() {
            *column = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        for x in 0..5 {
            let d = parity[(x + 4) % 5] ^ parity[(x + 1) % 5].rotate_left(1);
            for y in (0..LANES).step_by(5) {
                state[y + x] ^= d;
            }
        }

        // Rho + Pi (lane 0 stays in place)
        let mut carry = state[1];
        for (&lane, &offset) in PI_LANES.iter().zip(RHO_OFFSETS.iter()) {
            let next = state[lane];
            state[lane] = carry.rotate_left(offset);
            carry = next;
        }

        // Chi
        for y in (0..LANES).step_by(5) {
            let row = [state[y], state[y + 1], state[y + 2], state[y + 3], state[y + 4]];
            for x in 0..5 {
                state[y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
            }
        }

        // Iota
        state[0] ^= round_constant;
    }
}

/// XOR one rate block into the state (little-endian lanes) and permute.
#[inline(always)]
fn absorb_block(state: &mut [u64; LANES], block: &[u8; SHA3_256_RATE]) {
    for (lane, word) in state[..RATE_LANES].iter_mut().zip(block.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(word);
        *lane ^= u64::from_le_bytes(bytes);
    }
    keccak_f1600(state);
}

/// Incremental SHA3-256 hasher
///
/// Feeding the same bytes through any sequence of `update` calls produces
/// the same digest as [`hash256`].
#[derive(Clone)]
pub struct Sha3_256 {
    state: [u64; LANES],
    buffer: [u8; SHA3_256_RATE],
    buffered: usize,
}

impl Sha3_256 {
    /// Create a hasher with an all-zero sponge state
    pub fn new() -> Self {
        Self {
            state: [0u64; LANES],
            buffer: [0u8; SHA3_256_RATE],
            buffered: 0,
        }
    }

    /// Absorb more input
    pub fn update(&mut self, mut data: &[u8]) -> &mut Self {
        while !data.is_empty() {
            let take = (SHA3_256_RATE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered == SHA3_256_RATE {
                absorb_block(&mut self.state, &self.buffer);
                self.buffered = 0;
            }
        }
        self
    }

    /// Pad, absorb the final block and squeeze 32 bytes.
    ///
    /// Works on a copy of the sponge, so the hasher can keep absorbing.
    pub fn finalize(&self) -> [u8; HASH_SIZE] {
        let mut state = self.state;

        // Leftover is 0..=135 bytes. At 135 the domain byte and the final
        // 0x80 bit share the last byte of the block (0x86).
        let mut last = [0u8; SHA3_256_RATE];
        last[..self.buffered].copy_from_slice(&self.buffer[..self.buffered]);
        last[self.buffered] = SHA3_DOMAIN;
        last[SHA3_256_RATE - 1] |= 0x80;
        absorb_block(&mut state, &last);

        let mut out = [0u8; HASH_SIZE];
        for (chunk, lane) in out.chunks_exact_mut(8).zip(state.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }
}

impl Default for Sha3_256 {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA3-256 of `data`. Total over every input length, including empty.
pub fn hash256(data: &[u8]) -> [u8; HASH_SIZE] {
    Sha3_256::new().update(data).finalize()
}

/// SHA3-256 of `a || b` without building the concatenation
pub fn hash256_concat(a: &[u8], b: &[u8]) -> [u8; HASH_SIZE] {
    Sha3_256::new().update(a).update(b).finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_of_zero_state() {
        // Keccak team intermediate values, first lanes after one f1600 call
        let mut state = [0u64; LANES];
        keccak_f1600(&mut state);
        assert_eq!(state[0], 0xF1258F7940E1DDE7);
        assert_eq!(state[1], 0x84D5CCF933C0478A);
    }

    #[test]
    fn padding_shares_last_byte_at_135() {
        // Leftover of 135 bytes puts 0x06 and 0x80 in the same byte
        let data = [0xA3u8; 135];
        assert_eq!(
            hex::encode(hash256(&data)),
            "d51927265ca4bf0cc8b4453387700918c03f8894e395ad437d4573f3be4d2c34"
        );
    }

    #[test]
    fn concat_matches_one_shot() {
        let a = b"previous block hash material";
        let b = [7u8; 200];
        let mut joined = a.to_vec();
        joined.extend_from_slice(&b);
        assert_eq!(hash256_concat(a, &b), hash256(&joined));
    }

    #[test]
    fn finalize_does_not_consume_state() {
        let mut hasher = Sha3_256::new();
        hasher.update(b"ab");
        assert_eq!(hasher.finalize(), hasher.finalize());
        hasher.update(b"c");
        assert_eq!(hasher.finalize(), hash256(b"abc"));
    }

    #[test]
    fn split_updates_match_one_shot() {
        let data: Vec<u8> = (0..500u32).map(|i| (i * 31 + 7) as u8).collect();
        let expected = hash256(&data);

        for split in [0, 1, 135, 136, 137, 271, 272, 499, 500] {
            let mut hasher = Sha3_256::new();
            hasher.update(&data[..split]).update(&data[split..]);
            assert_eq!(hasher.finalize(), expected, "split at {}", split);
        }

        let mut bytewise = Sha3_256::new();
        for byte in &data {
            bytewise.update(core::slice::from_ref(byte));
        }
        assert_eq!(bytewise.finalize(), expected);
    }
}
