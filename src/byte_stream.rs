//! A deterministic, unbounded byte stream built by hashing a seed together with a block counter.

use std::convert::Infallible;

use sha2::{Digest, Sha256};

use crate::sampler::ByteSource;
use crate::DerivationRequest;

/// Size of one SHA-256 output block.
pub const BLOCK_LEN: usize = 32;

/// Produces `SHA-256(seed || counter_be64)` for counter = 0, 1, 2, … and hands the concatenated
/// blocks out one byte at a time.
///
/// A stream is meant to be owned by a single derivation. Two streams over the same seed produce
/// the same bytes; reusing one for a second derivation would just continue where the first one
/// left off.
pub struct ByteStream {
    seed: Vec<u8>,
    counter: u64,
    block: [u8; BLOCK_LEN],
    /// Offset of the next unread byte in `block`. `BLOCK_LEN` means the block is used up (or was
    /// never filled).
    cursor: usize,
}

opaque_debug::implement!(ByteStream);

impl ByteStream {
    pub fn new(seed: impl Into<Vec<u8>>) -> ByteStream {
        ByteStream {
            seed: seed.into(),
            counter: 0,
            block: [0; BLOCK_LEN],
            cursor: BLOCK_LEN,
        }
    }

    /// A fresh stream seeded from the request's salt, input, level and length.
    pub fn from_request(request: &DerivationRequest) -> ByteStream {
        ByteStream::new(request.seed())
    }

    /// The number of blocks hashed so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn next_byte(&mut self) -> u8 {
        if self.cursor >= BLOCK_LEN {
            self.refill();
        }
        let byte = self.block[self.cursor];
        self.cursor += 1;
        byte
    }

    fn refill(&mut self) {
        tracing::trace!(counter = self.counter, "hashing next block");
        let mut hasher = Sha256::new();
        hasher.update(&self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.block.copy_from_slice(&hasher.finalize());
        self.cursor = 0;
        self.counter += 1;
    }
}

impl ByteSource for ByteStream {
    type Error = Infallible;

    fn try_next_byte(&mut self) -> Result<u8, Infallible> {
        Ok(self.next_byte())
    }
}
