//! Unbiased bounded-integer sampling by rejection, on top of any byte source.

use crate::byte_stream::ByteStream;

/// Something that hands out bytes one at a time.
pub trait ByteSource {
    type Error;

    fn try_next_byte(&mut self) -> Result<u8, Self::Error>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    type Error = S::Error;

    fn try_next_byte(&mut self) -> Result<u8, S::Error> {
        (**self).try_next_byte()
    }
}

/// Draws integers uniformly from `[0, n)`.
///
/// Candidates are read as big-endian integers made of the fewest whole bytes that cover `n`: one
/// byte for `n <= 256`, two for `n <= 65536`, and so on. A candidate is only accepted if it falls
/// below the largest multiple of `n` that fits in that space, which removes modulo bias. Fewer
/// than two candidates are needed on average for any `n`.
#[derive(Debug)]
pub struct Sampler<S> {
    source: S,
}

impl<S: ByteSource> Sampler<S> {
    pub fn new(source: S) -> Sampler<S> {
        Sampler { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Returns a value in `[0, n)`. `n == 0` returns 0 without consuming anything.
    pub fn sample_below(&mut self, n: usize) -> Result<usize, S::Error> {
        if n == 0 {
            return Ok(0);
        }
        let width = candidate_width(n);
        let space = 1u128 << (8 * width);
        let bound = n as u128;
        let limit = space - space % bound;
        loop {
            let mut candidate = 0u128;
            for _ in 0..width {
                candidate = (candidate << 8) | u128::from(self.source.try_next_byte()?);
            }
            if candidate < limit {
                // The remainder is below `n`, so it fits back into a usize.
                return Ok((candidate % bound) as usize);
            }
        }
    }
}

impl Sampler<ByteStream> {
    /// [`Sampler::sample_below`] for the hash stream, which cannot fail.
    pub fn below(&mut self, n: usize) -> usize {
        match self.sample_below(n) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

/// Number of bytes per candidate: the smallest `k >= 1` with `256^k >= n`.
fn candidate_width(n: usize) -> u32 {
    let bits = usize::BITS - (n - 1).leading_zeros();
    ((bits + 7) / 8).max(1)
}
