//! Non-deterministic random strings, for minting fresh salts.
//!
//! Nothing in here is reproducible, and none of it is used when deriving a password.

use rand::{CryptoRng, RngCore};

use crate::request::MAX_LENGTH;
use crate::sampler::{ByteSource, Sampler};
use crate::PassgenError;

/// Length used when the caller asks for a random string of length 0.
pub const DEFAULT_SALT_LENGTH: usize = 32;

/// The characters random strings are drawn from.
pub const RANDOM_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random alphanumeric string from the operating system's entropy source.
///
/// A `length` of 0 means [`DEFAULT_SALT_LENGTH`].
pub fn generate_random_string(length: usize) -> Result<String, PassgenError> {
    generate_random_string_with(&mut rand::rngs::OsRng, length)
}

/// Generate a random alphanumeric string by sampling `RANDOM_CHARSET` with `rng`.
///
/// Every character is drawn with the same rejection sampler the derivation path uses, so there is
/// no modulo bias. Failures of `rng` are returned as [`PassgenError::EntropySource`]; nothing
/// weaker is substituted.
pub fn generate_random_string_with<R>(rng: &mut R, length: usize) -> Result<String, PassgenError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let length = if length == 0 {
        DEFAULT_SALT_LENGTH
    } else {
        length
    };
    if length > MAX_LENGTH {
        return Err(PassgenError::RandomStringTooLong(length));
    }
    tracing::debug!(length, "generating random string");

    let mut sampler = Sampler::new(EntropySource(rng));
    let mut random = String::with_capacity(length);
    for _ in 0..length {
        let idx = sampler.sample_below(RANDOM_CHARSET.len())?;
        random.push(char::from(RANDOM_CHARSET[idx]));
    }
    Ok(random)
}

struct EntropySource<'a, R: ?Sized>(&'a mut R);

impl<R: RngCore + ?Sized> ByteSource for EntropySource<'_, R> {
    type Error = rand::Error;

    fn try_next_byte(&mut self) -> Result<u8, rand::Error> {
        let mut byte = [0u8; 1];
        self.0.try_fill_bytes(&mut byte)?;
        Ok(byte[0])
    }
}
