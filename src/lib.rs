//! Deterministic password derivation.
//!
//! A password is derived from an input, an optional salt, a length and a [`SecurityLevel`]. The
//! same four values give the same password on any machine, so a password can be recovered by
//! supplying them again instead of being stored anywhere.
//!
//! ```
//! let password = passgen::derive_password("myinput", "mysalt", 20, "strong").unwrap();
//! assert_eq!(password.as_str(), "cm!BShcIo2=?wx(70pQq");
//! ```

use serde::{Deserialize, Serialize};

pub mod byte_stream;
mod compose;
mod level;
pub mod password_generation;
mod request;
pub mod sampler;

pub use compose::derive;
pub use level::{SecurityLevel, DIGITS, LOWER, SPECIAL, UPPER};
pub use password_generation::{generate_random_string, DEFAULT_SALT_LENGTH};
pub use request::{DerivationRequest, MAX_INPUT_CHARS, MAX_LENGTH};

/// Validate the parameters and derive the password in one step.
pub fn derive_password(
    input: &str,
    salt: &str,
    length: usize,
    level: &str,
) -> Result<Secret, PassgenError> {
    let request = DerivationRequest::parse(input, salt, length, level)?;
    Ok(derive(&request))
}

#[derive(Debug, thiserror::Error)]
pub enum PassgenError {
    #[error("input required")]
    EmptyInput,
    #[error("input too long (at most 1000 characters)")]
    InputTooLong,
    #[error("invalid length (must be between 1 and 4096)")]
    InvalidLength,
    #[error("invalid level {0:?} (expected low, medium or strong)")]
    InvalidLevel(String),
    #[error("random string length {0} too large (at most 4096)")]
    RandomStringTooLong(usize),
    #[error("entropy source failure: {0}")]
    EntropySource(#[from] rand::Error),
}

/// A derived password. Its `Debug` output does not show the contents.
#[derive(Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

opaque_debug::implement!(Secret);

impl Secret {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Secret {
        Secret(s)
    }
}
