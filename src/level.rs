//! Security levels and the character classes they draw from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PassgenError;

pub const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &[u8] = b"0123456789";
pub const SPECIAL: &[u8] = b"!@#%^&*()_=+[]{}:,.?-";

const MEDIUM_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const STRONG_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#%^&*()_=+[]{}:,.?-";

/// Controls which characters a derived password may contain, and which of them it must contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    /// Lowercase letters only.
    Low,
    /// Lowercase, uppercase and digits.
    Medium,
    /// Lowercase, uppercase, digits and punctuation.
    Strong,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 3] = [
        SecurityLevel::Low,
        SecurityLevel::Medium,
        SecurityLevel::Strong,
    ];

    /// The literal name of the level. This is also what goes into the derivation seed.
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityLevel::Low => "low",
            SecurityLevel::Medium => "medium",
            SecurityLevel::Strong => "strong",
        }
    }

    /// The classes a password of this level must cover, in the order they are covered.
    pub fn required_classes(self) -> &'static [&'static [u8]] {
        match self {
            SecurityLevel::Low => &[LOWER],
            SecurityLevel::Medium => &[LOWER, UPPER, DIGITS],
            SecurityLevel::Strong => &[LOWER, UPPER, DIGITS, SPECIAL],
        }
    }

    /// Every character the level allows: the required classes concatenated in order.
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            SecurityLevel::Low => LOWER,
            SecurityLevel::Medium => MEDIUM_ALPHABET,
            SecurityLevel::Strong => STRONG_ALPHABET,
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityLevel {
    type Err = PassgenError;

    fn from_str(s: &str) -> Result<SecurityLevel, PassgenError> {
        SecurityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| PassgenError::InvalidLevel(s.to_owned()))
    }
}
