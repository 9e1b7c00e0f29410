//! Derivation parameters, their validation, and the seed they produce.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PassgenError, SecurityLevel};

/// Longest accepted input, counted in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

/// Longest password (or random string) that can be produced.
pub const MAX_LENGTH: usize = 4096;

/// A validated set of derivation parameters.
///
/// The only way to get one is through [`DerivationRequest::new`], [`DerivationRequest::parse`] or
/// deserialization, all of which run the same checks, so a `DerivationRequest` is always
/// derivable.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawRequest")]
pub struct DerivationRequest {
    input: String,
    salt: String,
    length: usize,
    level: SecurityLevel,
}

impl DerivationRequest {
    pub fn new(
        input: impl Into<String>,
        salt: impl Into<String>,
        length: usize,
        level: SecurityLevel,
    ) -> Result<DerivationRequest, PassgenError> {
        let input = input.into();
        check_input_and_length(&input, length)?;
        Ok(DerivationRequest {
            input,
            salt: salt.into(),
            length,
            level,
        })
    }

    /// Like [`DerivationRequest::new`], with the level given by its literal name.
    ///
    /// The input and length are checked before the level, so a request that is wrong in several
    /// ways reports the input or length problem.
    pub fn parse(
        input: impl Into<String>,
        salt: impl Into<String>,
        length: usize,
        level: &str,
    ) -> Result<DerivationRequest, PassgenError> {
        let input = input.into();
        check_input_and_length(&input, length)?;
        let level = level.parse()?;
        Ok(DerivationRequest {
            input,
            salt: salt.into(),
            length,
            level,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    /// The bytes the derivation stream is seeded with: salt, input, level name and the decimal
    /// length, with nothing in between.
    pub fn seed(&self) -> Vec<u8> {
        format!("{}{}{}{}", self.salt, self.input, self.level, self.length).into_bytes()
    }
}

// Input and salt stay out of logs and panic messages.
impl fmt::Debug for DerivationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRequest")
            .field("length", &self.length)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

fn check_input_and_length(input: &str, length: usize) -> Result<(), PassgenError> {
    if input.is_empty() {
        return Err(PassgenError::EmptyInput);
    }
    if input.chars().count() > MAX_INPUT_CHARS {
        return Err(PassgenError::InputTooLong);
    }
    if !(1..=MAX_LENGTH).contains(&length) {
        return Err(PassgenError::InvalidLength);
    }
    Ok(())
}

/// The unchecked shape of a request, as it appears in JSON.
#[derive(Deserialize)]
struct RawRequest {
    input: String,
    #[serde(default)]
    salt: String,
    length: i64,
    level: String,
}

impl TryFrom<RawRequest> for DerivationRequest {
    type Error = PassgenError;

    fn try_from(raw: RawRequest) -> Result<DerivationRequest, PassgenError> {
        let length = usize::try_from(raw.length).map_err(|_| PassgenError::InvalidLength)?;
        DerivationRequest::parse(raw.input, raw.salt, length, &raw.level)
    }
}
