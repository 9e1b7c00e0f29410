//! Composes a password from a derivation request.
//!
//! The draw order is part of the output format: one character per required class (in class
//! order), then the rest from the full alphabet, then a descending Fisher-Yates shuffle. Changing
//! any of it changes every password ever derived.

use crate::byte_stream::ByteStream;
use crate::sampler::Sampler;
use crate::{DerivationRequest, Secret};

/// Derive the password for `request`.
///
/// This is a pure function of the request. A fresh byte stream is seeded for every call and
/// dropped before returning.
pub fn derive(request: &DerivationRequest) -> Secret {
    tracing::debug!(
        length = request.length(),
        level = %request.level(),
        "deriving password"
    );
    let mut sampler = Sampler::new(ByteStream::from_request(request));
    let level = request.level();
    let length = request.length();
    let mut chars = Vec::with_capacity(length);

    // If the password is shorter than the number of classes, only the leading classes make it.
    for class in level.required_classes() {
        if chars.len() >= length {
            break;
        }
        chars.push(class[sampler.below(class.len())]);
    }

    let alphabet = level.alphabet();
    while chars.len() < length {
        chars.push(alphabet[sampler.below(alphabet.len())]);
    }

    for i in (1..chars.len()).rev() {
        let j = sampler.below(i + 1);
        chars.swap(i, j);
    }

    Secret(chars.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{DIGITS, LOWER, SPECIAL, UPPER};
    use crate::SecurityLevel;

    fn derive_str(input: &str, salt: &str, length: usize, level: SecurityLevel) -> String {
        let request = DerivationRequest::new(input, salt, length, level).unwrap();
        derive(&request).into_string()
    }

    fn contains_any(password: &str, class: &[u8]) -> bool {
        password.bytes().any(|b| class.contains(&b))
    }

    #[test]
    fn known_strong_password() {
        let password = derive_str("myinput", "mysalt", 20, SecurityLevel::Strong);
        assert_eq!(password, "cm!BShcIo2=?wx(70pQq");
    }

    #[test]
    fn single_low_character() {
        assert_eq!(derive_str("a", "", 1, SecurityLevel::Low), "u");
    }

    #[test]
    fn short_passwords_cover_leading_classes_only() {
        // Two slots for four classes: one lowercase and one uppercase, shuffled.
        let password = derive_str("x", "", 2, SecurityLevel::Strong);
        assert_eq!(password, "Hd");
        assert!(contains_any(&password, LOWER));
        assert!(contains_any(&password, UPPER));
        assert!(!contains_any(&password, DIGITS));
        assert!(!contains_any(&password, SPECIAL));
    }

    #[test]
    fn every_level_covers_its_classes() {
        for level in SecurityLevel::ALL {
            let password = derive_str("testinput", "testsalt", 16, level);
            assert_eq!(password.len(), 16);
            for class in level.required_classes() {
                assert!(contains_any(&password, class), "{level}: {password}");
            }
            assert!(password.bytes().all(|b| level.alphabet().contains(&b)));
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let request = DerivationRequest::new("repeat", "me", 4096, SecurityLevel::Strong).unwrap();
        assert_eq!(derive(&request), derive(&request));
    }

    #[test]
    fn each_field_changes_the_output() {
        let base = derive_str("input", "salt", 24, SecurityLevel::Medium);
        assert_ne!(base, derive_str("input2", "salt", 24, SecurityLevel::Medium));
        assert_ne!(base, derive_str("input", "salt2", 24, SecurityLevel::Medium));
        assert_ne!(base, derive_str("input", "salt", 24, SecurityLevel::Strong));
        // A different length re-seeds the stream, so the shorter password is not a prefix.
        let shorter = derive_str("input", "salt", 23, SecurityLevel::Medium);
        assert!(!base.starts_with(&shorter));
    }
}
