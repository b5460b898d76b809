//! Password verification.
//!
//! [`verify`] collapses every failure, whether a malformed hash string or a
//! wrong password, into `false`. Callers that want to tell users their stored
//! hash is unreadable should check it with [`parse`] first.

use tracing::{debug, instrument};

use crate::derive::derive_key;
use crate::encoding::{DecodedHash, decode};
use crate::error::Argon2idError;

/// Checks a password against a hash string.
///
/// Returns `true` only if `token` decodes and the password derives the key it
/// carries. Never panics or errors on bad input.
///
/// ## Examples
///
/// ```rust
/// use argon_hash::{Hasher, ParameterSet, verify};
///
/// let hasher = Hasher::new(ParameterSet::new(1, 1024, 1, 16, 32).unwrap());
/// let hash = hasher.hash("correct-password").unwrap();
///
/// assert!(verify(&hash, "correct-password"));
/// assert!(!verify(&hash, "wrong-password"));
/// assert!(!verify("not-a-valid-hash", "correct-password"));
/// ```
#[instrument(skip_all)]
pub fn verify(token: &str, password: impl AsRef<[u8]>) -> bool {
    match decode(token) {
        Ok(decoded) => decoded.verify(password),
        Err(err) => {
            debug!(kind = ?err.kind(), "rejected hash string");
            false
        }
    }
}

/// Decodes a hash string, surfacing why it is unusable.
///
/// This is the only entry point that exposes decode errors.
///
/// ## Errors
///
/// See [`decode`](crate::decode).
pub fn parse(token: &str) -> Result<DecodedHash, Argon2idError> {
    decode(token)
}

impl DecodedHash {
    /// Re-derives a key from `password` with this hash's parameters and salt
    /// and compares it to the expected key in constant time.
    #[instrument(
        skip_all,
        fields(
            m = self.params().memory_kib(),
            t = self.params().iterations(),
            p = self.params().parallelism()
        )
    )]
    pub fn verify(&self, password: impl AsRef<[u8]>) -> bool {
        match derive_key(password.as_ref(), self.salt(), self.params()) {
            Ok(candidate) => constant_time_eq(&candidate, self.key()),
            Err(err) => {
                debug!(kind = ?err.kind(), "key derivation failed");
                false
            }
        }
    }
}

/// Compares two byte slices in time independent of their contents.
///
/// Slices of different lengths compare unequal immediately; length is a
/// property of the hash string, not a secret. Otherwise every byte pair is
/// visited and differences are OR-accumulated with no early exit.
#[inline(never)]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }

    std::hint::black_box(diff) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hasher::Hasher;
    use crate::params::ParameterSet;
    use proptest::prelude::*;

    fn fast_hasher() -> Hasher {
        Hasher::new(ParameterSet::new(1, 64, 1, 16, 32).unwrap())
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = fast_hasher().hash("correct-password").unwrap();
        assert!(verify(&hash, "correct-password"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = fast_hasher().hash("correct-password").unwrap();
        assert!(!verify(&hash, "wrong-password"));
        assert!(!verify(&hash, "correct-passwor"));
        assert!(!verify(&hash, ""));
    }

    #[test]
    fn test_each_salted_hash_verifies_independently() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same-password").unwrap();
        let hash2 = hasher.hash("same-password").unwrap();
        assert_ne!(hash1, hash2);
        assert!(verify(&hash1, "same-password"));
        assert!(verify(&hash2, "same-password"));
    }

    #[test]
    fn test_empty_unicode_and_long_passwords() {
        let hasher = fast_hasher();
        for password in [String::new(), "パスワード🔐".to_string(), "a".repeat(1000)] {
            let hash = hasher.hash(&password).unwrap();
            assert!(verify(&hash, &password));
            assert!(!verify(&hash, "password"));
        }
    }

    #[test]
    fn test_tampered_key_fails() {
        let hash = fast_hasher().hash("password").unwrap();
        let (prefix, key) = hash.rsplit_once('$').unwrap();
        let flipped = if key.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{prefix}${flipped}{}", &key[1..]);
        assert!(!verify(&tampered, "password"));
    }

    #[test]
    fn test_tampered_params_fail() {
        let hash = fast_hasher().hash("password").unwrap();
        let tampered = hash.replacen("t=1", "t=2", 1);
        assert!(parse(&tampered).is_ok());
        assert!(!verify(&tampered, "password"));
    }

    #[test]
    fn test_malformed_input_is_false_not_error() {
        let hash = fast_hasher().hash("password").unwrap();
        let segments: Vec<&str> = hash.split('$').collect();

        let cases = [
            (String::new(), ErrorKind::MalformedToken),
            (hash.replacen("$argon2id$", "$argon2i$", 1), ErrorKind::UnsupportedVariant),
            (hash.replacen("$v=19$", "$v=16$", 1), ErrorKind::UnsupportedVersion),
            (segments[..5].join("$"), ErrorKind::MalformedToken),
            (hash.replacen("m=64", "m=sixtyfour", 1), ErrorKind::MalformedToken),
            (format!("{}$!!!!", segments[..5].join("$")), ErrorKind::MalformedToken),
            (hash.replacen("p=1", "p=0", 1), ErrorKind::InvalidParameter),
        ];

        for (input, kind) in cases {
            assert!(!verify(&input, "password"), "{input}");
            assert_eq!(parse(&input).unwrap_err().kind(), kind, "{input}");
        }
    }

    #[test]
    fn test_unsatisfiable_memory_cost_is_false() {
        let hash = concat!(
            "$argon2id$v=19$m=4294967295,t=1,p=1",
            "$c29tZXNhbHRzb21lc2FsdA",
            "$KioqKioqKioqKioqKioqKioqKioqKioqKioqKioqKio",
        );
        assert!(parse(hash).is_ok());
        assert!(!verify(hash, "password"));
    }

    #[test]
    fn test_decoded_hash_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DecodedHash>();
    }

    #[test]
    fn test_concurrent_verify_of_one_decoded_hash() {
        let decoded = parse(&fast_hasher().hash("password").unwrap()).unwrap();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let decoded = &decoded;
                scope.spawn(move || {
                    assert!(decoded.verify("password"));
                    assert!(!decoded.verify(format!("password-{i}")));
                });
            }
        });
    }

    #[test]
    fn test_parse_accepts_what_hash_produces() {
        let hasher = fast_hasher();
        let hash = hasher.hash("password").unwrap();
        let decoded = parse(&hash).unwrap();
        assert_eq!(decoded.params(), hasher.params());
        assert!(decoded.verify("password"));
        assert!(!decoded.verify("Password"));
    }

    #[test]
    fn test_default_parameters_scenario() {
        let hash = crate::hash("password").unwrap();

        let segments: Vec<&str> = hash.split('$').collect();
        assert_eq!(segments.len(), 6);
        assert_eq!(segments[..4], ["", "argon2id", "v=19", "m=65536,t=1,p=1"]);
        assert!(!segments[4].is_empty() && !segments[4].contains('='));
        assert!(!segments[5].is_empty() && !segments[5].contains('='));

        assert!(verify(&hash, "password"));
        assert!(!verify(&hash, "passwor"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"xbc"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }

    proptest! {
        #[test]
        fn prop_constant_time_eq_agrees_with_eq(
            a in proptest::collection::vec(any::<u8>(), 0..64),
            b in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            prop_assert_eq!(constant_time_eq(&a, &b), a == b);
            prop_assert!(constant_time_eq(&a, &a.clone()));
        }
    }
}
