//! Password hashing.
//!
//! ## Examples
//!
//! ```rust
//! use argon_hash::{Hasher, ParameterSet, verify};
//!
//! // Small parameters keep the doctest fast
//! let hasher = Hasher::new(ParameterSet::new(1, 1024, 1, 16, 32).unwrap());
//! let hash = hasher.hash("my-secret-password").unwrap();
//!
//! assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
//! assert!(verify(&hash, "my-secret-password"));
//! ```

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

use crate::derive::derive_key;
use crate::encoding::encode;
use crate::error::Argon2idError;
use crate::params::ParameterSet;

/// Hashes passwords with a fixed [`ParameterSet`].
///
/// Every call draws a fresh salt, so hashing the same password twice yields
/// two different hash strings that both verify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hasher {
    params: ParameterSet,
}

impl Hasher {
    pub fn new(params: ParameterSet) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Hashes a password using a salt from the operating system's secure
    /// random source.
    ///
    /// ## Errors
    ///
    /// Returns `Argon2idError::RandomSourceFailure` if the random source is
    /// unavailable. This is not retried. Returns `Argon2idError::OutOfMemory`
    /// if the host cannot provide `memory_kib` of working memory.
    pub fn hash(&self, password: impl AsRef<[u8]>) -> Result<String, Argon2idError> {
        self.hash_with_rng(&mut OsRng, password)
    }

    /// Hashes a password using a salt drawn from `rng`.
    ///
    /// ## Errors
    ///
    /// Returns `Argon2idError::RandomSourceFailure` if `rng` fails to fill
    /// the salt.
    #[instrument(
        skip_all,
        fields(
            m = self.params.memory_kib(),
            t = self.params.iterations(),
            p = self.params.parallelism()
        )
    )]
    pub fn hash_with_rng<R>(
        &self,
        rng: &mut R,
        password: impl AsRef<[u8]>,
    ) -> Result<String, Argon2idError>
    where
        R: RngCore + CryptoRng,
    {
        let mut salt = vec![0u8; self.params.salt_length() as usize];
        rng.try_fill_bytes(&mut salt)?;

        let key = derive_key(password.as_ref(), &salt, &self.params)?;
        debug!("derived key");

        Ok(encode(&self.params, &salt, &key))
    }
}

/// Hashes a password with the default parameters
/// (`m=65536,t=1,p=1`, 16-byte salt, 32-byte key).
///
/// ## Errors
///
/// Returns `Argon2idError::RandomSourceFailure` if the random source is
/// unavailable.
pub fn hash(password: impl AsRef<[u8]>) -> Result<String, Argon2idError> {
    Hasher::default().hash(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::decode;
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fast_hasher() -> Hasher {
        Hasher::new(ParameterSet::new(1, 64, 1, 16, 32).unwrap())
    }

    /// A random source that always fails.
    struct ExhaustedRng;

    impl RngCore for ExhaustedRng {
        fn next_u32(&mut self) -> u32 {
            unreachable!("salt generation must use try_fill_bytes")
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!("salt generation must use try_fill_bytes")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unreachable!("salt generation must use try_fill_bytes")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source exhausted"))
        }
    }

    impl CryptoRng for ExhaustedRng {}

    #[test]
    fn test_hash_embeds_configured_params() {
        let hasher = Hasher::new(ParameterSet::new(2, 128, 2, 24, 40).unwrap());
        let hash = hasher.hash("password").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=128,t=2,p=2$"));

        let decoded = decode(&hash).unwrap();
        assert_eq!(decoded.params(), hasher.params());
        assert_eq!(decoded.salt().len(), 24);
        assert_eq!(decoded.key().len(), 40);
    }

    #[test]
    fn test_hash_unique_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same-password").unwrap();
        let hash2 = hasher.hash("same-password").unwrap();
        assert_ne!(hash1, hash2);
        assert_ne!(decode(&hash1).unwrap().salt(), decode(&hash2).unwrap().salt());
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let hasher = fast_hasher();
        let hash1 = hasher
            .hash_with_rng(&mut StdRng::seed_from_u64(7), "password")
            .unwrap();
        let hash2 = hasher
            .hash_with_rng(&mut StdRng::seed_from_u64(7), "password")
            .unwrap();
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_random_source_failure_is_surfaced() {
        let err = fast_hasher()
            .hash_with_rng(&mut ExhaustedRng, "password")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RandomSourceFailure);
    }

    #[test]
    fn test_unsatisfiable_memory_cost_is_surfaced() {
        let hasher = Hasher::new(ParameterSet::new(1, u32::MAX, 1, 16, 32).unwrap());
        let err = hasher.hash("password").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfMemory);
    }

    #[test]
    fn test_hasher_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Hasher>();
    }

    #[test]
    fn test_concurrent_hash_and_verify() {
        let hasher = fast_hasher();

        let hashes: Vec<(String, String)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let hasher = &hasher;
                    scope.spawn(move || {
                        let password = format!("password-{i}");
                        let hash = hasher.hash(&password).unwrap();
                        assert!(crate::verify(&hash, &password));
                        assert!(!crate::verify(&hash, "password"));
                        (password, hash)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, (password, hash)) in hashes.iter().enumerate() {
            assert!(crate::verify(hash, password));
            for (other, _) in hashes.iter().skip(i + 1) {
                assert!(!crate::verify(hash, other));
            }
        }
    }

    #[test]
    fn test_hash_accepts_bytes_and_strings() {
        let hasher = fast_hasher();
        assert!(hasher.hash(b"bytes").is_ok());
        assert!(hasher.hash(String::from("owned")).is_ok());
        assert!(hasher.hash(vec![0xff, 0x00, 0x10]).is_ok());
    }

    #[test]
    fn test_default_hash_format() {
        let hash = hash("password").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=65536,t=1,p=1$"));
        assert_eq!(hash.split('$').count(), 6);
    }
}
