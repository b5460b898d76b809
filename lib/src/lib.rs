//! Argon2id password hashing with portable hash strings.
//!
//! A password is hashed into a single self-describing string that carries
//! everything verification needs: algorithm, version, cost parameters, salt,
//! and derived key.
//!
//! ```text
//! $argon2id$v=19$m=65536,t=1,p=1$<base64 salt>$<base64 key>
//! ```
//!
//! ## Core Types
//!
//! - [`ParameterSet`] - Validated cost parameters and salt/key lengths
//! - [`Hasher`] - Hashes passwords with a fixed `ParameterSet`
//! - [`DecodedHash`] - The parts of a decoded hash string
//!
//! ## Entry Points
//!
//! - [`hash`] - Hash with default parameters
//! - [`verify`] - Check a password; any failure is `false`
//! - [`parse`] - Decode a hash string, surfacing why it is unusable
//!
//! All entry points are synchronous and share no state, so they are safe to
//! call from many threads at once. Callers that need to bound the memory used
//! by concurrent derivations must do so themselves.
//!
//! ## Examples
//!
//! ```rust
//! use argon_hash::{Hasher, ParameterSet, parse, verify};
//!
//! let hasher = Hasher::new(ParameterSet::new(2, 4096, 1, 16, 32).unwrap());
//! let hash = hasher.hash("my-secret-password").unwrap();
//!
//! assert!(verify(&hash, "my-secret-password"));
//! assert!(!verify(&hash, "wrong-password"));
//!
//! let decoded = parse(&hash).unwrap();
//! assert_eq!(decoded.params().iterations(), 2);
//! ```

mod derive;
mod encoding;
mod error;
mod hasher;
mod params;
mod verifier;

pub use derive::derive_key;
pub use encoding::{ALGORITHM, DecodedHash, VERSION, decode, encode};
pub use error::{Argon2idError, ErrorKind};
pub use hasher::{Hasher, hash};
pub use params::{
    DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM,
    DEFAULT_SALT_LENGTH, MAX_PARALLELISM, MIN_KEY_LENGTH, MIN_SALT_LENGTH, ParameterSet,
};
pub use verifier::{constant_time_eq, parse, verify};
