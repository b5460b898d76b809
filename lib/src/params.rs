//! Argon2id cost parameters.
//!
//! A [`ParameterSet`] is validated once, at construction, and is immutable
//! afterwards. Every hash string embeds the parameters it was produced with,
//! so verification never needs them supplied separately.
//!
//! ## Examples
//!
//! ```rust
//! use argon_hash::ParameterSet;
//!
//! let params = ParameterSet::new(3, 47104, 2, 16, 32).unwrap();
//! assert_eq!(params.to_string(), "m=47104,t=3,p=2");
//!
//! // The primitive needs at least 8 KiB of memory per lane
//! assert!(ParameterSet::new(1, 8, 2, 16, 32).is_err());
//! ```

use std::fmt;

use crate::error::Argon2idError;

/// Default time cost (number of passes over memory).
pub const DEFAULT_ITERATIONS: u32 = 1;

/// Default memory cost in KiB (64 MiB).
pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;

/// Default degree of parallelism.
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Default salt length in bytes.
pub const DEFAULT_SALT_LENGTH: u32 = 16;

/// Default derived key length in bytes.
pub const DEFAULT_KEY_LENGTH: u32 = 32;

/// Parallelism is encoded in a single byte.
pub const MAX_PARALLELISM: u32 = u8::MAX as u32;

/// Shortest salt the Argon2 primitive accepts.
pub const MIN_SALT_LENGTH: u32 = 8;

/// Shortest output the Argon2 primitive produces.
pub const MIN_KEY_LENGTH: u32 = 4;

/// Memory the primitive requires for each lane, in KiB.
const MIN_MEMORY_KIB_PER_LANE: u32 = 8;

/// Validated Argon2id cost parameters plus salt and key lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterSet {
    iterations: u32,
    memory_kib: u32,
    parallelism: u8,
    salt_length: u32,
    key_length: u32,
}

impl ParameterSet {
    /// Creates a parameter set, rejecting values the primitive cannot use.
    ///
    /// ## Errors
    ///
    /// Returns `Argon2idError::InvalidParameter` when any field is zero,
    /// `parallelism` exceeds 255, `memory_kib` is below `8 * parallelism`,
    /// or a length is below the primitive's minimum.
    pub fn new(
        iterations: u32,
        memory_kib: u32,
        parallelism: u32,
        salt_length: u32,
        key_length: u32,
    ) -> Result<Self, Argon2idError> {
        for (name, value) in [
            ("iterations", iterations),
            ("memory", memory_kib),
            ("parallelism", parallelism),
            ("salt length", salt_length),
            ("key length", key_length),
        ] {
            if value == 0 {
                return Err(Argon2idError::InvalidParameter(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        let parallelism = u8::try_from(parallelism).map_err(|_| {
            Argon2idError::InvalidParameter(format!(
                "parallelism must be at most {MAX_PARALLELISM}, got {parallelism}"
            ))
        })?;

        let min_memory = MIN_MEMORY_KIB_PER_LANE * u32::from(parallelism);
        if memory_kib < min_memory {
            return Err(Argon2idError::InvalidParameter(format!(
                "memory must be at least {min_memory} KiB for parallelism {parallelism}, got {memory_kib}"
            )));
        }

        if salt_length < MIN_SALT_LENGTH {
            return Err(Argon2idError::InvalidParameter(format!(
                "salt length must be at least {MIN_SALT_LENGTH} bytes, got {salt_length}"
            )));
        }

        if key_length < MIN_KEY_LENGTH {
            return Err(Argon2idError::InvalidParameter(format!(
                "key length must be at least {MIN_KEY_LENGTH} bytes, got {key_length}"
            )));
        }

        Ok(Self {
            iterations,
            memory_kib,
            parallelism,
            salt_length,
            key_length,
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn parallelism(&self) -> u8 {
        self.parallelism
    }

    pub fn salt_length(&self) -> u32 {
        self.salt_length
    }

    pub fn key_length(&self) -> u32 {
        self.key_length
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            memory_kib: DEFAULT_MEMORY_KIB,
            parallelism: DEFAULT_PARALLELISM as u8,
            salt_length: DEFAULT_SALT_LENGTH,
            key_length: DEFAULT_KEY_LENGTH,
        }
    }
}

/// Renders the parameter block of a hash string.
impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m={},t={},p={}",
            self.memory_kib, self.iterations, self.parallelism
        )
    }
}
