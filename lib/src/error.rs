//! Error types for Argon2id hashing and token decoding.

use thiserror::Error;

/// Errors that can occur while hashing a password or decoding a hash string.
///
/// None of the messages carry password, salt, or key material.
#[derive(Debug, Error)]
pub enum Argon2idError {
    /// A cost or length parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The hash string is structurally wrong.
    #[error("malformed hash: {0}")]
    MalformedToken(&'static str),

    /// The hash string names an algorithm other than `argon2id`.
    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// The hash string names a version other than 19.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),

    /// The operating system random source could not produce a salt.
    #[error("secure random source unavailable: {0}")]
    RandomSourceFailure(#[from] rand::Error),

    /// The working memory for the requested memory cost could not be
    /// allocated.
    #[error("insufficient memory for key derivation: {0}")]
    OutOfMemory(#[from] std::collections::TryReserveError),

    /// The Argon2 primitive rejected its inputs.
    #[error("key derivation failed: {0}")]
    Derivation(#[from] argon2::Error),
}

/// The category of an [`Argon2idError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    MalformedToken,
    UnsupportedVariant,
    UnsupportedVersion,
    RandomSourceFailure,
    OutOfMemory,
    Derivation,
}

impl Argon2idError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::MalformedToken(_) => ErrorKind::MalformedToken,
            Self::UnsupportedVariant(_) => ErrorKind::UnsupportedVariant,
            Self::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            Self::RandomSourceFailure(_) => ErrorKind::RandomSourceFailure,
            Self::OutOfMemory(_) => ErrorKind::OutOfMemory,
            Self::Derivation(_) => ErrorKind::Derivation,
        }
    }
}
