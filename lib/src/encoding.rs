//! The portable Argon2id hash string.
//!
//! A hash string looks like this:
//!
//! ```text
//! $argon2id$v=19$m=65536,t=1,p=1$<salt>$<key>
//! ```
//!
//! Salt and key are standard-alphabet base64 without padding. The format is
//! shared with the reference implementation and most other Argon2 libraries,
//! so strings produced here verify elsewhere and vice versa.
//!
//! Decoding is strict: anything [`encode`] could not have produced is
//! rejected, including padded base64, whitespace, and reordered parameters.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD as B64;
use zeroize::Zeroizing;

use crate::error::Argon2idError;
use crate::params::ParameterSet;
use crate::verifier::constant_time_eq;

/// Algorithm identifier segment.
pub const ALGORITHM: &str = "argon2id";

/// Argon2 version 0x13.
pub const VERSION: u32 = 19;

const SEGMENT_COUNT: usize = 6;

/// Serializes parameters, salt, and derived key into a hash string.
///
/// `salt` and `key` must be `params.salt_length()` and `params.key_length()`
/// bytes long.
pub fn encode(params: &ParameterSet, salt: &[u8], key: &[u8]) -> String {
    debug_assert_eq!(salt.len(), params.salt_length() as usize);
    debug_assert_eq!(key.len(), params.key_length() as usize);

    format!(
        "${ALGORITHM}$v={VERSION}${params}${}${}",
        B64.encode(salt),
        B64.encode(key)
    )
}

/// Recovers parameters, salt, and expected key from a hash string.
///
/// ## Errors
///
/// - `MalformedToken` for a wrong segment count, a bad parameter block, or
///   invalid or empty base64
/// - `UnsupportedVariant` when the identifier is not `argon2id`
/// - `UnsupportedVersion` when the version is not `v=19`
/// - `InvalidParameter` when the recovered values fail [`ParameterSet::new`]
pub fn decode(token: &str) -> Result<DecodedHash, Argon2idError> {
    let segments: Vec<&str> = token.split('$').collect();
    if segments.len() != SEGMENT_COUNT || !segments[0].is_empty() {
        return Err(Argon2idError::MalformedToken(
            "expected `$argon2id$v=..$m=..,t=..,p=..$salt$hash`",
        ));
    }

    let identifier = segments[1];
    if identifier != ALGORITHM {
        return Err(Argon2idError::UnsupportedVariant(identifier.to_string()));
    }

    let version = segments[2];
    if version.strip_prefix("v=").and_then(parse_decimal) != Some(VERSION) {
        return Err(Argon2idError::UnsupportedVersion(version.to_string()));
    }

    let (memory_kib, iterations, parallelism) = parse_cost_block(segments[3])?;

    let salt = decode_segment(segments[4], "salt is not valid unpadded base64")?;
    let key = Zeroizing::new(decode_segment(
        segments[5],
        "hash is not valid unpadded base64",
    )?);

    let params = ParameterSet::new(
        iterations,
        memory_kib,
        parallelism,
        length_of(&salt)?,
        length_of(&key)?,
    )?;

    Ok(DecodedHash { params, salt, key })
}

/// Parses `m=<u32>,t=<u32>,p=<u32>` in exactly that order.
fn parse_cost_block(block: &str) -> Result<(u32, u32, u32), Argon2idError> {
    const MALFORMED: Argon2idError =
        Argon2idError::MalformedToken("expected parameters `m=<memory>,t=<iterations>,p=<parallelism>`");

    let mut values = [0u32; 3];
    let mut pairs = block.split(',');
    for (slot, expected) in values.iter_mut().zip(["m", "t", "p"]) {
        let (name, value) = pairs
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or(MALFORMED)?;
        if name != expected {
            return Err(MALFORMED);
        }
        *slot = parse_decimal(value).ok_or(MALFORMED)?;
    }
    if pairs.next().is_some() {
        return Err(MALFORMED);
    }

    Ok((values[0], values[1], values[2]))
}

/// Parses an unsigned decimal with no sign, whitespace, or other decoration.
fn parse_decimal(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn decode_segment(segment: &str, message: &'static str) -> Result<Vec<u8>, Argon2idError> {
    let bytes = B64
        .decode(segment)
        .map_err(|_| Argon2idError::MalformedToken(message))?;
    if bytes.is_empty() {
        return Err(Argon2idError::MalformedToken(message));
    }
    Ok(bytes)
}

fn length_of(bytes: &[u8]) -> Result<u32, Argon2idError> {
    u32::try_from(bytes.len())
        .map_err(|_| Argon2idError::InvalidParameter("segment is too long".to_string()))
}

/// The parts of a decoded hash string.
///
/// Every decode yields fresh copies; the expected key is wiped on drop.
#[derive(Clone)]
pub struct DecodedHash {
    params: ParameterSet,
    salt: Vec<u8>,
    key: Zeroizing<Vec<u8>>,
}

impl DecodedHash {
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The derived key the hash string expects.
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

/// Keys are compared with [`constant_time_eq`](crate::constant_time_eq).
impl PartialEq for DecodedHash {
    fn eq(&self, other: &Self) -> bool {
        let same_key = constant_time_eq(&self.key, &other.key);
        self.params == other.params && self.salt == other.salt && same_key
    }
}

impl Eq for DecodedHash {}

impl fmt::Debug for DecodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedHash")
            .field("params", &self.params)
            .field("salt_len", &self.salt.len())
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Re-encodes to the canonical hash string.
impl fmt::Display for DecodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.params, &self.salt, &self.key))
    }
}

impl FromStr for DecodedHash {
    type Err = Argon2idError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
