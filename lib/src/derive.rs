//! Adapter over the Argon2id primitive from the `argon2` crate.

use argon2::{Algorithm, Argon2, Block, Params, Version};
use zeroize::Zeroizing;

use crate::error::Argon2idError;
use crate::params::ParameterSet;

/// Derives `params.key_length()` bytes from a password and salt using
/// Argon2id version 0x13.
///
/// The returned buffer is wiped when dropped. Working memory is reserved up
/// front, so a memory cost the host cannot satisfy is an error rather than an
/// abort.
///
/// ## Errors
///
/// - `OutOfMemory` if the `memory_kib` blocks cannot be allocated
/// - `Derivation` if the primitive rejects its inputs, which cannot happen
///   for a validated [`ParameterSet`] and a salt of `params.salt_length()`
///   bytes
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    params: &ParameterSet,
) -> Result<Zeroizing<Vec<u8>>, Argon2idError> {
    let key_length = params.key_length() as usize;
    let argon_params = Params::new(
        params.memory_kib(),
        params.iterations(),
        u32::from(params.parallelism()),
        Some(key_length),
    )?;
    let block_count = argon_params.block_count();
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut blocks: Vec<Block> = Vec::new();
    blocks.try_reserve_exact(block_count)?;
    blocks.resize(block_count, Block::default());

    let mut key = Zeroizing::new(vec![0u8; key_length]);
    argon2.hash_password_into_with_memory(password, salt, &mut key, &mut blocks)?;
    Ok(key)
}
