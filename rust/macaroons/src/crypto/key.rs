use rand::{rngs::OsRng, RngCore};
use std::fmt::Debug;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::hmac::hmac;

/// The length in bytes of every derived key, verification key and signature
pub const KEY_LENGTH: usize = 32;

/// Domain separation constant used to turn an arbitrary root secret into a
/// signing key. Shared by every macaroon implementation that aims to
/// interoperate with libmacaroons.
const KEY_GENERATOR: &[u8] = b"macaroons-key-generator";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Secret keys must be {KEY_LENGTH} bytes long, but got {0} bytes")]
    InvalidLength(usize),
}

/// A 32-byte secret. Used for generated root keys, for the keys derived from
/// them and for the verification keys of third-party caveats.
///
/// The bytes are wiped from memory when the key is dropped, and are never
/// printed by the [Debug] implementation.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LENGTH]);

impl SecretKey {
    /// Generate a new, random key using the operating system's CSPRNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        SecretKey(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        SecretKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for SecretKey {}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl AsRef<[u8]> for SecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; KEY_LENGTH]> for SecretKey {
    fn from(bytes: [u8; KEY_LENGTH]) -> Self {
        SecretKey(bytes)
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        Ok(SecretKey(bytes))
    }
}

/// Generate a random 32-byte secret suitable for use as a root key or as the
/// verification key of a third-party caveat
pub fn generate_secret_key() -> SecretKey {
    SecretKey::generate()
}

/// Derive the initial signing key of a chain from a root secret of any
/// length, so that raw root keys are never fed to the chain directly
pub fn derive_key(root_key: &[u8]) -> SecretKey {
    SecretKey(hmac(KEY_GENERATOR, root_key))
}
