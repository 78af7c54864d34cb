use std::fmt::{Debug, Display};
use subtle::ConstantTimeEq;

use super::{
    hmac::{hmac, hmac2},
    key::{SecretKey, KEY_LENGTH},
};

/// The running MAC of a macaroon. Each step of the chain uses the previous
/// signature as the key for the next HMAC.
///
/// Equality is evaluated in constant time.
#[derive(Clone, Copy, Eq)]
pub struct Signature([u8; KEY_LENGTH]);

impl Signature {
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Signature(bytes)
    }

    /// Interpret a byte slice as a signature, if it has the right length
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Signature)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The first link of a chain: `HMAC(derived_key, identifier)`
    pub(crate) fn initial(key: &SecretKey, identifier: &[u8]) -> Self {
        Signature(hmac(key.as_bytes(), identifier))
    }

    /// Advance the chain over a single message
    pub(crate) fn chain(&self, message: &[u8]) -> Self {
        Signature(hmac(&self.0, message))
    }

    /// Advance the chain over two messages bound together
    pub(crate) fn chain2(&self, first: &[u8], second: &[u8]) -> Self {
        Signature(hmac2(&self.0, first, second))
    }

    /// Bind a discharge signature to the signature of the macaroon it will
    /// accompany, so that the discharge cannot be replayed with any other
    /// macaroon
    pub fn bind_to(&self, root: &Signature) -> Self {
        Signature(hmac2(&[0u8; KEY_LENGTH], &root.0, &self.0))
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signature").field(&self.to_hex()).finish()
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; KEY_LENGTH]> for Signature {
    fn from(bytes: [u8; KEY_LENGTH]) -> Self {
        Signature(bytes)
    }
}
