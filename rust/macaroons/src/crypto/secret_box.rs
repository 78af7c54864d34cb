//! Authenticated encryption for the verification keys of third-party
//! caveats, using XChaCha20-Poly1305. A sealed box is laid out as
//! `nonce ‖ ciphertext ‖ tag`.
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use rand::{rngs::OsRng, RngCore};

use super::key::SecretKey;

pub const NONCE_LENGTH: usize = 24;
pub const TAG_LENGTH: usize = 16;

/// Encrypt `plaintext` under `key` with a fresh random nonce
pub fn seal(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, chacha20poly1305::Error> {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);
    seal_with_nonce(key, &nonce, plaintext)
}

pub(crate) fn seal_with_nonce(
    key: &SecretKey,
    nonce: &[u8; NONCE_LENGTH],
    plaintext: &[u8],
) -> Result<Vec<u8>, chacha20poly1305::Error> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let ciphertext = cipher.encrypt(XNonce::from_slice(nonce), plaintext)?;

    let mut sealed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    sealed.extend_from_slice(nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypt a box produced by [seal]; yields `None` if the key is wrong or
/// any byte of the box was altered
pub fn open(key: &SecretKey, sealed: &[u8]) -> Option<Vec<u8>> {
    if sealed.len() < NONCE_LENGTH + TAG_LENGTH {
        return None;
    }

    let (nonce, ciphertext) = sealed.split_at(NONCE_LENGTH);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher.decrypt(XNonce::from_slice(nonce), ciphertext).ok()
}
