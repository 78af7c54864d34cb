use ::hmac::{Hmac, Mac};
use sha2::Sha256;

use super::key::KEY_LENGTH;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 of `message` under `key`
pub fn hmac(key: &[u8], message: &[u8]) -> [u8; KEY_LENGTH] {
    // NOTE: HMAC is defined for keys of any length, so this never fails
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(message);

    let mut digest = [0u8; KEY_LENGTH];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

/// Bind two variable-length messages into one MAC without ambiguity:
/// `HMAC(key, HMAC(key, first) ‖ HMAC(key, second))`. The inner MACs have a
/// fixed length, so the concatenation cannot be shifted across the boundary.
pub fn hmac2(key: &[u8], first: &[u8], second: &[u8]) -> [u8; KEY_LENGTH] {
    let mut joined = [0u8; KEY_LENGTH * 2];
    joined[..KEY_LENGTH].copy_from_slice(&hmac(key, first));
    joined[KEY_LENGTH..].copy_from_slice(&hmac(key, second));
    hmac(key, &joined)
}
