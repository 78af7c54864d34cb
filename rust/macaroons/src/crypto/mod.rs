//! Cryptographic primitives of the signature chain: key derivation,
//! HMAC-SHA256, the [Signature] type and the authenticated encryption used
//! to hide third-party verification keys.
pub mod hmac;
pub mod key;
pub mod secret_box;
pub mod signature;

pub use key::{derive_key, generate_secret_key, KeyError, SecretKey, KEY_LENGTH};
pub use signature::Signature;
