pub mod inspect;
pub mod key;
pub mod mint;
pub mod verify;

use anyhow::{anyhow, Result};
use macaroons::{Macaroon, SecretKey};

/// Decode a macaroon given on the command line
pub(crate) fn parse_token(token: &str) -> Result<Macaroon> {
    Macaroon::decode(token).map_err(|error| anyhow!("Could not decode macaroon: {}", error))
}

/// Decode a root key of any length given as hex
pub(crate) fn parse_root_key(key: &str) -> Result<Vec<u8>> {
    hex::decode(key.trim()).map_err(|error| anyhow!("Keys must be given as hex: {}", error))
}

/// Decode a 32-byte secret key given as hex
pub(crate) fn parse_secret_key(key: &str) -> Result<SecretKey> {
    Ok(SecretKey::try_from(parse_root_key(key)?.as_slice())?)
}
