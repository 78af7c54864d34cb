//! Concrete implementations of subcommands to manage keys
use anyhow::Result;
use macaroons::generate_secret_key;

/// Generate a random key suitable as a root key or as the verification key
/// of a third-party caveat
pub fn key_generate() -> Result<()> {
    let key = generate_secret_key();

    info!("{}", hex::encode(key.as_bytes()));

    Ok(())
}
