//! Concrete implementations of subcommands that produce new macaroons
use anyhow::Result;
use macaroons::{Macaroon, SecretKey};

use super::{parse_root_key, parse_secret_key, parse_token};

fn add_caveats(macaroon: Macaroon, caveats: &[String]) -> Result<Macaroon> {
    caveats.iter().try_fold(macaroon, |macaroon, caveat| -> Result<Macaroon> {
        Ok(macaroon.add_first_party_caveat(caveat.as_str())?)
    })
}

/// Mint a macaroon under a root key, with optional first-party caveats
pub fn mint(key: &str, location: &str, identifier: &str, caveats: &[String]) -> Result<()> {
    let root_key = parse_root_key(key)?;
    let macaroon = add_caveats(Macaroon::create(location, identifier, root_key), caveats)?;

    debug!(
        "Minted macaroon {:?} with {} caveats",
        identifier,
        macaroon.caveats().len()
    );
    info!("{}", macaroon.encode());

    Ok(())
}

/// Restrict an existing macaroon with further first-party caveats
pub fn attenuate(token: &str, caveats: &[String]) -> Result<()> {
    let macaroon = add_caveats(parse_token(token)?, caveats)?;

    info!("{}", macaroon.encode());

    Ok(())
}

/// Add a third-party caveat, printing the attenuated macaroon and the
/// verification key the third party will need to mint a discharge
pub fn add_third_party(token: &str, location: &str, cid: &str, key: Option<&str>) -> Result<()> {
    let macaroon = parse_token(token)?;
    let verification_key = match key {
        Some(key) => parse_secret_key(key)?,
        None => SecretKey::generate(),
    };

    let macaroon = macaroon.add_third_party_caveat(location, &verification_key, cid)?;

    info!("{}", macaroon.encode());
    info!("{}", hex::encode(verification_key.as_bytes()));

    Ok(())
}

/// Bind a discharge to the macaroon it will accompany
pub fn bind(token: &str, discharge: &str) -> Result<()> {
    let macaroon = parse_token(token)?;
    let discharge = parse_token(discharge)?;

    info!("{}", macaroon.bind(&discharge).encode());

    Ok(())
}
