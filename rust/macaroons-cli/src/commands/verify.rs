//! Concrete implementation of the subcommand that verifies macaroons
use anyhow::{anyhow, Result};
use macaroons::{predicate::FieldSatisfier, Satisfier, Verifier};
use std::path::Path;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{parse_root_key, parse_token};
use crate::config::MacConfig;

pub struct VerifyArguments<'a> {
    pub token: &'a str,
    pub key: &'a str,
    pub satisfy: &'a [String],
    pub satisfy_fields: &'a [String],
    pub discharges: &'a [String],
    pub bound: bool,
    pub config: Option<&'a Path>,
}

/// Interpret a `name=value` argument as a typed field satisfier. The value
/// is read as the first type it parses as: a boolean, an integer, a float,
/// an RFC 3339 timestamp (or `now`), and otherwise a string.
pub fn parse_field_satisfier(argument: &str) -> Result<Satisfier> {
    let (name, value) = argument
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected a field as name=value, but got {:?}", argument))?;
    let name = name.trim();
    let value = value.trim();

    if name.is_empty() {
        return Err(anyhow!("Missing field name in {:?}", argument));
    }

    let satisfier: Satisfier = if let Ok(value) = value.parse::<bool>() {
        FieldSatisfier::new(name, value).into()
    } else if let Ok(value) = value.parse::<i64>() {
        FieldSatisfier::new(name, value).into()
    } else if let Ok(value) = value.parse::<f64>() {
        FieldSatisfier::new(name, value).into()
    } else if value == "now" {
        FieldSatisfier::new(name, OffsetDateTime::now_utc()).into()
    } else if let Ok(value) = OffsetDateTime::parse(value, &Rfc3339) {
        FieldSatisfier::new(name, value).into()
    } else {
        FieldSatisfier::new(name, value.to_owned()).into()
    };

    Ok(satisfier)
}

/// Verify a macaroon, failing with the reason it was rejected
pub fn verify(arguments: VerifyArguments) -> Result<()> {
    let macaroon = parse_token(arguments.token)?;
    let root_key = parse_root_key(arguments.key)?;

    let config = match arguments.config {
        Some(path) => MacConfig::read(path)?,
        None => MacConfig::default(),
    };

    let mut verifier = Verifier::default().with_options(config.verifier);

    if arguments.bound {
        verifier = verifier.requiring_bound_discharges();
    }

    for predicate in config.satisfy.iter().chain(arguments.satisfy) {
        verifier = verifier.satisfy_exact(predicate.as_str());
    }

    for field in arguments.satisfy_fields {
        verifier = verifier.satisfy(parse_field_satisfier(field)?);
    }

    for discharge in arguments.discharges {
        verifier = verifier.satisfy_discharge(parse_token(discharge)?);
    }

    match verifier.verify(&macaroon, root_key) {
        Ok(()) => {
            info!("Valid");
            Ok(())
        }
        Err(error) => {
            warn!("Invalid: {}", error);
            Err(anyhow!("Macaroon is not valid: {}", error))
        }
    }
}
