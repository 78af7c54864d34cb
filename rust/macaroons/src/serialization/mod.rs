//! Lossless conversions between a [Macaroon] and its wire forms: the V2
//! binary format, its base64url text form and the libmacaroons-style JSON
//! form (through `serde`).
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::str::FromStr;

use crate::{error::DecodeError, macaroon::Macaroon};

pub mod binary;
pub(crate) mod json;

pub use binary::{deserialize, serialize};

/// Encode some bytes as an unpadded URL-safe base64 string
pub fn base64_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode some bytes from a base64 string. The URL-safe and standard
/// alphabets are both accepted, with or without padding.
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let normalized: String = encoded
        .trim_end_matches('=')
        .chars()
        .map(|character| match character {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    Ok(URL_SAFE_NO_PAD.decode(normalized)?)
}

impl Macaroon {
    /// The V2 binary form of this macaroon
    pub fn serialize(&self) -> Vec<u8> {
        serialize(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Macaroon, DecodeError> {
        deserialize(bytes)
    }

    /// The text form of this macaroon: its binary form as unpadded base64url
    pub fn encode(&self) -> String {
        base64_encode(&self.serialize())
    }

    pub fn decode(encoded: &str) -> Result<Macaroon, DecodeError> {
        deserialize(&base64_decode(encoded.trim())?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Macaroon, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromStr for Macaroon {
    type Err = DecodeError;

    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        Macaroon::decode(encoded)
    }
}

impl TryFrom<&str> for Macaroon {
    type Error = DecodeError;

    fn try_from(encoded: &str) -> Result<Self, Self::Error> {
        Macaroon::decode(encoded)
    }
}
