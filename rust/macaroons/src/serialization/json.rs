use serde::{Deserialize, Serialize};

use super::{base64_decode, base64_encode};
use crate::{
    caveat::Caveat, crypto::Signature, error::DecodeError, macaroon::Macaroon,
};

/// The JSON shape of a macaroon, compatible with the v2 JSON format of
/// libmacaroons. Binary fields are base64url encoded; an identifier may also
/// be given as plain text in `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct JsonMacaroon {
    v: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    i: Option<String>,
    #[serde(default, rename = "i64", skip_serializing_if = "Option::is_none")]
    identifier64: Option<String>,
    #[serde(default)]
    c: Vec<JsonCaveat>,
    s64: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct JsonCaveat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    i: Option<String>,
    #[serde(default, rename = "i64", skip_serializing_if = "Option::is_none")]
    identifier64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v64: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    match value {
        "" => None,
        value => Some(value.to_owned()),
    }
}

fn identifier_of(
    plain: Option<String>,
    encoded: Option<String>,
    name: &'static str,
) -> Result<Vec<u8>, DecodeError> {
    match (plain, encoded) {
        (_, Some(encoded)) => base64_decode(&encoded),
        (Some(plain), None) => Ok(plain.into_bytes()),
        (None, None) => Err(DecodeError::MissingField(name)),
    }
}

impl From<Macaroon> for JsonMacaroon {
    fn from(macaroon: Macaroon) -> Self {
        let c = macaroon
            .caveats()
            .iter()
            .map(|caveat| match caveat {
                Caveat::FirstParty { predicate } => JsonCaveat {
                    l: None,
                    i: None,
                    identifier64: Some(base64_encode(predicate)),
                    v64: None,
                },
                Caveat::ThirdParty { location, cid, vid } => JsonCaveat {
                    l: non_empty(location),
                    i: None,
                    identifier64: Some(base64_encode(cid)),
                    v64: Some(base64_encode(vid)),
                },
            })
            .collect();

        JsonMacaroon {
            v: super::binary::VERSION as u64,
            l: non_empty(macaroon.location()),
            i: None,
            identifier64: Some(base64_encode(macaroon.identifier())),
            c,
            s64: base64_encode(macaroon.signature().as_bytes()),
        }
    }
}

impl TryFrom<JsonMacaroon> for Macaroon {
    type Error = DecodeError;

    fn try_from(json: JsonMacaroon) -> Result<Self, Self::Error> {
        if json.v != super::binary::VERSION as u64 {
            return Err(DecodeError::UnsupportedVersion(json.v));
        }

        let identifier = identifier_of(json.i, json.identifier64, "identifier")?;

        let caveats = json
            .c
            .into_iter()
            .map(|caveat| {
                let identifier = identifier_of(caveat.i, caveat.identifier64, "caveat identifier")?;
                match (caveat.l, caveat.v64) {
                    (None, None) => Ok(Caveat::FirstParty {
                        predicate: identifier,
                    }),
                    (Some(_), None) => Err(DecodeError::MissingField("vid")),
                    (location, Some(vid)) => Ok(Caveat::ThirdParty {
                        location: location.unwrap_or_default(),
                        cid: identifier,
                        vid: base64_decode(&vid)?,
                    }),
                }
            })
            .collect::<Result<Vec<Caveat>, DecodeError>>()?;

        let signature = base64_decode(&json.s64)?;
        let signature = Signature::from_slice(&signature)
            .ok_or(DecodeError::InvalidSignatureLength(signature.len()))?;

        Ok(Macaroon::from_parts(
            json.l.unwrap_or_default(),
            identifier,
            caveats,
            signature,
        ))
    }
}
