use std::fmt::Display;

use crate::{
    crypto::{derive_key, secret_box, SecretKey, Signature},
    error::MacaroonError,
    serialization::base64_encode,
};

/// A restriction carried by a macaroon.
///
/// A first-party caveat is a predicate that the target service checks
/// itself. A third-party caveat can only be checked by presenting a
/// discharge macaroon minted by the party at `location`: the discharge's
/// identifier must equal `cid`, and its chain must be rooted at the key that
/// is sealed inside `vid`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Caveat {
    FirstParty {
        predicate: Vec<u8>,
    },
    ThirdParty {
        /// A hint for where to obtain a discharge; it is not covered by the
        /// signature
        location: String,
        cid: Vec<u8>,
        vid: Vec<u8>,
    },
}

impl Caveat {
    pub fn first_party(predicate: impl Into<Vec<u8>>) -> Self {
        Caveat::FirstParty {
            predicate: predicate.into(),
        }
    }

    pub fn third_party(
        location: impl Into<String>,
        cid: impl Into<Vec<u8>>,
        vid: impl Into<Vec<u8>>,
    ) -> Self {
        Caveat::ThirdParty {
            location: location.into(),
            cid: cid.into(),
            vid: vid.into(),
        }
    }

    pub fn is_first_party(&self) -> bool {
        matches!(self, Caveat::FirstParty { .. })
    }

    pub fn is_third_party(&self) -> bool {
        matches!(self, Caveat::ThirdParty { .. })
    }

    /// The predicate of a first-party caveat, or the `cid` of a third-party
    /// caveat
    pub fn identifier(&self) -> &[u8] {
        match self {
            Caveat::FirstParty { predicate } => predicate,
            Caveat::ThirdParty { cid, .. } => cid,
        }
    }

    pub fn predicate(&self) -> Option<&[u8]> {
        match self {
            Caveat::FirstParty { predicate } => Some(predicate),
            Caveat::ThirdParty { .. } => None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Caveat::FirstParty { .. } => None,
            Caveat::ThirdParty { location, .. } => Some(location),
        }
    }

    pub fn vid(&self) -> Option<&[u8]> {
        match self {
            Caveat::FirstParty { .. } => None,
            Caveat::ThirdParty { vid, .. } => Some(vid),
        }
    }
}

impl Display for Caveat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Caveat::FirstParty { predicate } => {
                write!(f, "cid {}", String::from_utf8_lossy(predicate))
            }
            Caveat::ThirdParty { location, cid, vid } => {
                writeln!(f, "cid {}", String::from_utf8_lossy(cid))?;
                writeln!(f, "vid {}", base64_encode(vid))?;
                write!(f, "cl {location}")
            }
        }
    }
}

/// Seal the verification key of a new third-party caveat. The box is keyed
/// by a key derived from the chain signature just before the caveat, so only
/// someone able to replay the chain up to that point can open it.
pub fn seal_verification_key(
    prior: &Signature,
    verification_key: &SecretKey,
) -> Result<Vec<u8>, MacaroonError> {
    let encryption_key = derive_key(prior.as_bytes());
    secret_box::seal(&encryption_key, verification_key.as_bytes())
        .map_err(|_| MacaroonError::Encryption)
}

/// Recover the verification key sealed in a `vid`, given the chain
/// signature just before the caveat
pub fn open_verification_key(prior: &Signature, vid: &[u8]) -> Option<SecretKey> {
    let encryption_key = derive_key(prior.as_bytes());
    let plaintext = secret_box::open(&encryption_key, vid)?;
    SecretKey::try_from(plaintext.as_slice()).ok()
}
