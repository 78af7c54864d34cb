use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{
    caveat::{seal_verification_key, Caveat},
    chain::SignatureChain,
    crypto::{SecretKey, Signature},
    error::MacaroonError,
    serialization::json::JsonMacaroon,
};

/// Predicates and caveat identifiers must be smaller than this many bytes
pub const MAX_CAVEAT_SIZE: usize = 32768;

/// A macaroon holds fewer than this many caveats
pub const MAX_CAVEATS: usize = 65536;

/// A bearer credential: a location hint, an identifier, an ordered list of
/// caveats and the chained signature over all of them.
///
/// Macaroons are immutable. Adding a caveat returns a new macaroon, so one
/// base macaroon may be attenuated in several different directions, from
/// several threads at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "JsonMacaroon", try_from = "JsonMacaroon")]
pub struct Macaroon {
    location: String,
    identifier: Vec<u8>,
    caveats: Vec<Caveat>,
    signature: Signature,
}

impl Macaroon {
    /// Mint a new macaroon with no caveats. The root key is only used to
    /// derive the first link of the chain and is not retained.
    pub fn create<K>(location: impl Into<String>, identifier: impl Into<Vec<u8>>, root_key: K) -> Self
    where
        K: AsRef<[u8]>,
    {
        let identifier = identifier.into();
        let signature = SignatureChain::new(root_key.as_ref(), &identifier).signature();

        Macaroon {
            location: location.into(),
            identifier,
            caveats: Vec::new(),
            signature,
        }
    }

    /// Assemble a macaroon from already-computed parts, e.g. when decoding
    pub(crate) fn from_parts(
        location: String,
        identifier: Vec<u8>,
        caveats: Vec<Caveat>,
        signature: Signature,
    ) -> Self {
        Macaroon {
            location,
            identifier,
            caveats,
            signature,
        }
    }

    /// Attenuate this macaroon with a predicate that the target service
    /// checks itself
    pub fn add_first_party_caveat(
        &self,
        predicate: impl Into<Vec<u8>>,
    ) -> Result<Macaroon, MacaroonError> {
        let predicate = predicate.into();
        self.check_capacity(predicate.len())?;

        let signature = self.chain().append_first_party(&predicate).signature();
        Ok(self.extended_with(Caveat::FirstParty { predicate }, signature))
    }

    /// Attenuate this macaroon with a caveat that can only be discharged by
    /// the party at `location`.
    ///
    /// That party must be able to mint a discharge macaroon with identifier
    /// `cid`, rooted at `verification_key`. How it learns the key (usually
    /// from `cid` itself) is up to the caller.
    pub fn add_third_party_caveat(
        &self,
        location: impl Into<String>,
        verification_key: &SecretKey,
        cid: impl Into<Vec<u8>>,
    ) -> Result<Macaroon, MacaroonError> {
        let cid = cid.into();
        self.check_capacity(cid.len())?;

        let vid = seal_verification_key(&self.signature, verification_key)?;
        let signature = self.chain().append_third_party(&vid, &cid).signature();

        Ok(self.extended_with(
            Caveat::ThirdParty {
                location: location.into(),
                cid,
                vid,
            },
            signature,
        ))
    }

    /// Prepare `discharge` to be sent along with this macaroon: the result is
    /// the discharge with its signature bound to this macaroon's signature
    pub fn bind(&self, discharge: &Macaroon) -> Macaroon {
        Macaroon {
            signature: discharge.signature.bind_to(&self.signature),
            ..discharge.clone()
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    pub fn caveats(&self) -> &[Caveat] {
        &self.caveats
    }

    pub fn first_party_caveats(&self) -> impl Iterator<Item = &Caveat> {
        self.caveats.iter().filter(|caveat| caveat.is_first_party())
    }

    pub fn third_party_caveats(&self) -> impl Iterator<Item = &Caveat> {
        self.caveats.iter().filter(|caveat| caveat.is_third_party())
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    fn chain(&self) -> SignatureChain {
        SignatureChain::resume(self.signature)
    }

    fn check_capacity(&self, caveat_size: usize) -> Result<(), MacaroonError> {
        if caveat_size >= MAX_CAVEAT_SIZE {
            return Err(MacaroonError::CaveatTooLarge {
                size: caveat_size,
                limit: MAX_CAVEAT_SIZE,
            });
        }

        if self.caveats.len() + 1 >= MAX_CAVEATS {
            return Err(MacaroonError::TooManyCaveats(MAX_CAVEATS));
        }

        Ok(())
    }

    fn extended_with(&self, caveat: Caveat, signature: Signature) -> Macaroon {
        let mut caveats = Vec::with_capacity(self.caveats.len() + 1);
        caveats.extend_from_slice(&self.caveats);
        caveats.push(caveat);

        Macaroon {
            location: self.location.clone(),
            identifier: self.identifier.clone(),
            caveats,
            signature,
        }
    }
}

impl Display for Macaroon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "location {}", self.location)?;
        writeln!(f, "identifier {}", String::from_utf8_lossy(&self.identifier))?;
        for caveat in &self.caveats {
            writeln!(f, "{caveat}")?;
        }
        write!(f, "signature {}", self.signature)
    }
}
