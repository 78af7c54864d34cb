use tracing::instrument;

use crate::{
    caveat::Caveat,
    crypto::{derive_key, SecretKey, Signature},
};

/// The running signature of a macaroon.
///
/// The chain starts at `HMAC(derive(root_key), identifier)` and advances
/// once per caveat:
///
/// - first-party: `HMAC(sig, predicate)`
/// - third-party: `HMAC(sig, HMAC(sig, vid) ‖ HMAC(sig, cid))`
///
/// Every step depends on the one before it, so a chain can only be computed
/// sequentially. Appending is pure: it returns a new chain and leaves the
/// receiver as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureChain {
    signature: Signature,
}

impl SignatureChain {
    /// Start a chain from a root secret of any length
    pub fn new(root_key: &[u8], identifier: &[u8]) -> Self {
        Self::from_derived_key(&derive_key(root_key), identifier)
    }

    /// Start a chain from a key that has already been through
    /// [crate::crypto::derive_key]
    pub fn from_derived_key(key: &SecretKey, identifier: &[u8]) -> Self {
        SignatureChain {
            signature: Signature::initial(key, identifier),
        }
    }

    /// Resume a chain at a known signature
    pub fn resume(signature: Signature) -> Self {
        SignatureChain { signature }
    }

    pub fn append_first_party(&self, predicate: &[u8]) -> Self {
        SignatureChain {
            signature: self.signature.chain(predicate),
        }
    }

    pub fn append_third_party(&self, vid: &[u8], cid: &[u8]) -> Self {
        SignatureChain {
            signature: self.signature.chain2(vid, cid),
        }
    }

    pub fn append(&self, caveat: &Caveat) -> Self {
        match caveat {
            Caveat::FirstParty { predicate } => self.append_first_party(predicate),
            Caveat::ThirdParty { cid, vid, .. } => self.append_third_party(vid, cid),
        }
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Recompute the chain of an existing caveat sequence, remembering the
    /// signature that preceded each caveat
    #[instrument(level = "trace", skip_all, fields(caveats = caveats.len()))]
    pub fn replay<'a>(key: &SecretKey, identifier: &[u8], caveats: &'a [Caveat]) -> Replay<'a> {
        let mut chain = Self::from_derived_key(key, identifier);
        let mut steps = Vec::with_capacity(caveats.len());

        for caveat in caveats {
            steps.push(ReplayStep {
                caveat,
                prior: chain.signature,
            });
            chain = chain.append(caveat);
        }

        Replay {
            steps,
            signature: chain.signature,
        }
    }
}

/// One caveat of a replayed chain, together with the signature the chain
/// held just before it was appended
#[derive(Clone, Debug)]
pub struct ReplayStep<'a> {
    pub caveat: &'a Caveat,
    pub prior: Signature,
}

/// The outcome of [SignatureChain::replay]
#[derive(Clone, Debug)]
pub struct Replay<'a> {
    steps: Vec<ReplayStep<'a>>,
    signature: Signature,
}

impl<'a> Replay<'a> {
    pub fn steps(&self) -> &[ReplayStep<'a>] {
        &self.steps
    }

    /// The final signature of the replayed chain
    pub fn signature(&self) -> Signature {
        self.signature
    }
}
