use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, instrument, trace};

use crate::{
    caveat::{open_verification_key, Caveat},
    chain::SignatureChain,
    crypto::{derive_key, SecretKey, Signature},
    error::VerificationError,
    macaroon::Macaroon,
    predicate::{CollectionSatisfier, FieldSatisfier, ParseFieldValue},
    store::{DischargeSet, DischargeStore},
};

/// How deeply discharges may refer to further discharges by default
pub const DEFAULT_MAX_DISCHARGE_DEPTH: usize = 10;

pub type PredicateFn = Arc<dyn Fn(&[u8]) -> bool + Send + Sync>;
pub type CaveatFn = Arc<dyn Fn(&Caveat) -> bool + Send + Sync>;

/// A reason to accept a first-party caveat. A caveat is satisfied when any
/// one of a verifier's satisfiers accepts it; the order in which satisfiers
/// were registered never matters.
#[derive(Clone)]
pub enum Satisfier {
    /// Accept a caveat whose predicate is exactly these bytes
    Exact(Vec<u8>),
    /// Accept a caveat whose predicate makes this function return true
    Predicate(PredicateFn),
    /// Accept a caveat that makes this function return true
    Caveat(CaveatFn),
}

impl Satisfier {
    pub fn exact(predicate: impl Into<Vec<u8>>) -> Self {
        Satisfier::Exact(predicate.into())
    }

    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&[u8]) -> bool + Send + Sync + 'static,
    {
        Satisfier::Predicate(Arc::new(check))
    }

    pub fn caveat<F>(check: F) -> Self
    where
        F: Fn(&Caveat) -> bool + Send + Sync + 'static,
    {
        Satisfier::Caveat(Arc::new(check))
    }

    pub fn is_satisfied_by(&self, caveat: &Caveat) -> bool {
        match (self, caveat) {
            (Satisfier::Exact(expected), Caveat::FirstParty { predicate }) => expected == predicate,
            (Satisfier::Predicate(check), Caveat::FirstParty { predicate }) => {
                check(predicate.as_slice())
            }
            (Satisfier::Caveat(check), Caveat::FirstParty { .. }) => check(caveat),
            (_, Caveat::ThirdParty { .. }) => false,
        }
    }
}

impl Debug for Satisfier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Satisfier::Exact(predicate) => f
                .debug_tuple("Exact")
                .field(&String::from_utf8_lossy(predicate))
                .finish(),
            Satisfier::Predicate(_) => f.write_str("Predicate(..)"),
            Satisfier::Caveat(_) => f.write_str("Caveat(..)"),
        }
    }
}

impl<T> From<FieldSatisfier<T>> for Satisfier
where
    T: ParseFieldValue + PartialOrd + Send + Sync + 'static,
{
    fn from(satisfier: FieldSatisfier<T>) -> Self {
        Satisfier::predicate(move |predicate| satisfier.is_satisfied_by(predicate))
    }
}

impl<T> From<CollectionSatisfier<T>> for Satisfier
where
    T: ParseFieldValue + PartialEq + Send + Sync + 'static,
{
    fn from(satisfier: CollectionSatisfier<T>) -> Self {
        Satisfier::predicate(move |predicate| satisfier.is_satisfied_by(predicate))
    }
}

/// Whether discharge macaroons must be bound to the macaroon they accompany
/// (see [Macaroon::bind])
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DischargeBinding {
    /// A discharge is accepted if its signature matches its own chain
    #[default]
    Unbound,
    /// A discharge is accepted only if its signature is its own chain bound
    /// to the signature of the macaroon being verified
    Bound,
}

/// Tunables of a [Verifier]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierOptions {
    pub max_discharge_depth: usize,
    pub discharge_binding: DischargeBinding,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        VerifierOptions {
            max_discharge_depth: DEFAULT_MAX_DISCHARGE_DEPTH,
            discharge_binding: DischargeBinding::default(),
        }
    }
}

/// Decides whether a macaroon is valid under a root key.
///
/// Verification replays the signature chain and compares it with the stored
/// signature, then checks every caveat in order: first-party caveats against
/// the registered satisfiers, third-party caveats by recursively verifying
/// the matching discharge macaroon. A verifier holds no mutable state and
/// may be shared freely between threads.
///
/// ```
/// use macaroons::{Macaroon, Verifier};
///
/// let root_key = b"a secret only the issuer knows";
/// let macaroon = Macaroon::create("https://example.com", "session-1", root_key)
///     .add_first_party_caveat("account = 1234")?;
///
/// let verifier = Verifier::default().satisfy_exact("account = 1234");
/// assert!(verifier.verify(&macaroon, root_key).is_ok());
/// # Ok::<(), macaroons::error::MacaroonError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Verifier {
    satisfiers: Vec<Satisfier>,
    discharges: DischargeSet,
    options: VerifierOptions,
}

/// State shared by every level of one verification
struct Verification<'a> {
    root_signature: Signature,
    store: &'a dyn DischargeStore,
}

impl Verifier {
    /// Accept any first-party caveat whose predicate is exactly `predicate`
    pub fn satisfy_exact(self, predicate: impl Into<Vec<u8>>) -> Self {
        self.satisfy(Satisfier::exact(predicate))
    }

    /// Accept any first-party caveat whose predicate makes `check` return true
    pub fn satisfy_general<F>(self, check: F) -> Self
    where
        F: Fn(&[u8]) -> bool + Send + Sync + 'static,
    {
        self.satisfy(Satisfier::predicate(check))
    }

    /// Accept any first-party caveat that makes `check` return true
    pub fn satisfy_caveat<F>(self, check: F) -> Self
    where
        F: Fn(&Caveat) -> bool + Send + Sync + 'static,
    {
        self.satisfy(Satisfier::caveat(check))
    }

    /// Accept `<field> <op> <value>` predicates that hold for `value`
    pub fn satisfy_field<T>(self, field: impl Into<String>, value: T) -> Self
    where
        T: ParseFieldValue + PartialOrd + Send + Sync + 'static,
    {
        self.satisfy(FieldSatisfier::new(field, value))
    }

    /// Accept `<field> in ...` / `<field> !in ...` predicates that hold for
    /// `values`
    pub fn satisfy_field_contains<T>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self
    where
        T: ParseFieldValue + PartialEq + Send + Sync + 'static,
    {
        self.satisfy(CollectionSatisfier::new(field, values))
    }

    pub fn satisfy(mut self, satisfier: impl Into<Satisfier>) -> Self {
        self.satisfiers.push(satisfier.into());
        self
    }

    /// Supply the discharge macaroon for one of the third-party caveats
    pub fn satisfy_discharge(mut self, discharge: Macaroon) -> Self {
        self.discharges.insert(discharge);
        self
    }

    pub fn with_discharges(mut self, discharges: impl IntoIterator<Item = Macaroon>) -> Self {
        self.discharges.extend(discharges);
        self
    }

    pub fn with_options(mut self, options: VerifierOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_discharge_depth(mut self, depth: usize) -> Self {
        self.options.max_discharge_depth = depth;
        self
    }

    /// Only accept discharges that were bound to the macaroon being verified
    pub fn requiring_bound_discharges(mut self) -> Self {
        self.options.discharge_binding = DischargeBinding::Bound;
        self
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    pub fn satisfiers(&self) -> &[Satisfier] {
        &self.satisfiers
    }

    pub fn discharges(&self) -> &DischargeSet {
        &self.discharges
    }

    /// Verify `macaroon` under `root_key`, using the discharges registered
    /// with this verifier
    pub fn verify<K>(&self, macaroon: &Macaroon, root_key: K) -> Result<(), VerificationError>
    where
        K: AsRef<[u8]>,
    {
        self.verify_with(macaroon, root_key, &self.discharges)
    }

    /// Verify `macaroon` under `root_key`, looking discharges up in `store`
    /// instead of the discharges registered with this verifier
    #[instrument(level = "trace", skip_all)]
    pub fn verify_with<K>(
        &self,
        macaroon: &Macaroon,
        root_key: K,
        store: &dyn DischargeStore,
    ) -> Result<(), VerificationError>
    where
        K: AsRef<[u8]>,
    {
        let verification = Verification {
            root_signature: macaroon.signature(),
            store,
        };

        let result = self.verify_macaroon(
            &verification,
            macaroon,
            &derive_key(root_key.as_ref()),
            0,
        );

        if let Err(error) = &result {
            debug!(
                "Rejected macaroon {:?}: {}",
                String::from_utf8_lossy(macaroon.identifier()),
                error
            );
        }

        result
    }

    /// Convenience for [Verifier::verify] when only the verdict matters
    pub fn is_valid<K>(&self, macaroon: &Macaroon, root_key: K) -> bool
    where
        K: AsRef<[u8]>,
    {
        self.verify(macaroon, root_key).is_ok()
    }

    fn verify_macaroon(
        &self,
        verification: &Verification,
        macaroon: &Macaroon,
        key: &SecretKey,
        depth: usize,
    ) -> Result<(), VerificationError> {
        if depth > self.options.max_discharge_depth {
            return Err(VerificationError::DischargeChainTooDeep(
                self.options.max_discharge_depth,
            ));
        }

        let replay = SignatureChain::replay(key, macaroon.identifier(), macaroon.caveats());

        let expected = match (depth, self.options.discharge_binding) {
            (0, _) | (_, DischargeBinding::Unbound) => replay.signature(),
            (_, DischargeBinding::Bound) => {
                replay.signature().bind_to(&verification.root_signature)
            }
        };

        if expected != macaroon.signature() {
            return Err(VerificationError::SignatureMismatch);
        }

        for step in replay.steps() {
            match step.caveat {
                Caveat::FirstParty { predicate } => {
                    if !self
                        .satisfiers
                        .iter()
                        .any(|satisfier| satisfier.is_satisfied_by(step.caveat))
                    {
                        return Err(VerificationError::UnsatisfiedCaveat(predicate.clone()));
                    }
                }
                Caveat::ThirdParty { cid, vid, .. } => {
                    let discharge = verification
                        .store
                        .discharge_for(cid)
                        .ok_or_else(|| VerificationError::MissingDischarge(cid.clone()))?;

                    if discharge.identifier() != cid.as_slice() {
                        return Err(VerificationError::DischargeIdentifierMismatch(cid.clone()));
                    }

                    let verification_key = open_verification_key(&step.prior, vid)
                        .ok_or_else(|| VerificationError::UndecryptableCaveat(cid.clone()))?;

                    trace!(
                        "Verifying discharge {:?} at depth {}",
                        String::from_utf8_lossy(cid),
                        depth + 1
                    );

                    self.verify_macaroon(
                        verification,
                        discharge,
                        &derive_key(verification_key.as_bytes()),
                        depth + 1,
                    )?;
                }
            }
        }

        Ok(())
    }
}
