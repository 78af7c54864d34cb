use std::collections::{btree_map::Values, BTreeMap};

use crate::macaroon::Macaroon;

/// A source of discharge macaroons, looked up by the `cid` of the
/// third-party caveat they discharge. How discharges are obtained from third
/// parties is up to the implementor; the verifier only reads from the store.
pub trait DischargeStore {
    fn discharge_for(&self, cid: &[u8]) -> Option<&Macaroon>;
}

/// An in-memory [DischargeStore], keyed by the identifier of each discharge.
/// Inserting a discharge with an identifier that is already present replaces
/// the earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DischargeSet {
    discharges: BTreeMap<Vec<u8>, Macaroon>,
}

impl DischargeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a discharge, returning any discharge it displaced
    pub fn insert(&mut self, discharge: Macaroon) -> Option<Macaroon> {
        self.discharges
            .insert(discharge.identifier().to_vec(), discharge)
    }

    pub fn len(&self) -> usize {
        self.discharges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discharges.is_empty()
    }

    pub fn iter(&self) -> Values<'_, Vec<u8>, Macaroon> {
        self.discharges.values()
    }
}

impl DischargeStore for DischargeSet {
    fn discharge_for(&self, cid: &[u8]) -> Option<&Macaroon> {
        self.discharges.get(cid)
    }
}

impl<S> DischargeStore for &S
where
    S: DischargeStore + ?Sized,
{
    fn discharge_for(&self, cid: &[u8]) -> Option<&Macaroon> {
        (**self).discharge_for(cid)
    }
}

impl FromIterator<Macaroon> for DischargeSet {
    fn from_iter<I: IntoIterator<Item = Macaroon>>(iter: I) -> Self {
        let mut set = DischargeSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Macaroon> for DischargeSet {
    fn extend<I: IntoIterator<Item = Macaroon>>(&mut self, iter: I) {
        for discharge in iter {
            self.insert(discharge);
        }
    }
}
