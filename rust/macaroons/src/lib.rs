//! Build, attenuate and verify [macaroons][macaroons paper]: bearer
//! credentials whose restrictions ("caveats") are protected by a chain of
//! HMAC-SHA256 signatures.
//!
//! Anyone holding a macaroon can append caveats to it without contacting
//! the issuer, but nobody can remove one: every caveat is folded into the
//! signature, and only the holder of the root key can recompute the chain.
//!
//! # Examples
//!
//! The issuer mints a macaroon with a root key, and any holder may
//! attenuate it further:
//!
//! ```rust
//! use macaroons::{Macaroon, Verifier};
//!
//! let root_key = b"this is our super secret key; only we should know it";
//!
//! let macaroon = Macaroon::create("https://mybank.example", "we used our secret key", root_key)
//!     .add_first_party_caveat("account = 3735928559")?;
//!
//! // Later, somebody restricts it further before handing it on
//! let attenuated = macaroon.add_first_party_caveat("time < 2030-01-01T00:00:00Z")?;
//!
//! let verifier = Verifier::default()
//!     .satisfy_exact("account = 3735928559")
//!     .satisfy_general(|predicate| predicate.starts_with(b"time < "));
//!
//! assert!(verifier.is_valid(&attenuated, root_key));
//! # Ok::<(), macaroons::error::MacaroonError>(())
//! ```
//!
//! Third-party caveats delegate a check to another service, which proves
//! the check passed by minting a discharge macaroon. See
//! [`Macaroon::add_third_party_caveat`] and [`Verifier::satisfy_discharge`].
//!
//! Macaroons are exchanged in the V2 binary format, usually as base64url
//! text (see [`serialization`]):
//!
//! ```rust
//! use macaroons::Macaroon;
//!
//! let macaroon = Macaroon::create("https://mybank.example", "roundTrip", b"root key")
//!     .add_first_party_caveat("account = 1234")?;
//!
//! let token = macaroon.encode();
//! assert_eq!(token.parse::<Macaroon>()?, macaroon);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! [macaroons paper]: https://research.google/pubs/pub41892/

pub mod caveat;
pub mod chain;
pub mod crypto;
pub mod error;
pub mod macaroon;
pub mod predicate;
pub mod serialization;
pub mod store;
pub mod verifier;

pub use self::caveat::Caveat;
pub use self::crypto::{derive_key, generate_secret_key, SecretKey, Signature};
pub use self::macaroon::Macaroon;
pub use self::store::{DischargeSet, DischargeStore};
pub use self::verifier::{DischargeBinding, Satisfier, Verifier, VerifierOptions};

#[cfg(test)]
mod tests;
