//! Declarative definition for the end-user-facing CLI

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[allow(missing_docs)]
#[derive(Debug, Parser)]
#[clap(name = "mac")]
#[clap(about = "A CLI tool for minting, attenuating and verifying macaroons", long_about = Some(
r#"The mac CLI tool mints macaroons from a root key, attenuates them with
first-party and third-party caveats, binds discharge macaroons to the
macaroons they accompany and verifies the result. Keys are passed as hex and
macaroons as base64url tokens."#))]
pub struct Cli {
    #[clap(subcommand)]
    pub command: MacCommand,
}

#[allow(missing_docs)]
#[derive(Debug, Subcommand)]
pub enum MacCommand {
    Key {
        #[clap(subcommand)]
        command: KeyCommand,
    },

    /// Mint a new macaroon under a root key
    Mint {
        /// The root key, as hex
        #[clap(short, long)]
        key: String,

        /// A hint for where the macaroon should be used
        #[clap(short, long, default_value = "")]
        location: String,

        /// The identifier of the macaroon; the issuer uses it to recall the
        /// root key
        #[clap(short, long)]
        identifier: String,

        /// First-party caveats to add right away
        #[clap(short, long = "caveat")]
        caveats: Vec<String>,
    },

    /// Add first-party caveats to a macaroon
    Attenuate {
        /// The macaroon to attenuate
        token: String,

        /// The predicates to add, in order
        #[clap(short, long = "caveat", required = true)]
        caveats: Vec<String>,
    },

    /// Add a caveat that only the party at the given location can discharge;
    /// prints the attenuated macaroon, followed by the verification key that
    /// the third party must mint its discharge with
    AddThirdParty {
        /// The macaroon to attenuate
        token: String,

        /// Where a discharge may be obtained
        #[clap(short, long)]
        location: String,

        /// The caveat identifier the third party will recognize
        #[clap(short, long)]
        cid: String,

        /// The 32-byte verification key, as hex; a new one is generated if
        /// none is given
        #[clap(short, long)]
        key: Option<String>,
    },

    /// Bind a discharge macaroon to the macaroon it will be sent with
    Bind {
        /// The macaroon the discharge will accompany
        token: String,

        /// The discharge macaroon to bind
        discharge: String,
    },

    /// Print the contents of a macaroon
    Inspect {
        /// The macaroon to inspect
        token: String,

        /// Output the macaroon in its JSON form
        #[clap(short = 'j', long)]
        as_json: bool,
    },

    /// Check that a macaroon is valid under a root key
    Verify {
        /// The macaroon to verify
        token: String,

        /// The root key, as hex
        #[clap(short, long)]
        key: String,

        /// Accept caveats that are exactly this predicate
        #[clap(short, long = "satisfy")]
        satisfy: Vec<String>,

        /// Accept `<field> <op> <value>` caveats that hold for a field with
        /// this value, given as `name=value`
        #[clap(short = 'f', long = "satisfy-field", value_name = "NAME=VALUE")]
        satisfy_fields: Vec<String>,

        /// Discharge macaroons for the third-party caveats
        #[clap(short, long = "discharge")]
        discharges: Vec<String>,

        /// Only accept discharges that are bound to the macaroon
        #[clap(short, long)]
        bound: bool,

        /// A TOML file with verifier options and additional satisfiers
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Create keys for minting macaroons
#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Generate a new random 32-byte key and print it as hex
    Generate,
}
