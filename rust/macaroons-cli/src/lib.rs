//! The `mac` command line tool: mint, attenuate, bind, inspect and verify
//! macaroons from a shell.
#[macro_use]
extern crate tracing;

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, KeyCommand, MacCommand};
use commands::{
    inspect::inspect,
    key::key_generate,
    mint::{add_third_party, attenuate, bind, mint},
    verify::{verify, VerifyArguments},
};

/// Run the command described by a parsed [Cli]
pub fn invoke_cli(cli: Cli) -> Result<()> {
    match cli.command {
        MacCommand::Key { command } => match command {
            KeyCommand::Generate => key_generate()?,
        },
        MacCommand::Mint {
            key,
            location,
            identifier,
            caveats,
        } => mint(&key, &location, &identifier, &caveats)?,
        MacCommand::Attenuate { token, caveats } => attenuate(&token, &caveats)?,
        MacCommand::AddThirdParty {
            token,
            location,
            cid,
            key,
        } => add_third_party(&token, &location, &cid, key.as_deref())?,
        MacCommand::Bind { token, discharge } => bind(&token, &discharge)?,
        MacCommand::Inspect { token, as_json } => inspect(&token, as_json)?,
        MacCommand::Verify {
            token,
            key,
            satisfy,
            satisfy_fields,
            discharges,
            bound,
            config,
        } => verify(VerifyArguments {
            token: &token,
            key: &key,
            satisfy: &satisfy,
            satisfy_fields: &satisfy_fields,
            discharges: &discharges,
            bound,
            config: config.as_deref(),
        })?,
    };

    Ok(())
}

pub fn main() -> Result<()> {
    logging::initialize_tracing();

    invoke_cli(Cli::parse())
}
