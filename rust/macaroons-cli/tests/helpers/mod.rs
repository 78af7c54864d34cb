#![allow(dead_code)]

use anyhow::Result;
use clap::Parser;
use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, prelude::*, Layer};

use macaroons_cli::{cli::Cli, invoke_cli};

/// The lines a `mac` command printed: the messages of the `info!` events
/// emitted by the CLI itself, in order
#[derive(Clone, Default)]
struct CommandOutput(Arc<Mutex<Vec<String>>>);

impl CommandOutput {
    fn take_lines(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Pulls the formatted `message` field out of an event
struct Message<'a>(&'a mut Option<String>);

impl Visit for Message<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.0 = Some(value.to_owned());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S> Layer<S> for CommandOutput
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _context: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() != Level::INFO || !metadata.target().starts_with("macaroons_cli") {
            return;
        }

        let mut message = None;
        event.record(&mut Message(&mut message));

        if let Some(line) = message {
            self.0.lock().unwrap().push(line);
        }
    }
}

/// Run some work to completion, returning the lines it printed
pub fn capture_output<F>(work: F) -> Result<Vec<String>>
where
    F: FnOnce() -> Result<()>,
{
    let output = CommandOutput::default();
    let subscriber = tracing_subscriber::registry().with(output.clone());

    tracing::subscriber::with_default(subscriber, work)?;

    Ok(output.take_lines())
}

/// Run a `mac` command as if from a shell, returning its output lines
pub fn mac(command: &[&str]) -> Result<Vec<String>> {
    let cli = Cli::try_parse_from([&["mac"][..], command].concat())?;
    capture_output(|| invoke_cli(cli))
}

/// Run a `mac` command that prints a single line, and return that line
pub fn mac_line(command: &[&str]) -> Result<String> {
    let mut lines = mac(command)?;
    assert_eq!(lines.len(), 1, "Expected a single line, got {lines:?}");
    Ok(lines.remove(0))
}
