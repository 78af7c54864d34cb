//! Helpers to wrangle logging for the `mac` binary.
//! NOTE: [initialize_tracing] should only ever be called in tests or binaries;
//! the `macaroons` library only concerns itself with instrumentation.
use std::sync::Once;

static INITIALIZE_TRACING: Once = Once::new();

pub fn initialize_tracing() {
    use tracing_subscriber::prelude::*;
    INITIALIZE_TRACING.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "macaroons,macaroons_cli=info".into()),
            ))
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_target(false)
                    .with_level(false),
            )
            .init();
    });
}
