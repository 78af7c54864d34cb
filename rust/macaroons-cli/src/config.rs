//! Verifier configuration read from a TOML file:
//!
//! ```toml
//! satisfy = ["account = 1234"]
//!
//! [verifier]
//! max_discharge_depth = 4
//! discharge_binding = "bound"
//! ```
use anyhow::Result;
use macaroons::VerifierOptions;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MacConfig {
    #[serde(default)]
    pub verifier: VerifierOptions,

    /// Exact predicates to accept, in addition to those given on the
    /// command line
    #[serde(default)]
    pub satisfy: Vec<String>,
}

impl MacConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        let config = MacConfig::from_toml(&toml_str)?;

        debug!("Read configuration from {}: {:?}", path.display(), config);

        Ok(config)
    }
}
