use anyhow::Result;

use super::parse_token;

/// Print a macaroon as a readable listing, or as JSON
pub fn inspect(token: &str, as_json: bool) -> Result<()> {
    let macaroon = parse_token(token)?;

    if as_json {
        let value = serde_json::to_value(&macaroon)?;
        info!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for line in macaroon.to_string().lines() {
            info!("{line}");
        }
    }

    Ok(())
}
