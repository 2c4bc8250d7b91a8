//! Relay config loader (strict parsing + environment overrides).

pub mod schema;

use std::fs;

use brove_core::error::{BroveError, Result};

pub use schema::{PolicySection, RelayConfig, RelaySection, StorageBackend, StorageSection};

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BroveError::Internal(format!("read config failed: {e}")))?;
    let mut cfg = parse(&s)?;
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg = parse(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse(s: &str) -> Result<RelayConfig> {
    serde_yaml::from_str(s).map_err(|e| BroveError::BadRequest(format!("invalid yaml: {e}")))
}

/// Apply deployment overrides once, at load time.
///
/// Decision code only ever sees the resulting immutable config.
pub fn apply_env_overrides<F>(cfg: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("RELAY_PUBKEY") {
        cfg.owner_pubkey = v;
    }
    if let Some(v) = lookup("RELAY_NAME") {
        cfg.relay.name = v;
    }
    if let Some(v) = lookup("RELAY_DESCRIPTION") {
        cfg.relay.description = v;
    }
    if let Some(v) = lookup("DATABASE_URL") {
        cfg.storage.database_url = Some(v);
    }
}
