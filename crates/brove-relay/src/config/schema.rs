use serde::Deserialize;
use brove_core::error::{BroveError, Result};
use brove_core::identity::MAX_PUBKEY_LEN;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub relay: RelaySection,

    /// The single identity with implicit full access and management rights.
    /// May come from `RELAY_PUBKEY` instead; checked after overrides.
    #[serde(default)]
    pub owner_pubkey: String,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub policy: PolicySection,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BroveError::UnsupportedVersion);
        }
        if self.owner_pubkey.is_empty() {
            return Err(BroveError::BadRequest("owner_pubkey must not be empty".into()));
        }
        if self.owner_pubkey.len() > MAX_PUBKEY_LEN {
            return Err(BroveError::BadRequest(format!(
                "owner_pubkey must be at most {MAX_PUBKEY_LEN} characters"
            )));
        }

        self.storage.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            name: default_name(),
            description: default_description(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:3334".into()
}
fn default_name() -> String {
    "brove relay".into()
}
fn default_description() -> String {
    "this is my custom and private relay".into()
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub database_url: Option<String>,
}

impl StorageSection {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Postgres
            && self.database_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(BroveError::BadRequest(
                "storage.database_url is required for the postgres backend".into(),
            ));
        }
        Ok(())
    }
}

/// Structural validators that run ahead of the identity layers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    #[serde(default = "default_true")]
    pub validate_kind: bool,

    /// Longest accepted tag value in bytes. 0 disables the check.
    #[serde(default = "default_max_tag_value_len")]
    pub max_tag_value_len: usize,

    #[serde(default = "default_true")]
    pub no_complex_filters: bool,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            validate_kind: true,
            max_tag_value_len: default_max_tag_value_len(),
            no_complex_filters: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_max_tag_value_len() -> usize {
    100
}
