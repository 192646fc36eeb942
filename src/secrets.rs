//! Secret resolution
//!
//! Credentials are either given inline or referenced by name. A
//! reference is resolved through a [`SecretStore`] exactly once per
//! invocation, and only when no inline value is present.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ProviderError;

/// Resolves named secrets.
pub trait SecretStore: Send + Sync {
    /// Look up a secret, failing with `SecretNotFound` if it is not there.
    fn get_secret(&self, name: &str) -> Result<String, ProviderError>;
}

/// Reads secrets from environment variables.
///
/// The name is upper-cased, every character that is not alphanumeric
/// becomes `_`, and the prefix is prepended: `/prod/db/sa` with prefix
/// `MSSQL_SECRET_` reads `MSSQL_SECRET__PROD_DB_SA`.
#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn variable_name(&self, name: &str) -> String {
        let normalized: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, normalized)
    }
}

impl SecretStore for EnvSecretStore {
    fn get_secret(&self, name: &str) -> Result<String, ProviderError> {
        let var = self.variable_name(name);
        std::env::var(&var).map_err(|e| ProviderError::SecretNotFound {
            name: name.to_string(),
            reason: format!("{var}: {e}"),
        })
    }
}

/// In-memory secrets, optionally loaded from a TOML file of
/// `name = "value"` pairs.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    values: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read secrets file: {}", path.display()))?;
        let values: HashMap<String, String> = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in secrets file {}", path.display()))?;
        log::debug!("Loaded {} secrets from {}", values.len(), path.display());
        Ok(Self { values })
    }
}

impl SecretStore for StaticSecretStore {
    fn get_secret(&self, name: &str) -> Result<String, ProviderError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::SecretNotFound {
                name: name.to_string(),
                reason: "parameter not found".to_string(),
            })
    }
}

/// A credential as declared in resource properties.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Password`
    Inline(String),
    /// `PasswordParameterName`
    Reference(String),
}

impl Credential {
    /// Pick the credential from the two optional properties; inline wins.
    pub fn from_parts(inline: Option<String>, reference: Option<String>) -> Option<Self> {
        match (inline, reference) {
            (Some(password), _) => Some(Self::Inline(password)),
            (None, Some(name)) => Some(Self::Reference(name)),
            (None, None) => None,
        }
    }

    pub fn resolve(&self, store: &dyn SecretStore) -> Result<String, ProviderError> {
        match self {
            Self::Inline(password) => Ok(password.clone()),
            Self::Reference(name) => {
                log::debug!("Resolving password parameter {name}");
                store.get_secret(name)
            }
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(***)"),
            Self::Reference(name) => f.debug_tuple("Reference").field(name).finish(),
        }
    }
}
