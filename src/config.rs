use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tdskit::{TdsBackend, default_backend};

use crate::secrets::{EnvSecretStore, SecretStore, StaticSecretStore};

fn default_env_prefix() -> String {
    "MSSQL_SECRET_".to_string()
}

fn default_true() -> bool {
    true
}

/// Where `PasswordParameterName` references are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    #[default]
    Env,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub source: SecretSource,

    /// TOML file of `name = "value"` pairs (source = "file")
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            source: SecretSource::default(),
            path: None,
            env_prefix: default_env_prefix(),
        }
    }
}

/// Runtime settings, read from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Fail unknown resource types instead of handling them as logins
    #[serde(default)]
    pub strict_kinds: bool,

    #[serde(default = "default_true")]
    pub trust_server_certificate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            secrets: SecretsConfig::default(),
            strict_kinds: false,
            trust_server_certificate: true,
        }
    }
}

impl Settings {
    /// Load settings; without a path the defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            log::debug!("No settings file, using defaults");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))?;
        settings.validate()?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.secrets.source == SecretSource::File && self.secrets.path.is_none() {
            anyhow::bail!("secrets.path is required when secrets.source is \"file\"");
        }
        Ok(())
    }

    /// Apply command-line flags on top of the file.
    pub fn with_overrides(mut self, strict_kinds: bool, secrets_file: Option<PathBuf>) -> Self {
        if strict_kinds {
            self.strict_kinds = true;
        }
        if let Some(path) = secrets_file {
            self.secrets.source = SecretSource::File;
            self.secrets.path = Some(path);
        }
        self
    }

    /// Build the configured secret store.
    pub fn secret_store(&self) -> Result<Box<dyn SecretStore>> {
        match (self.secrets.source, &self.secrets.path) {
            (SecretSource::File, Some(path)) => Ok(Box::new(StaticSecretStore::from_toml_file(path)?)),
            (SecretSource::File, None) => {
                anyhow::bail!("secrets.path is required when secrets.source is \"file\"")
            }
            (SecretSource::Env, _) => Ok(Box::new(EnvSecretStore::new(&self.secrets.env_prefix))),
        }
    }

    pub fn backend(&self) -> TdsBackend {
        default_backend().with_trust_cert(self.trust_server_certificate)
    }
}
