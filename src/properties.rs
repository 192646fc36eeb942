//! Resource property schemas
//!
//! Each resource kind declares a small table of [`Rule`]s. Desired
//! properties are checked against it before any connection is opened;
//! a violation becomes a `Validation` failure. Names that are later
//! placed between `[` and `]` in statements must not contain brackets.

use lifecycle::{DeletionPolicy, Properties};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{ProviderError, Result};
use crate::secrets::Credential;

static NO_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\[\]]*$").expect("Invalid bracket regex"));

static SERVER_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(mssql:)?//.*").expect("Invalid url regex"));

static PERMISSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("Invalid permission regex"));

/// Longest SQL Server identifier.
pub const MAX_NAME_LEN: usize = 128;

/// Constraints on one string property.
#[derive(Clone, Copy)]
struct Rule {
    name: &'static str,
    required: bool,
    pattern: Option<&'static LazyLock<Regex>>,
    max_len: Option<usize>,
    default: Option<&'static str>,
}

impl Rule {
    fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            pattern: None,
            max_len: None,
            default: None,
        }
    }

    fn optional(name: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    fn identifier(self) -> Self {
        Self {
            pattern: Some(&NO_BRACKETS),
            ..self
        }
    }

    fn max_len(self, len: usize) -> Self {
        Self {
            max_len: Some(len),
            ..self
        }
    }

    fn with_default(self, value: &'static str) -> Self {
        Self {
            required: false,
            default: Some(value),
            ..self
        }
    }

    fn pattern(self, pattern: &'static LazyLock<Regex>) -> Self {
        Self {
            pattern: Some(pattern),
            ..self
        }
    }

    /// Read and check the property, applying the default.
    fn read(&self, props: &Properties, scope: &str) -> Result<Option<String>> {
        let path = if scope.is_empty() {
            self.name.to_string()
        } else {
            format!("{scope}.{}", self.name)
        };

        let value = match props.get(self.name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(_) => return Err(ProviderError::validation(format!("{path} must be a string"))),
        };

        let value = match value {
            Some(value) => value,
            None => {
                if let Some(default) = self.default {
                    return Ok(Some(default.to_string()));
                }
                if self.required {
                    return Err(ProviderError::validation(format!("{path} is required")));
                }
                return Ok(None);
            }
        };

        if let Some(pattern) = self.pattern
            && !pattern.is_match(&value)
        {
            return Err(ProviderError::validation(format!(
                "{path} '{value}' does not match '{}'",
                pattern.as_str()
            )));
        }
        if let Some(max) = self.max_len
            && value.chars().count() > max
        {
            return Err(ProviderError::validation(format!(
                "{path} is longer than {max} characters"
            )));
        }
        Ok(Some(value))
    }

    fn require(&self, props: &Properties, scope: &str) -> Result<String> {
        self.read(props, scope)?
            .ok_or_else(|| ProviderError::validation(format!("{} is required", self.name)))
    }
}

/// Exactly one credential source must be usable; `Password` wins.
fn credential(props: &Properties, scope: &str) -> Result<Credential> {
    let password = Rule::optional("Password").read(props, scope)?;
    let reference = Rule::optional("PasswordParameterName")
        .read(props, scope)?
        .filter(|name| !name.is_empty());
    Credential::from_parts(password, reference).ok_or_else(|| {
        let at = if scope.is_empty() { String::new() } else { format!(" in {scope}") };
        ProviderError::validation(format!(
            "one of Password or PasswordParameterName is required{at}"
        ))
    })
}

fn deletion_policy(props: &Properties) -> Result<DeletionPolicy> {
    match Rule::optional("DeletionPolicy").read(props, "")? {
        None => Ok(DeletionPolicy::default()),
        Some(value) => DeletionPolicy::parse(&value).ok_or_else(|| {
            ProviderError::validation(format!(
                "DeletionPolicy '{value}' is not one of Drop, Retain"
            ))
        }),
    }
}

/// Properties every kind can be parsed from.
pub trait KindProperties: Sized {
    /// Parse and validate desired properties.
    fn parse(props: &Properties) -> Result<Self>;

    /// Previous properties that end up as identifiers in statements.
    const PREVIOUS_IDENTIFIERS: &'static [&'static str];

    /// The server the resource lives on.
    fn server(&self) -> &ServerProperties;

    /// Check the previous properties that are used as identifiers.
    ///
    /// Everything else in them is read leniently.
    fn check_previous(old: &Properties) -> Result<()> {
        for name in Self::PREVIOUS_IDENTIFIERS {
            if let Some(Value::String(value)) = old.get(*name)
                && !NO_BRACKETS.is_match(value)
            {
                return Err(ProviderError::validation(format!(
                    "OldResourceProperties.{name} '{value}' does not match '{}'",
                    NO_BRACKETS.as_str()
                )));
            }
        }
        Ok(())
    }
}

/// The shared `Server` property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProperties {
    pub url: String,
    pub credential: Credential,
}

impl ServerProperties {
    pub fn parse(props: &Properties) -> Result<Self> {
        let server = match props.get("Server") {
            Some(Value::Object(server)) => server,
            Some(_) => return Err(ProviderError::validation("Server must be an object")),
            None => return Err(ProviderError::validation("Server is required")),
        };
        Ok(Self {
            url: Rule::required("URL").pattern(&SERVER_URL).require(server, "Server")?,
            credential: credential(server, "Server")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginProperties {
    pub server: ServerProperties,
    pub login_name: String,
    pub default_database: String,
    pub credential: Credential,
    /// Only exists so that changing it forces an update
    pub password_hash: Option<String>,
    /// Accepted so that declarations carrying it validate; logins are
    /// always dropped on delete.
    pub deletion_policy: DeletionPolicy,
}

impl KindProperties for LoginProperties {
    const PREVIOUS_IDENTIFIERS: &'static [&'static str] = &["LoginName"];

    fn parse(props: &Properties) -> Result<Self> {
        Ok(Self {
            server: ServerProperties::parse(props)?,
            login_name: Rule::required("LoginName").identifier().require(props, "")?,
            default_database: Rule::optional("DefaultDatabase")
                .identifier()
                .with_default(tdskit::DEFAULT_DATABASE)
                .require(props, "")?,
            credential: credential(props, "")?,
            password_hash: Rule::optional("PasswordHash").read(props, "")?,
            deletion_policy: deletion_policy(props)?,
        })
    }

    fn server(&self) -> &ServerProperties {
        &self.server
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseProperties {
    pub server: ServerProperties,
    pub name: String,
    pub deletion_policy: DeletionPolicy,
}

impl KindProperties for DatabaseProperties {
    const PREVIOUS_IDENTIFIERS: &'static [&'static str] = &["Name"];

    fn parse(props: &Properties) -> Result<Self> {
        Ok(Self {
            server: ServerProperties::parse(props)?,
            name: Rule::required("Name")
                .identifier()
                .max_len(MAX_NAME_LEN)
                .require(props, "")?,
            deletion_policy: deletion_policy(props)?,
        })
    }

    fn server(&self) -> &ServerProperties {
        &self.server
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProperties {
    pub server: ServerProperties,
    pub user_name: String,
    pub login_name: String,
    pub default_schema: String,
}

impl KindProperties for UserProperties {
    const PREVIOUS_IDENTIFIERS: &'static [&'static str] = &["UserName"];

    fn parse(props: &Properties) -> Result<Self> {
        Ok(Self {
            server: ServerProperties::parse(props)?,
            user_name: Rule::required("UserName").identifier().require(props, "")?,
            login_name: Rule::required("LoginName").identifier().require(props, "")?,
            default_schema: Rule::optional("DefaultSchema")
                .identifier()
                .with_default("dbo")
                .require(props, "")?,
        })
    }

    fn server(&self) -> &ServerProperties {
        &self.server
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProperties {
    pub server: ServerProperties,
    pub name: String,
    pub owner: String,
}

impl KindProperties for SchemaProperties {
    const PREVIOUS_IDENTIFIERS: &'static [&'static str] = &["Name", "Owner"];

    fn parse(props: &Properties) -> Result<Self> {
        let name = Rule::required("Name").identifier().max_len(MAX_NAME_LEN);
        let owner = Rule::required("Owner").identifier().max_len(MAX_NAME_LEN);
        Ok(Self {
            server: ServerProperties::parse(props)?,
            name: name.require(props, "")?,
            owner: owner.require(props, "")?,
        })
    }

    fn server(&self) -> &ServerProperties {
        &self.server
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantProperties {
    pub server: ServerProperties,
    /// Upper-cased and trimmed
    pub permission: String,
    pub user_name: String,
    pub database: String,
}

impl KindProperties for GrantProperties {
    const PREVIOUS_IDENTIFIERS: &'static [&'static str] = &[];

    fn parse(props: &Properties) -> Result<Self> {
        let permission = Rule::required("Permission")
            .pattern(&PERMISSION)
            .max_len(MAX_NAME_LEN)
            .require(props, "")?;
        Ok(Self {
            server: ServerProperties::parse(props)?,
            permission: normalize_permission(&permission),
            user_name: Rule::required("UserName")
                .identifier()
                .max_len(MAX_NAME_LEN)
                .require(props, "")?,
            database: Rule::required("Database")
                .identifier()
                .max_len(MAX_NAME_LEN)
                .require(props, "")?,
        })
    }

    fn server(&self) -> &ServerProperties {
        &self.server
    }
}

/// Permissions are compared and embedded in identities upper-cased.
pub fn normalize_permission(permission: &str) -> String {
    permission.trim().to_uppercase()
}
