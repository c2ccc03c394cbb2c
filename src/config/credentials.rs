use anyhow::{Context, Result};
use std::path::Path;
use std::{env, fs, result};
use thiserror::Error;

pub const ENDPOINT_VAR: &str = "API_ENDPOINT";
pub const KEY_VAR: &str = "API_KEY";
pub const SECRET_VAR: &str = "API_SECRET";

pub const DEFAULT_ENDPOINT: &str = "https://api.exoscale.com/compute";

/// The endpoint is the one setting with a sensible default, so an environment
/// carrying just `API_KEY` and `API_SECRET` works out of the box.
pub fn api_endpoint() -> String {
    env::var(ENDPOINT_VAR).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string())
}

/// API credentials as gathered so far; both keys have to be present before
/// the first remote call (see [`Credentials::into_parts`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(KEY_VAR).ok(),
            api_secret: env::var(SECRET_VAR).ok(),
        }
    }

    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();

        let result: Result<_> = (|| {
            let code = fs::read_to_string(file).context("Couldn't read file")?;
            Ok(Self::parse(&code)?)
        })();

        result.with_context(|| format!("Couldn't load credentials from: {}", file.display()))
    }

    /// Parses the flat `key=value` credentials format; only `api_key` and
    /// `api_secret` are recognized (case-insensitively) and every line must
    /// contain exactly one `=`.
    pub fn parse(code: &str) -> result::Result<Self, CredentialsError> {
        let mut this = Self::default();

        for line in code.lines() {
            let parts: Vec<_> = line.split('=').collect();

            let (key, value) = match parts.as_slice() {
                [key, value] => (*key, *value),

                _ => {
                    return Err(CredentialsError::MalformedLine {
                        line: line.to_string(),
                    });
                }
            };

            match key.to_lowercase().as_str() {
                "api_key" => this.api_key = Some(value.to_string()),
                "api_secret" => this.api_secret = Some(value.to_string()),

                _ => {
                    return Err(CredentialsError::UnknownKey {
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(this)
    }

    /// Field-by-field merge; `other`'s values win, so a credentials file can
    /// override the environment.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            api_secret: other.api_secret.or(self.api_secret),
        }
    }

    pub fn into_parts(self) -> result::Result<(String, String), CredentialsError> {
        let api_key = self
            .api_key
            .ok_or(CredentialsError::MissingKey { key: "api_key" })?;

        let api_secret = self
            .api_secret
            .ok_or(CredentialsError::MissingKey { key: "api_secret" })?;

        Ok((api_key, api_secret))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Invalid credentials line (expected `key=value`): {line}")]
    MalformedLine { line: String },

    #[error("Invalid credentials key: {key}")]
    UnknownKey { key: String },

    #[error("Missing credentials key: {key}")]
    MissingKey { key: &'static str },
}
