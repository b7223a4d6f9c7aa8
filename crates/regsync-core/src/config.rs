//! Configuration types for regsync
//!
//! This module defines the settings shared by the library and the CLI.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default TransIP REST API endpoint
pub const DEFAULT_API_URL: &str = "https://api.transip.nl/v6";

/// API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration for a custom endpoint
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(Error::config(format!(
                "API URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            )));
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(Error::config(format!(
                "Request timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_api_url())
    }
}

/// Reconciliation behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Compute and report the change, but skip the update call
    #[serde(default)]
    pub dry_run: bool,
}

impl ReconcileOptions {
    /// Live mode: updates are pushed
    pub fn live() -> Self {
        Self { dry_run: false }
    }

    /// Dry-run mode: updates are logged, not pushed
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Parameters of a token request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Account login name
    pub user: String,

    /// Request a read-only token
    #[serde(default)]
    pub read_only: bool,

    /// Token lifetime as understood by the provider
    #[serde(default = "default_expiration")]
    pub expiration: String,

    /// Label prefix; a timestamp is appended at request time
    #[serde(default = "default_label")]
    pub label: String,

    /// Allow use of the token from any IP address
    #[serde(default)]
    pub global_key: bool,
}

impl AuthSettings {
    /// Settings for `user` with every other field at its default
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            read_only: false,
            expiration: default_expiration(),
            label: default_label(),
            global_key: false,
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.user.trim().is_empty() {
            return Err(Error::config("user is required"));
        }
        if self.expiration.trim().is_empty() {
            return Err(Error::config("expiration cannot be empty"));
        }
        if self.label.trim().is_empty() {
            return Err(Error::config("label cannot be empty"));
        }
        Ok(())
    }
}

/// Validate that a string is a plausible domain name
///
/// Basic RFC 1035 checks: total length, label length, characters, hyphens.
pub fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::invalid_input("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(Error::invalid_input(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(Error::invalid_input(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(Error::invalid_input(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(Error::invalid_input(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::invalid_input(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_expiration() -> String {
    "1 hour".to_string()
}

fn default_label() -> String {
    "Ansible key".to_string()
}
