//! Nameserver entries for a domain
//!
//! Position in the list is significant: the first entry is the primary.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A nameserver delegated to by a domain, with optional glue addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameserverEntry {
    /// Nameserver host name (e.g. `ns0.transip.net`)
    pub hostname: String,

    /// IPv4 glue address
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv4: Option<String>,

    /// IPv6 glue address
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv6: Option<String>,
}

impl NameserverEntry {
    /// Create an entry without glue
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ipv4: None,
            ipv6: None,
        }
    }

    /// Set the IPv4 glue address
    pub fn with_ipv4(mut self, ipv4: impl Into<String>) -> Self {
        self.ipv4 = Some(ipv4.into());
        self
    }

    /// Set the IPv6 glue address
    pub fn with_ipv6(mut self, ipv6: impl Into<String>) -> Self {
        self.ipv6 = Some(ipv6.into());
        self
    }

    /// Check the entry is well formed
    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(Error::invalid_input("nameserver hostname cannot be empty"));
        }
        Ok(())
    }
}

// The provider reports absent glue as "", callers usually omit the key.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
