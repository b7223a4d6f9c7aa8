//! DNS record value types
//!
//! [`DnsRecord`] is the shape the provider returns and accepts.
//! [`DesiredDnsRecord`] is what a caller asks for; it may mark its content as
//! `external`, meaning the live value has to be inherited at reconcile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// DNS record type accepted by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Alias,
    Caa,
    Cname,
    Ds,
    Mx,
    Naptr,
    Ns,
    Srv,
    Sshfp,
    Tlsa,
    Txt,
}

impl RecordType {
    /// Upper-case mnemonic, as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Ds => "DS",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Srv => "SRV",
            RecordType::Sshfp => "SSHFP",
            RecordType::Tlsa => "TLSA",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let record_type = match s.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "ALIAS" => RecordType::Alias,
            "CAA" => RecordType::Caa,
            "CNAME" => RecordType::Cname,
            "DS" => RecordType::Ds,
            "MX" => RecordType::Mx,
            "NAPTR" => RecordType::Naptr,
            "NS" => RecordType::Ns,
            "SRV" => RecordType::Srv,
            "SSHFP" => RecordType::Sshfp,
            "TLSA" => RecordType::Tlsa,
            "TXT" => RecordType::Txt,
            other => {
                return Err(Error::invalid_input(format!(
                    "unsupported record type '{}'",
                    other
                )));
            }
        };
        Ok(record_type)
    }
}

/// A DNS record as stored by the provider
///
/// Ordering for comparison purposes is defined in [`crate::compare`]; the
/// derived `PartialEq` compares every field, `expire` included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record name relative to the domain (`@` for the apex)
    pub name: String,

    /// Time-to-live in seconds
    pub expire: u32,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record data
    pub content: String,
}

impl DnsRecord {
    /// Create a new record
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        expire: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            expire,
            record_type,
            content: content.into(),
        }
    }
}

/// A record the caller wants to exist
///
/// Unknown fields are rejected so a misspelled key (say `extrenal`) fails
/// loudly instead of being ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredDnsRecord {
    /// Record name relative to the domain
    pub name: String,

    /// Time-to-live in seconds
    pub expire: u32,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record data; a placeholder when `external` is set
    #[serde(default)]
    pub content: String,

    /// Inherit `content` from the live record with the same name and type
    #[serde(default)]
    pub external: bool,
}

impl DesiredDnsRecord {
    /// Create a desired record with caller-supplied content
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        expire: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            expire,
            record_type,
            content: content.into(),
            external: false,
        }
    }

    /// Create a desired record whose content is inherited from the live zone
    pub fn external(name: impl Into<String>, record_type: RecordType, expire: u32) -> Self {
        Self {
            name: name.into(),
            expire,
            record_type,
            content: String::new(),
            external: true,
        }
    }

    /// Check the record is well formed
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("record name cannot be empty"));
        }
        if self.expire == 0 {
            return Err(Error::invalid_input(format!(
                "record '{}' ({}) must have a non-zero expire",
                self.name, self.record_type
            )));
        }
        if !self.external && self.content.is_empty() {
            return Err(Error::invalid_input(format!(
                "record '{}' ({}) has no content and is not marked external",
                self.name, self.record_type
            )));
        }
        Ok(())
    }

    /// The record to send, taken verbatim from the desired input
    pub fn to_record(&self) -> DnsRecord {
        DnsRecord::new(
            self.name.clone(),
            self.record_type,
            self.expire,
            self.content.clone(),
        )
    }
}
