// # Registrar API Trait
//
// Defines the calls the reconcilers and the token client make against the
// registrar. The HTTP transport lives behind this trait so the core logic can
// be exercised against in-memory doubles.
//
// ## Implementations
//
// - TransIP: `regsync-provider-transip` crate
//
// ## Contract
//
// - `fetch_*` returns the provider's current state for one domain
// - `update_*` replaces the full state of one domain (PUT, not PATCH)
// - Implementations make exactly one HTTP request per call and never retry
// - Non-success statuses become `Error::Fetch` / `Error::Update` carrying the
//   provider's error text

use async_trait::async_trait;

use crate::error::Result;
use crate::nameserver::NameserverEntry;
use crate::record::DnsRecord;
use crate::signing::SignedRequest;

/// Raw reply to an API call: status code plus decoded JSON body
///
/// Empty bodies decode to `Value::Null`; bodies that are not JSON are kept
/// as a `Value::String`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    /// HTTP status code
    pub status: u16,
    /// Decoded body
    pub body: serde_json::Value,
}

impl ApiReply {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The provider's `error` text, or the status plus any raw body
    pub fn error_text(&self) -> String {
        if let Some(error) = self.body.get("error").and_then(|e| e.as_str()) {
            return error.to_string();
        }
        match self.body.as_str() {
            Some(raw) if !raw.trim().is_empty() => {
                format!("request failed with status {}: {}", self.status, raw.trim())
            }
            _ => format!("request failed with status {}", self.status),
        }
    }
}

/// Trait for the registrar's HTTP API
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks.
#[async_trait]
pub trait RegistrarApi: Send + Sync {
    /// POST the signed login message to the auth endpoint
    ///
    /// Returns the raw reply; interpreting it is up to
    /// [`crate::auth::TokenClient`].
    async fn exchange_signature(&self, request: &SignedRequest) -> Result<ApiReply>;

    /// Get all DNS entries of `domain`
    async fn fetch_dns_records(&self, domain: &str) -> Result<Vec<DnsRecord>>;

    /// Replace all DNS entries of `domain` with `records`
    async fn update_dns_records(&self, domain: &str, records: &[DnsRecord]) -> Result<()>;

    /// Get the nameservers of `domain`, in delegation order
    async fn fetch_nameservers(&self, domain: &str) -> Result<Vec<NameserverEntry>>;

    /// Replace the nameservers of `domain` with `nameservers`
    async fn update_nameservers(&self, domain: &str, nameservers: &[NameserverEntry]) -> Result<()>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_prefers_provider_message() {
        let reply = ApiReply {
            status: 404,
            body: serde_json::json!({ "error": "Domain not found" }),
        };
        assert!(!reply.is_success());
        assert_eq!(reply.error_text(), "Domain not found");

        let reply = ApiReply {
            status: 502,
            body: serde_json::Value::Null,
        };
        assert_eq!(reply.error_text(), "request failed with status 502");

        let reply = ApiReply {
            status: 503,
            body: serde_json::Value::String("upstream unavailable\n".to_string()),
        };
        assert_eq!(
            reply.error_text(),
            "request failed with status 503: upstream unavailable"
        );
    }

    #[test]
    fn success_range() {
        for status in [200, 201, 204] {
            assert!(ApiReply { status, body: serde_json::Value::Null }.is_success());
        }
        assert!(!ApiReply { status: 301, body: serde_json::Value::Null }.is_success());
    }
}
