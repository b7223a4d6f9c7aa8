// # TransIP REST API Client
//
// This crate implements `RegistrarApi` against the TransIP REST API v6.
//
// ## Behaviour
//
// - One HTTP request per trait call; nothing is retried or cached
// - HTTP timeout taken from `ClientConfig` (30 seconds by default)
// - Non-success statuses become `Error::Fetch` / `Error::Update` carrying the
//   provider's `error` text, with 401/403, 404, 429 and 5xx called out
// - Transport failures (connect, timeout, TLS) become `Error::Http`
//
// ## Security Requirements
//
// - The bearer token NEVER appears in logs or `Debug` output
// - The login signature is sent, never logged
//
// ## API Reference
//
// - Request token:    POST `/auth` (header `Signature`, body = signed message)
// - List DNS entries: GET  `/domains/:domain/dns`
// - Replace entries:  PUT  `/domains/:domain/dns` `{"dnsEntries": [...]}`
// - List nameservers: GET  `/domains/:domain/nameservers`
// - Replace them:     PUT  `/domains/:domain/nameservers` `{"nameservers": [...]}`

use async_trait::async_trait;
use regsync_core::traits::{ApiReply, RegistrarApi};
use regsync_core::{ClientConfig, DnsRecord, Error, NameserverEntry, Result, SignedRequest, Token};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Header carrying the base64 login signature
const SIGNATURE_HEADER: &str = "Signature";

/// Which side of a reconcile pass a failed call belongs to
#[derive(Debug, Clone, Copy)]
enum Operation {
    Fetch,
    Update,
}

#[derive(Serialize)]
struct DnsEntriesBody<'a> {
    #[serde(rename = "dnsEntries")]
    dns_entries: &'a [DnsRecord],
}

#[derive(Serialize)]
struct NameserversBody<'a> {
    nameservers: &'a [NameserverEntry],
}

/// TransIP API client
///
/// Token requests need no token; every domain call does. Build one client
/// for the login and another with [`TransipClient::with_token`] for the
/// reconcile calls, or reuse one and attach the token afterwards.
pub struct TransipClient {
    /// Base URL without trailing slash
    base_url: String,

    /// Bearer token for domain calls
    /// ⚠️ NEVER log this value
    token: Option<Token>,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the bearer token
impl std::fmt::Debug for TransipClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransipClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl TransipClient {
    /// Create a client for the endpoint in `config`
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// Attach the bearer token used for domain calls
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Result<&str> {
        self.token
            .as_ref()
            .map(Token::expose)
            .ok_or_else(|| Error::config("an access token is required for domain calls"))
    }

    /// Send a request and decode the reply without judging its status
    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<ApiReply> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::http(format!("{} timed out: {}", what, e))
            } else {
                Error::http(format!("{} failed: {}", what, e))
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("{}: failed to read response body: {}", what, e)))?;

        tracing::debug!("{} -> HTTP {}", what, status);

        Ok(ApiReply {
            status,
            body: decode_body(&text),
        })
    }

    async fn get_field<T: DeserializeOwned>(&self, domain: &str, resource: &str, field: &str) -> Result<T> {
        let path = format!("/domains/{}/{}", domain, resource);
        let request = self
            .client
            .get(self.url(&path))
            .bearer_auth(self.bearer()?);

        let reply = self.send(request, &format!("GET {}", path)).await?;
        if !reply.is_success() {
            return Err(failure(Operation::Fetch, domain, &reply));
        }

        let value = reply
            .body
            .get(field)
            .cloned()
            .ok_or_else(|| Error::malformed(format!("GET {} response has no '{}' field", path, field)))?;

        serde_json::from_value(value)
            .map_err(|e| Error::malformed(format!("GET {} returned unexpected '{}': {}", path, field, e)))
    }

    async fn put_body<B: Serialize + ?Sized>(&self, domain: &str, resource: &str, body: &B) -> Result<()> {
        let path = format!("/domains/{}/{}", domain, resource);
        let request = self
            .client
            .put(self.url(&path))
            .bearer_auth(self.bearer()?)
            .json(body);

        let reply = self.send(request, &format!("PUT {}", path)).await?;
        if !reply.is_success() {
            return Err(failure(Operation::Update, domain, &reply));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistrarApi for TransipClient {
    async fn exchange_signature(&self, request: &SignedRequest) -> Result<ApiReply> {
        let http_request = self
            .client
            .post(self.url("/auth"))
            .header(SIGNATURE_HEADER, &request.signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.message.clone());

        self.send(http_request, "POST /auth").await
    }

    async fn fetch_dns_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        self.get_field(domain, "dns", "dnsEntries").await
    }

    async fn update_dns_records(&self, domain: &str, records: &[DnsRecord]) -> Result<()> {
        tracing::info!("Replacing {} DNS entries of {}", records.len(), domain);
        self.put_body(domain, "dns", &DnsEntriesBody { dns_entries: records })
            .await
    }

    async fn fetch_nameservers(&self, domain: &str) -> Result<Vec<NameserverEntry>> {
        self.get_field(domain, "nameservers", "nameservers").await
    }

    async fn update_nameservers(&self, domain: &str, nameservers: &[NameserverEntry]) -> Result<()> {
        tracing::info!("Replacing nameservers of {} ({} entries)", domain, nameservers.len());
        self.put_body(domain, "nameservers", &NameserversBody { nameservers })
            .await
    }

    fn provider_name(&self) -> &'static str {
        "transip"
    }
}

/// Empty bodies become `Null`, non-JSON bodies a `String`
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Describe a non-success reply, calling out the statuses worth a hint
fn describe_failure(reply: &ApiReply) -> String {
    let text = reply.error_text();
    match reply.status {
        401 | 403 => format!(
            "Authentication failed (HTTP {}): {}. Check the token and its IP whitelist",
            reply.status, text
        ),
        404 => format!("Not found (HTTP 404): {}", text),
        429 => format!("Rate limit exceeded (HTTP 429): {}", text),
        500..=599 => format!("TransIP server error (HTTP {}): {}", reply.status, text),
        _ => text,
    }
}

fn failure(operation: Operation, domain: &str, reply: &ApiReply) -> Error {
    let message = describe_failure(reply);
    match operation {
        Operation::Fetch => Error::fetch(domain, message),
        Operation::Update => Error::update(domain, message),
    }
}
