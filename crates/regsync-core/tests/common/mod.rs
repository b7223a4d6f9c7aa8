//! Test doubles and common utilities for reconciliation contract tests
//!
//! [`MockRegistrar`] keeps the provider state in memory and counts every call,
//! so tests can assert on how many writes a pass performed and what they sent.

#![allow(dead_code)]

use regsync_core::error::{Error, Result};
use regsync_core::traits::{ApiReply, RegistrarApi};
use regsync_core::{DesiredDnsRecord, DnsRecord, NameserverEntry, RecordType, SignedRequest};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_KEY: &str = include_str!("../fixtures/test_key.pem");

/// An in-memory registrar that tracks calls
pub struct MockRegistrar {
    records: Mutex<Vec<DnsRecord>>,
    nameservers: Mutex<Vec<NameserverEntry>>,
    fetch_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
    pushed_records: Mutex<Vec<Vec<DnsRecord>>>,
    pushed_nameservers: Mutex<Vec<Vec<NameserverEntry>>>,
    fetch_error: Option<String>,
    update_error: Option<String>,
    auth_reply: ApiReply,
    auth_requests: Mutex<Vec<SignedRequest>>,
}

impl MockRegistrar {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            nameservers: Mutex::new(Vec::new()),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            pushed_records: Mutex::new(Vec::new()),
            pushed_nameservers: Mutex::new(Vec::new()),
            fetch_error: None,
            update_error: None,
            auth_reply: ApiReply {
                status: 201,
                body: serde_json::json!({ "token": "test-token" }),
            },
            auth_requests: Mutex::new(Vec::new()),
        }
    }

    /// Start with `records` as the live zone
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let mock = Self::new();
        *mock.records.lock().unwrap() = records;
        mock
    }

    /// Start with `nameservers` as the live delegation
    pub fn with_nameservers(nameservers: Vec<NameserverEntry>) -> Self {
        let mock = Self::new();
        *mock.nameservers.lock().unwrap() = nameservers;
        mock
    }

    /// Make every fetch fail with `message`
    pub fn failing_fetch(mut self, message: &str) -> Self {
        self.fetch_error = Some(message.to_string());
        self
    }

    /// Make every update fail with `message`
    pub fn failing_update(mut self, message: &str) -> Self {
        self.update_error = Some(message.to_string());
        self
    }

    /// Reply to auth requests with `status` and `body`
    pub fn with_auth_reply(mut self, status: u16, body: serde_json::Value) -> Self {
        self.auth_reply = ApiReply { status, body };
        self
    }

    /// Get the number of fetch calls
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of update calls (records and nameservers)
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Every record list pushed so far
    pub fn pushed_records(&self) -> Vec<Vec<DnsRecord>> {
        self.pushed_records.lock().unwrap().clone()
    }

    /// Every nameserver list pushed so far
    pub fn pushed_nameservers(&self) -> Vec<Vec<NameserverEntry>> {
        self.pushed_nameservers.lock().unwrap().clone()
    }

    /// Current live zone
    pub fn live_records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Current live delegation
    pub fn live_nameservers(&self) -> Vec<NameserverEntry> {
        self.nameservers.lock().unwrap().clone()
    }

    /// Signed requests received by the auth endpoint
    pub fn auth_requests(&self) -> Vec<SignedRequest> {
        self.auth_requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RegistrarApi for MockRegistrar {
    async fn exchange_signature(&self, request: &SignedRequest) -> Result<ApiReply> {
        self.auth_requests.lock().unwrap().push(request.clone());
        Ok(self.auth_reply.clone())
    }

    async fn fetch_dns_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.fetch_error {
            return Err(Error::fetch(domain, message.clone()));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update_dns_records(&self, domain: &str, records: &[DnsRecord]) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.update_error {
            return Err(Error::update(domain, message.clone()));
        }
        self.pushed_records.lock().unwrap().push(records.to_vec());
        *self.records.lock().unwrap() = records.to_vec();
        Ok(())
    }

    async fn fetch_nameservers(&self, domain: &str) -> Result<Vec<NameserverEntry>> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.fetch_error {
            return Err(Error::fetch(domain, message.clone()));
        }
        Ok(self.nameservers.lock().unwrap().clone())
    }

    async fn update_nameservers(&self, domain: &str, nameservers: &[NameserverEntry]) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.update_error {
            return Err(Error::update(domain, message.clone()));
        }
        self.pushed_nameservers.lock().unwrap().push(nameservers.to_vec());
        *self.nameservers.lock().unwrap() = nameservers.to_vec();
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Shorthand for a live A record
pub fn a_record(name: &str, content: &str, expire: u32) -> DnsRecord {
    DnsRecord::new(name, RecordType::A, expire, content)
}

/// Desired counterpart of a live record
pub fn desired(record: &DnsRecord) -> DesiredDnsRecord {
    DesiredDnsRecord::new(
        record.name.clone(),
        record.record_type,
        record.expire,
        record.content.clone(),
    )
}

/// A small zone with several types and a multi-value TXT
pub fn sample_zone() -> Vec<DnsRecord> {
    vec![
        a_record("@", "1.2.3.4", 3600),
        DnsRecord::new("@", RecordType::Aaaa, 3600, "2001:db8::1"),
        DnsRecord::new("@", RecordType::Mx, 3600, "10 mail.example.com."),
        DnsRecord::new("@", RecordType::Txt, 300, "v=spf1 mx -all"),
        DnsRecord::new("@", RecordType::Txt, 300, "google-site-verification=abc"),
        DnsRecord::new("www", RecordType::Cname, 300, "@"),
    ]
}

/// TransIP's default delegation
pub fn transip_nameservers() -> Vec<NameserverEntry> {
    vec![
        NameserverEntry::new("ns0.transip.net"),
        NameserverEntry::new("ns1.transip.nl"),
        NameserverEntry::new("ns2.transip.eu"),
    ]
}
