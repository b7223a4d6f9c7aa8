// # regsync-core
//
// Core library for declarative reconciliation against the TransIP registrar.
//
// ## Architecture Overview
//
// - **RegistrarApi**: Trait for the provider's HTTP API (fetch/update/auth)
// - **RecordReconciler**: Converges DNS entries, inheriting `external` content
// - **NameserverReconciler**: Converges the ordered nameserver list
// - **RequestSigner**: Signs login messages with the account's RSA key
// - **TokenClient**: Exchanges a signed login for a bearer token
//
// ## Design Principles
//
// 1. **Declarative**: The desired list is the full state, not a delta
// 2. **Idempotent**: Equal state never triggers an update call
// 3. **No partial writes**: Merge and validation finish before any update
// 4. **Library-First**: The CLI is a thin layer over this crate

pub mod auth;
pub mod compare;
pub mod config;
pub mod error;
pub mod merge;
pub mod nameserver;
pub mod reconcile;
pub mod record;
pub mod signing;
pub mod traits;

// Re-export core types for convenience
pub use auth::{AuthOutcome, Token, TokenClient, authenticate};
pub use config::{AuthSettings, ClientConfig, ReconcileOptions};
pub use error::{Error, Result};
pub use nameserver::NameserverEntry;
pub use reconcile::{NameserverReconciler, ReconcileOutcome, ReconcileState, RecordReconciler};
pub use record::{DesiredDnsRecord, DnsRecord, RecordType};
pub use signing::{LoginRequest, RequestSigner, SignedRequest, SigningMessage};
pub use traits::{ApiReply, RegistrarApi};
