//! Core traits for regsync
//!
//! - [`RegistrarApi`]: the provider's HTTP API, as seen by the reconcilers

pub mod registrar_api;

pub use registrar_api::{ApiReply, RegistrarApi};
