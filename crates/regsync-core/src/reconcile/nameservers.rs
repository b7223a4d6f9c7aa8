//! Nameserver reconciliation

use tracing::{info, warn};

use super::{Pass, ReconcileOutcome, ReconcileState};
use crate::config::{ReconcileOptions, validate_domain_name};
use crate::error::Result;
use crate::nameserver::NameserverEntry;
use crate::traits::RegistrarApi;

/// Converges the delegation of a domain on a desired nameserver list
///
/// Unlike DNS records the lists are compared as-is, without sorting: the
/// position of an entry decides which nameserver is primary.
pub struct NameserverReconciler<'a> {
    api: &'a dyn RegistrarApi,
    options: ReconcileOptions,
}

impl<'a> NameserverReconciler<'a> {
    /// Create a reconciler in live mode
    pub fn new(api: &'a dyn RegistrarApi) -> Self {
        Self::with_options(api, ReconcileOptions::live())
    }

    /// Create a reconciler with explicit options
    pub fn with_options(api: &'a dyn RegistrarApi, options: ReconcileOptions) -> Self {
        Self { api, options }
    }

    /// Run one pass for `domain`
    pub async fn reconcile(
        &self,
        domain: &str,
        desired: &[NameserverEntry],
    ) -> Result<ReconcileOutcome<NameserverEntry>> {
        validate_domain_name(domain)?;
        for entry in desired {
            entry.validate()?;
        }

        let mut pass = Pass::new("nameserver", domain);

        let existing = self
            .api
            .fetch_nameservers(domain)
            .await
            .map_err(|e| pass.fail(e))?;
        pass.advance(ReconcileState::Fetched);

        if existing.as_slice() == desired {
            pass.advance(ReconcileState::Unchanged);
            return Ok(pass.report(false, desired.to_vec(), self.options.dry_run));
        }

        pass.advance(ReconcileState::PendingUpdate);

        if self.options.dry_run {
            warn!(
                "[DRY-RUN] Would change nameservers of {} from {:?} to {:?}",
                domain,
                hostnames(&existing),
                hostnames(desired)
            );
            return Ok(pass.report(true, desired.to_vec(), true));
        }

        self.api
            .update_nameservers(domain, desired)
            .await
            .map_err(|e| pass.fail(e))?;
        pass.advance(ReconcileState::Updated);

        info!(
            "Updated nameservers of {} via {}: {:?}",
            domain,
            self.api.provider_name(),
            hostnames(desired)
        );

        Ok(pass.report(true, desired.to_vec(), false))
    }
}

fn hostnames(entries: &[NameserverEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.hostname.as_str()).collect()
}
