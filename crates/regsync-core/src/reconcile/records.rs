//! DNS record reconciliation

use tracing::{info, warn};

use super::{Pass, ReconcileOutcome, ReconcileState};
use crate::compare::{records_equal, sort_records};
use crate::config::{ReconcileOptions, validate_domain_name};
use crate::error::Result;
use crate::merge::merge_external;
use crate::record::{DesiredDnsRecord, DnsRecord};
use crate::traits::RegistrarApi;

/// Converges the DNS entries of a domain on a desired record list
///
/// The desired list is the complete zone content: records that exist at the
/// provider but not in the list are removed, and an empty list clears the
/// zone. Record order is irrelevant; `expire` differences count as changes.
pub struct RecordReconciler<'a> {
    api: &'a dyn RegistrarApi,
    options: ReconcileOptions,
}

impl<'a> RecordReconciler<'a> {
    /// Create a reconciler in live mode
    pub fn new(api: &'a dyn RegistrarApi) -> Self {
        Self::with_options(api, ReconcileOptions::live())
    }

    /// Create a reconciler with explicit options
    pub fn with_options(api: &'a dyn RegistrarApi, options: ReconcileOptions) -> Self {
        Self { api, options }
    }

    /// Run one pass for `domain`
    ///
    /// # Returns
    ///
    /// - `changed = true`: the merged, sorted records that were pushed
    /// - `changed = false`: the caller's desired records, unmodified
    ///
    /// # Errors
    ///
    /// Validation errors and [`crate::Error::ExternalRecordNotFound`] are
    /// raised before any update call; fetch and update failures propagate
    /// as-is.
    pub async fn reconcile(
        &self,
        domain: &str,
        desired: &[DesiredDnsRecord],
    ) -> Result<ReconcileOutcome<DnsRecord>> {
        validate_domain_name(domain)?;
        for record in desired {
            record.validate()?;
        }

        let mut pass = Pass::new("dns", domain);

        let existing = self
            .api
            .fetch_dns_records(domain)
            .await
            .map_err(|e| pass.fail(e))?;
        pass.advance(ReconcileState::Fetched);

        let mut combined = merge_external(&existing, desired).map_err(|e| pass.fail(e))?;
        // Pushed lists go out in sort order
        sort_records(&mut combined);

        if records_equal(&existing, &combined) {
            pass.advance(ReconcileState::Unchanged);
            let reported = desired.iter().map(DesiredDnsRecord::to_record).collect();
            return Ok(pass.report(false, reported, self.options.dry_run));
        }

        pass.advance(ReconcileState::PendingUpdate);

        if self.options.dry_run {
            warn!(
                "[DRY-RUN] Would replace {} DNS entries of {} with {} entries",
                existing.len(),
                domain,
                combined.len()
            );
            return Ok(pass.report(true, combined, true));
        }

        self.api
            .update_dns_records(domain, &combined)
            .await
            .map_err(|e| pass.fail(e))?;
        pass.advance(ReconcileState::Updated);

        info!(
            "Updated DNS entries of {} via {} ({} -> {} entries)",
            domain,
            self.api.provider_name(),
            existing.len(),
            combined.len()
        );

        Ok(pass.report(true, combined, false))
    }
}
