//! External-record merge
//!
//! Builds the record list to push from the desired input, inheriting the
//! content of records marked `external` from the live zone. This runs to
//! completion before any write, so a missing live record aborts the pass with
//! the provider untouched.

use crate::error::{Error, Result};
use crate::record::{DesiredDnsRecord, DnsRecord};

/// First existing record with the same `(name, type)` as `desired`
pub fn find_live_counterpart<'a>(
    existing: &'a [DnsRecord],
    desired: &DesiredDnsRecord,
) -> Option<&'a DnsRecord> {
    existing
        .iter()
        .find(|r| r.name == desired.name && r.record_type == desired.record_type)
}

/// Resolve one desired record into the record to send
pub fn resolve_record(existing: &[DnsRecord], desired: &DesiredDnsRecord) -> Result<DnsRecord> {
    let mut record = desired.to_record();

    if desired.external {
        let live = find_live_counterpart(existing, desired).ok_or_else(|| {
            Error::ExternalRecordNotFound {
                name: desired.name.clone(),
                record_type: desired.record_type.to_string(),
            }
        })?;
        record.content = live.content.clone();
    }

    Ok(record)
}

/// Resolve every desired record, preserving input order and duplicates
pub fn merge_external(
    existing: &[DnsRecord],
    desired: &[DesiredDnsRecord],
) -> Result<Vec<DnsRecord>> {
    desired
        .iter()
        .map(|d| resolve_record(existing, d))
        .collect()
}
