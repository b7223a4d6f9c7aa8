//! Ordering and equality rules for record sets
//!
//! Record order carries no meaning for a zone, so two sets are compared after
//! sorting both by `(name, type, content)`, ties broken on `expire`. The
//! element-wise comparison that follows still looks at every field, so a
//! changed `expire` on an otherwise identical record counts as a difference.

use crate::record::DnsRecord;

/// Sort key of a record: `(name, type mnemonic, content)`
pub fn record_sort_key(record: &DnsRecord) -> (&str, &str, &str) {
    (
        record.name.as_str(),
        record.record_type.as_str(),
        record.content.as_str(),
    )
}

/// Sort records ascending by [`record_sort_key`], then by `expire`
pub fn sort_records(records: &mut [DnsRecord]) {
    records.sort_by(|a, b| {
        record_sort_key(a)
            .cmp(&record_sort_key(b))
            .then(a.expire.cmp(&b.expire))
    });
}

/// Whether two record collections describe the same zone content
///
/// Both sides are sorted internally, callers may pass them in any order.
pub fn records_equal(left: &[DnsRecord], right: &[DnsRecord]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut left = left.to_vec();
    let mut right = right.to_vec();
    sort_records(&mut left);
    sort_records(&mut right);

    left == right
}
