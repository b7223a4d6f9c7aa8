//! Contract Test: Nameserver Order
//!
//! Nameserver lists are compared position by position. The same set in a
//! different order is a different delegation and must be pushed.
//!
//! Constraints verified:
//! - Swapping two entries yields `changed = true`
//! - Length differences yield `changed = true`
//! - Glue differences yield `changed = true`
//! - The full desired list is pushed, in the caller's order

mod common;

use common::*;
use regsync_core::{Error, NameserverEntry, NameserverReconciler, ReconcileOptions};

#[tokio::test]
async fn swapped_entries_are_a_change() {
    let live = transip_nameservers();
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        let api = MockRegistrar::with_nameservers(live.clone());
        let mut wanted = live.clone();
        wanted.swap(i, j);

        let outcome = NameserverReconciler::new(&api)
            .reconcile("example.com", &wanted)
            .await
            .unwrap();

        assert!(outcome.changed, "swap of {} and {} went unnoticed", i, j);
        assert_eq!(api.pushed_nameservers(), vec![wanted.clone()]);
        assert_eq!(outcome.state, wanted);
    }
}

#[tokio::test]
async fn shorter_list_is_a_change() {
    let api = MockRegistrar::with_nameservers(transip_nameservers());
    let wanted = transip_nameservers()[..2].to_vec();

    let outcome = NameserverReconciler::new(&api)
        .reconcile("example.com", &wanted)
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(api.live_nameservers(), wanted);
}

#[tokio::test]
async fn glue_change_is_a_change() {
    let live = vec![
        NameserverEntry::new("ns1.example.com").with_ipv4("192.0.2.1"),
        NameserverEntry::new("ns2.example.com").with_ipv4("192.0.2.2"),
    ];
    let api = MockRegistrar::with_nameservers(live.clone());
    let mut wanted = live;
    wanted[1] = NameserverEntry::new("ns2.example.com")
        .with_ipv4("192.0.2.2")
        .with_ipv6("2001:db8::2");

    let outcome = NameserverReconciler::new(&api)
        .reconcile("example.com", &wanted)
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(api.update_call_count(), 1);
}

#[tokio::test]
async fn update_failure_propagates() {
    let api = MockRegistrar::with_nameservers(transip_nameservers())
        .failing_update("Nameserver change not allowed");
    let wanted = vec![NameserverEntry::new("ns1.example.com")];

    let err = NameserverReconciler::new(&api)
        .reconcile("example.com", &wanted)
        .await
        .unwrap_err();

    match err {
        Error::Update { message, .. } => assert_eq!(message, "Nameserver change not allowed"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(api.live_nameservers(), transip_nameservers());
}

#[tokio::test]
async fn blank_hostname_fails_before_fetch() {
    let api = MockRegistrar::with_nameservers(transip_nameservers());
    let wanted = vec![NameserverEntry::new("")];

    let err = NameserverReconciler::new(&api)
        .reconcile("example.com", &wanted)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(api.fetch_call_count(), 0);
}

#[tokio::test]
async fn dry_run_does_not_write() {
    let api = MockRegistrar::with_nameservers(transip_nameservers());
    let mut wanted = transip_nameservers();
    wanted.reverse();

    let outcome = NameserverReconciler::with_options(&api, ReconcileOptions::dry_run())
        .reconcile("example.com", &wanted)
        .await
        .unwrap();

    assert!(outcome.changed);
    assert!(outcome.dry_run);
    assert_eq!(api.update_call_count(), 0);
    assert_eq!(api.live_nameservers(), transip_nameservers());
}
