mod common;

use common::{per_participant, ts};
use std::thread;
use velolib::{
    export_monthly_report, guide_performance, monthly_bike_stats, path_analytics, PricingMode,
    Snapshot,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn snapshot_is_shareable() {
    assert_send_sync::<Snapshot>();
}

#[test]
fn parallel_queries_agree() {
    let snapshot = per_participant();
    let expected = export_monthly_report(&snapshot, 2024, 3).expect("export");
    let s = &snapshot;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let bikes = monthly_bike_stats(s, 2024, 3).expect("bikes");
                    let guides =
                        guide_performance(s, ts(2024, 3, 1, 0, 0, 0), ts(2024, 3, 31, 0, 0, 0))
                            .expect("guides");
                    let paths = path_analytics(s, 2).expect("paths");
                    let report = export_monthly_report(s, 2024, 3).expect("report");
                    (bikes.len(), guides.len(), paths.len(), report)
                })
            })
            .collect();
        for h in handles {
            let (bikes, guides, paths, report) = h.join().expect("thread");
            assert_eq!((bikes, guides, paths), (3, 2, 2));
            assert_eq!(report, expected);
        }
    });
}

#[test]
fn pricing_override_is_observable() {
    let s = per_participant().with_pricing_mode(PricingMode::PerGroup);
    assert!(!s.has_clients_section());
    assert_eq!(s.pricing_mode(), PricingMode::PerGroup);
    let stats = monthly_bike_stats(&s, 2024, 3).expect("bikes");
    assert_eq!(stats["b1"].total_revenue, rust_decimal_macros::dec!(165.50));
}
