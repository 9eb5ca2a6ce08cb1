mod common;

use common::{per_group, per_participant};
use rust_decimal_macros::dec;
use velolib::{export_monthly_report, MonthlyReport, VeloError};

#[test]
fn report_is_byte_stable() {
    let s = per_participant();
    let a = export_monthly_report(&s, 2024, 3).expect("first export");
    let b = export_monthly_report(&s, 2024, 3).expect("second export");
    assert_eq!(a, b);
}

#[test]
fn generated_comes_from_snapshot() {
    let xml = export_monthly_report(&per_participant(), 2024, 3).expect("export");
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<MonthlyReport year="2024" month="3" generated="2024-04-15T00:00:00">"#));
}

#[test]
fn current_schema_values() {
    let xml = export_monthly_report(&per_participant(), 2024, 3).expect("export");
    assert!(xml.contains(r#"<Utilization totalHours="18" rentalHours="18" maintenanceHours="0"/>"#));
    assert!(xml.contains(r#"<Utilization totalHours="10" rentalHours="0" maintenanceHours="10"/>"#));
    assert!(xml.contains("<Revenue>376.50</Revenue>"));
    assert!(xml.contains("<MaintenanceCost>115.50</MaintenanceCost>"));
    assert!(xml.contains(r#"<Tours count="1" total-participants="2"/>"#));
    assert!(xml.contains(
        r#"<Usage total-uses="1" total-participants="2" completion-rate="100.0" avg-satisfaction="4.50"/>"#
    ));
    assert!(xml.contains(
        r#"<Usage total-uses="1" total-participants="3" completion-rate="0.0" avg-satisfaction="0.00"/>"#
    ));
}

#[test]
fn legacy_schema_values() {
    let xml = export_monthly_report(&per_participant(), 2024, 3).expect("export");
    assert!(xml.contains("<TotalHours>18</TotalHours>"));
    assert!(xml.contains("<BookingCount>2</BookingCount>"));
    // 18 ч из 744 ч марта
    assert!(xml.contains("<OccupancyRate>2.42</OccupancyRate>"));
    assert!(xml.contains(r#"<Statistics totalTrips="1" avgSatisfaction="4.50"/>"#));
    assert!(xml.contains("<RevenueGenerated>240.00</RevenueGenerated>"));
}

#[test]
fn summary_section() {
    let report = MonthlyReport::build(&per_participant(), 2024, 3).expect("build");
    assert_eq!(report.summary.total_revenue, dec!(376.50));
    assert_eq!(report.summary.total_bookings, 3);
    assert_eq!(report.summary.total_maintenance_cost, dec!(115.50));
    assert_eq!(report.summary.bikes_in_service, 1);
    assert_eq!(report.summary.total_tours, 2);
    assert_eq!(report.summary.total_participants, 5);

    let xml = export_monthly_report(&per_participant(), 2024, 3).expect("export");
    assert!(xml.contains("<TotalRevenue>376.50</TotalRevenue>"));
    assert!(xml.contains("<TotalBookings>3</TotalBookings>"));
}

#[test]
fn schemas_agree_on_hours() {
    let xml = export_monthly_report(&per_group(), 2024, 3).expect("export");
    let report = MonthlyReport::build(&per_group(), 2024, 3).expect("build");
    for (id, b) in &report.bikes {
        let hours = (b.total_hours.trunc() as i64).to_string();
        let current = format!(r#"<Bike id="{id}">
      <Utilization totalHours="{hours}""#);
        let legacy = format!(r#"<Bike id="{id}">
      <TotalHours>{hours}</TotalHours>"#);
        assert!(xml.contains(&current), "{id}: {current}");
        assert!(xml.contains(&legacy), "{id}: {legacy}");
    }
}

#[test]
fn sections_sorted_by_id() {
    let xml = export_monthly_report(&per_participant(), 2024, 3).expect("export");
    let b1 = xml.find(r#"<Bike id="b1">"#).expect("b1");
    let b2 = xml.find(r#"<Bike id="b2">"#).expect("b2");
    let b3 = xml.find(r#"<Bike id="b3">"#).expect("b3");
    assert!(b1 < b2 && b2 < b3);

    let current = xml.find("<BikeStatistics>").expect("current");
    let legacy = xml.find("<Bikes>").expect("legacy");
    assert!(current < legacy);
}

#[test]
fn invalid_month_fails_whole_report() {
    let err = export_monthly_report(&per_participant(), 2024, 0).unwrap_err();
    assert!(matches!(err, VeloError::InvalidWindow(_)));
}
