//! Общий тестовый снимок.
//!
//! currentDate = 2024-04-15. Бронирования:
//! - k1: b1/g1/r1/p1, 2 участника, 2024-03-05 09:00–15:00, completed, оценка 4.5
//! - k2: b1/g2/r2/p2, 3 участника, 2024-03-31 12:00 – 2024-04-02 12:00, cancelled
//! - k3: обслуживание b2, 2024-03-20 08:00–12:00, стоимость 80.00
//! - k4: b2/g1/r1/p2, 1 участник, 2024-04-03 10:00–14:00, completed, оценка 3.0
//! - k5: b1/g2/r2/p1, 4 участника, 2024-02-20 10:00–13:00, in-progress, оценка 5
//!
//! У b2 есть запись обслуживания 2024-03-10 на 6 часов за 35.50.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;
use velolib::{load, Snapshot};

const CLIENTS: &str = r#"
  <clients>
    <client id="c1"><name>Anna</name><email>anna@example.com</email></client>
    <client id="c2"><name>Marco</name></client>
  </clients>"#;

pub fn fixture_xml(with_clients: bool) -> String {
    let clients = if with_clients { CLIENTS } else { "" };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CyclingDB xmlns="http://example.com/cycling" currentDate="2024-04-15T00:00:00">
  <destinations>
    <destination id="d1"><name>Zillertal</name><region>Tyrol</region></destination>
    <destination id="d2"><name>Lake Como</name><region>Lombardy</region><description>Lakeside loop</description></destination>
  </destinations>
  <bikes>
    <bike id="b1" status="active"><model>Trek FX</model></bike>
    <bike id="b2" status="active">
      <model>Cube Touring</model>
      <maintenanceRecords>
        <record><date>2024-03-10</date><duration>6</duration><cost>35.50</cost></record>
      </maintenanceRecords>
    </bike>
    <bike id="b3" status="retired"/>
  </bikes>
  <guides>
    <guide id="g1">
      <name>Lena</name>
      <languages><language>en</language><language>de</language></languages>
      <regions><region>Tyrol</region></regions>
    </guide>
    <guide id="g2">
      <name>Paolo</name>
      <languages><language>it</language></languages>
    </guide>
  </guides>{clients}
  <tourPackages>
    <tourPackage id="p1"><name>Alpine day</name><price>120.00</price></tourPackage>
    <tourPackage id="p2"><name>Lake ride</name><price>45.50</price></tourPackage>
  </tourPackages>
  <paths>
    <path id="r1"><destinationRef>d1</destinationRef><duration>6</duration><difficulty>hard</difficulty></path>
    <path id="r2"><destinationRef>d2</destinationRef></path>
  </paths>
  <bookings>
    <booking id="k1" type="rental" status="completed">
      <bikeRef>b1</bikeRef><guideRef>g1</guideRef><pathRef>r1</pathRef><packageRef>p1</packageRef>
      <participants>2</participants>
      <begin>2024-03-05T09:00:00</begin><end>2024-03-05T15:00:00</end>
      <satisfaction>4.5</satisfaction>
    </booking>
    <booking id="k2" type="rental" status="cancelled">
      <bikeRef>b1</bikeRef><guideRef>g2</guideRef><pathRef>r2</pathRef><packageRef>p2</packageRef>
      <participants>3</participants>
      <begin>2024-03-31T12:00:00</begin><end>2024-04-02T12:00:00</end>
    </booking>
    <booking id="k3" type="maintenance" status="completed">
      <bikeRef>b2</bikeRef>
      <begin>2024-03-20T08:00:00</begin><end>2024-03-20T12:00:00</end>
      <maintenanceCost>80.00</maintenanceCost>
    </booking>
    <booking id="k4" type="rental" status="completed">
      <bikeRef>b2</bikeRef><guideRef>g1</guideRef><pathRef>r1</pathRef><packageRef>p2</packageRef>
      <participants>1</participants>
      <begin>2024-04-03T10:00:00</begin><end>2024-04-03T14:00:00</end>
      <satisfaction>3.0</satisfaction>
    </booking>
    <booking id="k5" type="rental" status="in-progress">
      <bikeRef>b1</bikeRef><guideRef>g2</guideRef><pathRef>r2</pathRef><packageRef>p1</packageRef>
      <participants>4</participants>
      <begin>2024-02-20T10:00:00</begin><end>2024-02-20T13:00:00</end>
      <satisfaction>5</satisfaction>
    </booking>
  </bookings>
</CyclingDB>
"#
    )
}

pub fn load_str(xml: &str) -> velolib::Result<Snapshot> {
    load(Cursor::new(xml.as_bytes()))
}

/// Снимок без секции `clients` - цена за участника.
pub fn per_participant() -> Snapshot {
    load_str(&fixture_xml(false)).expect("load fixture without clients")
}

/// Снимок с секцией `clients` - цена за группу.
pub fn per_group() -> Snapshot {
    load_str(&fixture_xml(true)).expect("load fixture with clients")
}

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}
