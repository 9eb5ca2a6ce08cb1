//! Входной XML-снимок (`<CyclingDB currentDate="...">` с секциями сущностей).
//! Пространство имён `http://example.com/cycling` допускается, но не требуется.

use crate::{
    error::{Result, VeloError},
    model::{
        Bike, BikeStatus, Booking, BookingKind, BookingStatus, Client, Destination, Guide,
        MaintenanceRecord, Path, Snapshot, TourPackage,
    },
    pricing::PricingMode,
    traits::ReadSnapshot,
};
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::de::from_reader;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;
use tracing::debug;

/// Длительность обслуживания по умолчанию, если в записи её нет.
const DEFAULT_MAINTENANCE_HOURS: f64 = 24.0;

#[derive(Deserialize, Debug)]
struct XmlDb {
    #[serde(rename = "@currentDate")]
    current_date: Option<String>,
    destinations: Option<XmlDestinations>,
    bikes: Option<XmlBikes>,
    guides: Option<XmlGuides>,
    clients: Option<XmlClients>,
    #[serde(rename = "tourPackages")]
    tour_packages: Option<XmlPackages>,
    paths: Option<XmlPaths>,
    bookings: Option<XmlBookings>,
    maintenances: Option<XmlMaintenances>,
}

#[derive(Deserialize, Debug)]
struct XmlDestinations {
    #[serde(rename = "destination", default)]
    items: Vec<XmlDestination>,
}

#[derive(Deserialize, Debug)]
struct XmlDestination {
    #[serde(rename = "@id")]
    id: String,
    name: String,
    region: String,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct XmlBikes {
    #[serde(rename = "bike", default)]
    items: Vec<XmlBike>,
}

#[derive(Deserialize, Debug)]
struct XmlBike {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@status")]
    status: Option<String>,
    model: Option<String>,
    #[serde(rename = "maintenanceRecords")]
    maintenance_records: Option<XmlMaintenanceRecords>,
    #[serde(rename = "maintenance", default)]
    maintenance: Vec<XmlMaintenance>,
}

#[derive(Deserialize, Debug)]
struct XmlMaintenanceRecords {
    #[serde(rename = "record", default)]
    items: Vec<XmlMaintenanceRecord>,
}

#[derive(Deserialize, Debug)]
struct XmlMaintenanceRecord {
    date: String,
    duration: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    cost: Option<Decimal>,
}

/// `<maintenance>`: у велосипеда - атрибутами (`date`, `duration`, `cost`),
/// в общей секции `<maintenances>` - с `bikeRef`; поля допускаются и атрибутами, и элементами.
#[derive(Deserialize, Debug)]
struct XmlMaintenance {
    #[serde(rename = "@bikeRef")]
    bike_ref_attr: Option<String>,
    #[serde(rename = "bikeRef")]
    bike_ref: Option<String>,
    #[serde(rename = "@date")]
    date_attr: Option<String>,
    date: Option<String>,
    #[serde(rename = "@duration")]
    duration_attr: Option<String>,
    duration: Option<String>,
    #[serde(rename = "@hours")]
    hours_attr: Option<String>,
    hours: Option<String>,
    #[serde(rename = "@cost")]
    cost_attr: Option<String>,
    cost: Option<String>,
}

#[derive(Deserialize, Debug)]
struct XmlMaintenances {
    #[serde(rename = "maintenance", default)]
    items: Vec<XmlMaintenance>,
}

#[derive(Deserialize, Debug)]
struct XmlGuides {
    #[serde(rename = "guide", default)]
    items: Vec<XmlGuide>,
}

#[derive(Deserialize, Debug)]
struct XmlGuide {
    #[serde(rename = "@id")]
    id: String,
    name: Option<String>,
    languages: Option<XmlLanguages>,
    regions: Option<XmlRegions>,
}

#[derive(Deserialize, Debug)]
struct XmlLanguages {
    #[serde(rename = "language", default)]
    items: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct XmlRegions {
    #[serde(rename = "region", default)]
    items: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct XmlClients {
    #[serde(rename = "client", default)]
    items: Vec<XmlClient>,
}

#[derive(Deserialize, Debug)]
struct XmlClient {
    #[serde(rename = "@id")]
    id: String,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Deserialize, Debug)]
struct XmlPackages {
    #[serde(rename = "tourPackage", default)]
    items: Vec<XmlPackage>,
}

#[derive(Deserialize, Debug)]
struct XmlPackage {
    #[serde(rename = "@id")]
    id: String,
    name: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
}

#[derive(Deserialize, Debug)]
struct XmlPaths {
    #[serde(rename = "path", default)]
    items: Vec<XmlPath>,
}

#[derive(Deserialize, Debug)]
struct XmlPath {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "destinationRef")]
    destination_ref: String,
    duration: Option<String>,
    difficulty: Option<String>,
}

#[derive(Deserialize, Debug)]
struct XmlBookings {
    #[serde(rename = "booking", default)]
    items: Vec<XmlBooking>,
}

#[derive(Deserialize, Debug)]
struct XmlBooking {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "@status")]
    status: String,
    #[serde(rename = "bikeRef")]
    bike_ref: String,
    #[serde(rename = "guideRef")]
    guide_ref: Option<String>,
    #[serde(rename = "pathRef")]
    path_ref: Option<String>,
    #[serde(rename = "packageRef")]
    package_ref: Option<String>,
    participants: Option<String>,
    begin: String,
    end: String,
    satisfaction: Option<String>,
    #[serde(rename = "maintenanceCost", default, with = "rust_decimal::serde::str_option")]
    maintenance_cost: Option<Decimal>,
}

pub struct SnapshotXml;

impl ReadSnapshot for SnapshotXml {
    fn read<R: BufRead>(r: R) -> Result<Snapshot> {
        let x: XmlDb = from_reader(r).map_err(|e| VeloError::Xml(format!("{e}")))?;
        build(x)
    }
}

fn build(x: XmlDb) -> Result<Snapshot> {
    let current_date = x
        .current_date
        .as_deref()
        .ok_or_else(|| VeloError::Parse("missing currentDate attribute".into()))
        .and_then(parse_timestamp)?;

    let mut destinations = BTreeMap::new();
    for d in x.destinations.map(|s| s.items).unwrap_or_default() {
        let dest = Destination {
            id: d.id,
            name: d.name,
            region: d.region,
            description: non_empty(d.description),
        };
        insert_unique(&mut destinations, "destination", dest.id.clone(), dest)?;
    }

    let mut bikes = BTreeMap::new();
    for b in x.bikes.map(|s| s.items).unwrap_or_default() {
        let status = match b.status.as_deref() {
            None => BikeStatus::Active,
            Some(s) => parse_bike_status(s)?,
        };
        let owner = format!("bike {}", b.id);
        let mut maintenance = Vec::new();
        for rec in b.maintenance_records.map(|m| m.items).unwrap_or_default() {
            maintenance.push(maintenance_record(&owner, Some(rec.date), rec.duration, rec.cost)?);
        }
        for m in b.maintenance {
            maintenance.push(attr_maintenance(&owner, m)?);
        }
        let bike = Bike {
            id: b.id,
            model: non_empty(b.model),
            status,
            maintenance,
        };
        insert_unique(&mut bikes, "bike", bike.id.clone(), bike)?;
    }

    let mut guides = BTreeMap::new();
    for g in x.guides.map(|s| s.items).unwrap_or_default() {
        let guide = Guide {
            id: g.id,
            name: non_empty(g.name),
            languages: collect_set(g.languages.map(|l| l.items)),
            regions: collect_set(g.regions.map(|r| r.items)),
        };
        insert_unique(&mut guides, "guide", guide.id.clone(), guide)?;
    }

    for m in x.maintenances.map(|s| s.items).unwrap_or_default() {
        let bike_ref = non_empty(m.bike_ref_attr.clone().or_else(|| m.bike_ref.clone()))
            .ok_or_else(|| VeloError::Parse("maintenance entry without bikeRef".into()))?;
        let owner = format!("maintenance of bike {bike_ref}");
        let Some(bike) = bikes.get_mut(&bike_ref) else {
            return Err(VeloError::Reference {
                owner,
                kind: "bike",
                missing: bike_ref,
            });
        };
        bike.maintenance.push(attr_maintenance(&owner, m)?);
    }

    // Само наличие секции (даже пустой) определяет режим цены.
    let has_clients_section = x.clients.is_some();
    let mut clients = BTreeMap::new();
    for c in x.clients.map(|s| s.items).unwrap_or_default() {
        let client = Client {
            id: c.id,
            name: non_empty(c.name),
            email: non_empty(c.email),
            phone: non_empty(c.phone),
        };
        insert_unique(&mut clients, "client", client.id.clone(), client)?;
    }

    let mut packages = BTreeMap::new();
    for p in x.tour_packages.map(|s| s.items).unwrap_or_default() {
        if p.price.is_sign_negative() {
            return Err(VeloError::DataInvariant(format!(
                "tour package {}: negative price {}",
                p.id, p.price
            )));
        }
        let pkg = TourPackage {
            id: p.id,
            name: non_empty(p.name),
            price: p.price,
        };
        insert_unique(&mut packages, "tour package", pkg.id.clone(), pkg)?;
    }

    let mut paths = BTreeMap::new();
    for p in x.paths.map(|s| s.items).unwrap_or_default() {
        let destination = p.destination_ref.trim().to_string();
        if !destinations.contains_key(&destination) {
            return Err(VeloError::Reference {
                owner: format!("path {}", p.id),
                kind: "destination",
                missing: destination,
            });
        }
        let duration_hours = non_empty(p.duration)
            .map(|d| parse_hours(&d, &format!("path {} duration", p.id)))
            .transpose()?;
        let path = Path {
            id: p.id,
            destination,
            duration_hours,
            difficulty: non_empty(p.difficulty),
        };
        insert_unique(&mut paths, "path", path.id.clone(), path)?;
    }

    let mut seen = BTreeSet::new();
    let mut bookings = Vec::new();
    for b in x.bookings.map(|s| s.items).unwrap_or_default() {
        if !seen.insert(b.id.clone()) {
            return Err(VeloError::DataInvariant(format!("duplicate booking id '{}'", b.id)));
        }
        let owner = format!("booking {}", b.id);

        let bike = resolve(&bikes, &owner, "bike", Some(b.bike_ref))?
            .ok_or_else(|| VeloError::Parse(format!("{owner}: empty bikeRef")))?;
        let guide = resolve(&guides, &owner, "guide", b.guide_ref)?;
        let path = resolve(&paths, &owner, "path", b.path_ref)?;
        let package = resolve(&packages, &owner, "tour package", b.package_ref)?;

        let kind = match b.kind.as_deref() {
            None => BookingKind::Rental,
            Some(k) => parse_kind(k)?,
        };
        if kind == BookingKind::Rental && (guide.is_none() || path.is_none() || package.is_none())
        {
            return Err(VeloError::DataInvariant(format!(
                "{owner}: rental booking needs guideRef, pathRef and packageRef"
            )));
        }

        let participants = match non_empty(b.participants) {
            None => 1,
            Some(p) => p
                .parse::<u32>()
                .map_err(|e| VeloError::Parse(format!("{owner} participants '{p}': {e}")))?,
        };
        if participants == 0 {
            return Err(VeloError::DataInvariant(format!(
                "{owner}: participant count must be at least 1"
            )));
        }

        let begin = parse_timestamp(&b.begin)?;
        let end = parse_timestamp(&b.end)?;
        if end < begin {
            return Err(VeloError::DataInvariant(format!(
                "{owner}: end {end} is before begin {begin}"
            )));
        }

        let satisfaction = non_empty(b.satisfaction)
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|e| VeloError::Parse(format!("{owner} satisfaction '{s}': {e}")))
            })
            .transpose()?;
        if let Some(score) = satisfaction {
            if !(0.0..=5.0).contains(&score) {
                return Err(VeloError::DataInvariant(format!(
                    "{owner}: satisfaction {score} outside [0, 5]"
                )));
            }
        }
        if let Some(cost) = b.maintenance_cost {
            if cost.is_sign_negative() {
                return Err(VeloError::DataInvariant(format!(
                    "{owner}: negative maintenance cost {cost}"
                )));
            }
        }

        bookings.push(Booking {
            id: b.id,
            bike,
            guide,
            path,
            package,
            participants,
            begin,
            end,
            kind,
            status: parse_status(&b.status)?,
            satisfaction,
            maintenance_cost: b.maintenance_cost,
        });
    }

    let pricing_mode = PricingMode::from_clients_section(has_clients_section);
    debug!(
        destinations = destinations.len(),
        bikes = bikes.len(),
        guides = guides.len(),
        clients = clients.len(),
        packages = packages.len(),
        paths = paths.len(),
        bookings = bookings.len(),
        ?pricing_mode,
        "snapshot loaded"
    );

    Ok(Snapshot {
        current_date,
        has_clients_section,
        pricing_mode,
        destinations,
        bikes,
        guides,
        clients,
        packages,
        paths,
        bookings,
    })
}

fn attr_maintenance(owner: &str, m: XmlMaintenance) -> Result<MaintenanceRecord> {
    let cost = non_empty(m.cost_attr.or(m.cost))
        .map(|c| {
            c.parse::<Decimal>()
                .map_err(|e| VeloError::Parse(format!("{owner} maintenance cost '{c}': {e}")))
        })
        .transpose()?;
    let duration = m
        .duration_attr
        .or(m.duration)
        .or(m.hours_attr)
        .or(m.hours);
    maintenance_record(owner, m.date_attr.or(m.date), duration, cost)
}

/// Без длительности - [`DEFAULT_MAINTENANCE_HOURS`], без стоимости - ноль.
fn maintenance_record(
    owner: &str,
    date: Option<String>,
    duration: Option<String>,
    cost: Option<Decimal>,
) -> Result<MaintenanceRecord> {
    let date = non_empty(date)
        .ok_or_else(|| VeloError::Parse(format!("{owner}: maintenance without date")))?;
    let hours = match non_empty(duration) {
        Some(d) => parse_hours(&d, &format!("{owner} maintenance duration"))?,
        None => DEFAULT_MAINTENANCE_HOURS,
    };
    let cost = cost.unwrap_or(Decimal::ZERO);
    if cost.is_sign_negative() {
        return Err(VeloError::DataInvariant(format!(
            "{owner}: negative maintenance cost {cost}"
        )));
    }
    Ok(MaintenanceRecord {
        date: parse_timestamp(&date)?,
        hours,
        cost,
    })
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: &str,
    id: String,
    value: T,
) -> Result<()> {
    if map.contains_key(&id) {
        return Err(VeloError::DataInvariant(format!("duplicate {kind} id '{id}'")));
    }
    map.insert(id, value);
    Ok(())
}

/// Пустая ссылка = нет ссылки; непустая обязана указывать на существующую сущность.
fn resolve<T>(
    map: &BTreeMap<String, T>,
    owner: &str,
    kind: &'static str,
    id: Option<String>,
) -> Result<Option<String>> {
    match non_empty(id) {
        None => Ok(None),
        Some(id) if map.contains_key(&id) => Ok(Some(id)),
        Some(id) => Err(VeloError::Reference {
            owner: owner.to_string(),
            kind,
            missing: id,
        }),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn collect_set(items: Option<Vec<String>>) -> BTreeSet<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| non_empty(Some(s)))
        .collect()
}

fn parse_hours(s: &str, what: &str) -> Result<f64> {
    let h = s
        .parse::<f64>()
        .map_err(|e| VeloError::Parse(format!("{what} '{s}': {e}")))?;
    if !h.is_finite() || h < 0.0 {
        return Err(VeloError::DataInvariant(format!("{what}: {h} hours")));
    }
    Ok(h)
}

/// `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS` или просто дата (полночь).
fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|e| VeloError::Parse(format!("timestamp '{s}': {e}")))
}

fn parse_bike_status(s: &str) -> Result<BikeStatus> {
    match s.trim() {
        "active" => Ok(BikeStatus::Active),
        "maintenance" => Ok(BikeStatus::Maintenance),
        "retired" => Ok(BikeStatus::Retired),
        other => Err(VeloError::Parse(format!("bike status {other}"))),
    }
}

fn parse_kind(s: &str) -> Result<BookingKind> {
    match s.trim() {
        "rental" => Ok(BookingKind::Rental),
        "maintenance" => Ok(BookingKind::Maintenance),
        other => Err(VeloError::Parse(format!("booking type {other}"))),
    }
}

fn parse_status(s: &str) -> Result<BookingStatus> {
    match s.trim() {
        "completed" => Ok(BookingStatus::Completed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        "in-progress" => Ok(BookingStatus::InProgress),
        other => Err(VeloError::Parse(format!("booking status {other}"))),
    }
}
