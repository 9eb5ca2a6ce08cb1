//! Доменные модели - неизменяемый «снимок» данных туроператора.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{self, PricingMode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub region: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BikeStatus {
    Active,
    Maintenance,
    Retired,
}

/// Запись об обслуживании, хранящаяся прямо у велосипеда.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceRecord {
    pub date: NaiveDateTime,
    pub hours: f64,
    pub cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bike {
    pub id: String,
    pub model: Option<String>,
    pub status: BikeStatus,
    pub maintenance: Vec<MaintenanceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guide {
    pub id: String,
    pub name: Option<String>,
    pub languages: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourPackage {
    pub id: String,
    pub name: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Path {
    pub id: String,
    pub destination: String,
    pub duration_hours: Option<f64>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BookingKind {
    Rental,
    Maintenance,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Completed,
    Cancelled,
    InProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub bike: String,
    pub guide: Option<String>,
    pub path: Option<String>,
    pub package: Option<String>,
    pub participants: u32,
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: BookingKind,
    pub status: BookingStatus,
    pub satisfaction: Option<f64>,
    pub maintenance_cost: Option<Decimal>,
}

impl Booking {
    /// Полная длительность бронирования в часах.
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.begin).num_seconds() as f64 / 3600.0
    }
}

/// Загруженный снимок. После загрузки не меняется: поля закрыты,
/// доступ только на чтение, поэтому снимок можно читать из нескольких потоков.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) current_date: NaiveDateTime,
    pub(crate) has_clients_section: bool,
    pub(crate) pricing_mode: PricingMode,
    pub(crate) destinations: BTreeMap<String, Destination>,
    pub(crate) bikes: BTreeMap<String, Bike>,
    pub(crate) guides: BTreeMap<String, Guide>,
    pub(crate) clients: BTreeMap<String, Client>,
    pub(crate) packages: BTreeMap<String, TourPackage>,
    pub(crate) paths: BTreeMap<String, Path>,
    pub(crate) bookings: Vec<Booking>,
}

impl Snapshot {
    /// «Сейчас» для всех расчётов - дата из документа, а не системные часы.
    pub fn current_date(&self) -> NaiveDateTime {
        self.current_date
    }

    pub fn has_clients_section(&self) -> bool {
        self.has_clients_section
    }

    pub fn pricing_mode(&self) -> PricingMode {
        self.pricing_mode
    }

    /// Явно задать режим цены вместо выведенного из наличия `clients`.
    pub fn with_pricing_mode(mut self, mode: PricingMode) -> Self {
        self.pricing_mode = mode;
        self
    }

    pub fn destinations(&self) -> &BTreeMap<String, Destination> {
        &self.destinations
    }

    pub fn bikes(&self) -> &BTreeMap<String, Bike> {
        &self.bikes
    }

    pub fn guides(&self) -> &BTreeMap<String, Guide> {
        &self.guides
    }

    pub fn clients(&self) -> &BTreeMap<String, Client> {
        &self.clients
    }

    pub fn packages(&self) -> &BTreeMap<String, TourPackage> {
        &self.packages
    }

    pub fn paths(&self) -> &BTreeMap<String, Path> {
        &self.paths
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Регион маршрута (через пункт назначения).
    pub fn path_region(&self, path_id: &str) -> Option<&str> {
        let path = self.paths.get(path_id)?;
        self.destinations
            .get(&path.destination)
            .map(|d| d.region.as_str())
    }

    /// Выручка бронирования; без пакета (обслуживание) - ноль.
    pub fn booking_revenue(&self, booking: &Booking) -> Decimal {
        booking
            .package
            .as_deref()
            .and_then(|id| self.packages.get(id))
            .map(|p| pricing::revenue(booking, p, self.pricing_mode))
            .unwrap_or(Decimal::ZERO)
    }
}
