use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{error::Result, model::Snapshot, window::Window};

use super::{bike_stats_in, path_stats_in, BikeStats, PathStats};

/// Итоги месяца. Выручка берётся только из аренды велосипедов:
/// каждое бронирование уже несёт и велосипед, и маршрут, поэтому
/// прибавлять выручку маршрутов значило бы считать её дважды.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_revenue: Decimal,
    pub total_bookings: u32,
    pub total_maintenance_cost: Decimal,
    pub bikes_in_service: u32,
    pub total_tours: u32,
    pub total_participants: u64,
}

impl Summary {
    pub fn from_stats(
        bikes: &BTreeMap<String, BikeStats>,
        paths: &BTreeMap<String, PathStats>,
    ) -> Self {
        let mut s = Summary::default();
        for b in bikes.values() {
            s.total_revenue += b.total_revenue;
            s.total_bookings += b.booking_count;
            s.total_maintenance_cost += b.maintenance_cost;
            if b.rental_hours > 0.0 {
                s.bikes_in_service += 1;
            }
        }
        for p in paths.values() {
            s.total_tours += p.total_trips;
            s.total_participants += p.total_participants;
        }
        s
    }
}

pub fn monthly_summary(snapshot: &Snapshot, year: i32, month: u32) -> Result<Summary> {
    let window = Window::month(year, month)?;
    let bikes = bike_stats_in(snapshot, &window);
    let paths = path_stats_in(snapshot, &window);
    Ok(Summary::from_stats(&bikes, &paths))
}

/// Загрузка велосипедов за последние `period_days` дней до `currentDate`.
pub fn occupancy_rates(snapshot: &Snapshot, period_days: u32) -> Result<BTreeMap<String, f64>> {
    let window = Window::trailing_days(snapshot.current_date(), period_days)?;
    let hours = window.hours();
    Ok(bike_stats_in(snapshot, &window)
        .into_iter()
        .map(|(id, s)| (id, s.occupancy_rate(hours)))
        .collect())
}
