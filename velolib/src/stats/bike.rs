use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::Result,
    model::{BookingKind, Snapshot},
    window::Window,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BikeStats {
    pub total_hours: f64,
    pub rental_hours: f64,
    pub maintenance_hours: f64,
    pub total_revenue: Decimal,
    pub booking_count: u32,
    pub maintenance_cost: Decimal,
}

impl BikeStats {
    /// Загрузка в процентах от доступных (не занятых обслуживанием) часов окна, не больше 100.
    pub fn occupancy_rate(&self, window_hours: f64) -> f64 {
        let available = window_hours - self.maintenance_hours;
        if available > 0.0 {
            (self.rental_hours / available * 100.0).min(100.0)
        } else {
            0.0
        }
    }
}

/// Статистика велосипедов за календарный месяц.
pub fn monthly_bike_stats(
    snapshot: &Snapshot,
    year: i32,
    month: u32,
) -> Result<BTreeMap<String, BikeStats>> {
    let window = Window::month(year, month)?;
    Ok(bike_stats_in(snapshot, &window))
}

/// Часы считаются по пересечению интервала бронирования с окном.
/// Деньги (выручка, стоимость обслуживания) относятся к окну, в котором
/// бронирование началось, чтобы не учитываться дважды на стыке месяцев.
/// Запись обслуживания у велосипеда целиком относится к окну, в которое попадает её дата.
pub fn bike_stats_in(snapshot: &Snapshot, window: &Window) -> BTreeMap<String, BikeStats> {
    let mut stats: BTreeMap<String, BikeStats> = snapshot
        .bikes()
        .values()
        .map(|bike| {
            let mut s = BikeStats::default();
            for rec in bike.maintenance.iter().filter(|r| window.contains(r.date)) {
                s.maintenance_hours += rec.hours;
                s.maintenance_cost += rec.cost;
            }
            (bike.id.clone(), s)
        })
        .collect();

    for booking in snapshot.bookings() {
        if !window.overlaps(booking.begin, booking.end) {
            continue;
        }
        let Some(s) = stats.get_mut(&booking.bike) else {
            continue;
        };
        let hours = window.overlap_hours(booking.begin, booking.end);
        let starts_here = window.contains(booking.begin);
        match booking.kind {
            BookingKind::Rental => {
                s.rental_hours += hours;
                if starts_here {
                    s.total_revenue += snapshot.booking_revenue(booking);
                }
            }
            BookingKind::Maintenance => {
                s.maintenance_hours += hours;
                if starts_here {
                    s.maintenance_cost += booking.maintenance_cost.unwrap_or(Decimal::ZERO);
                }
            }
        }
        s.booking_count += 1;
    }

    for s in stats.values_mut() {
        s.total_hours = s.rental_hours + s.maintenance_hours;
    }
    stats
}
