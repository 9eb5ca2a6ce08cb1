use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::Result,
    model::{BookingStatus, Snapshot},
    window::{period_key, Window},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathStats {
    pub total_trips: u32,
    pub total_participants: u64,
    pub revenue_generated: Decimal,
    /// Среднее по оценкам, которые есть; без оценок - 0.0.
    pub avg_satisfaction: f64,
    /// Доля завершённых поездок, 0..=100.
    pub completion_rate: f64,
    /// `YYYY-MM` начала поездки -> число поездок.
    pub popular_periods: BTreeMap<String, u32>,
    pub regions: BTreeSet<String>,
}

/// Окно `[currentDate - period_months, currentDate)`.
pub fn path_analytics(
    snapshot: &Snapshot,
    period_months: u32,
) -> Result<BTreeMap<String, PathStats>> {
    let window = Window::trailing_months(snapshot.current_date(), period_months)?;
    Ok(path_stats_in(snapshot, &window))
}

pub fn path_stats_in(snapshot: &Snapshot, window: &Window) -> BTreeMap<String, PathStats> {
    #[derive(Default)]
    struct Acc {
        stats: PathStats,
        rating_sum: f64,
        rating_count: u32,
        completed: u32,
    }

    let mut acc: BTreeMap<&str, Acc> = snapshot
        .paths()
        .keys()
        .map(|id| {
            let mut a = Acc::default();
            if let Some(region) = snapshot.path_region(id) {
                a.stats.regions.insert(region.to_string());
            }
            (id.as_str(), a)
        })
        .collect();

    for booking in snapshot.bookings() {
        if !window.contains(booking.begin) {
            continue;
        }
        let Some(a) = booking.path.as_deref().and_then(|id| acc.get_mut(id)) else {
            continue;
        };
        a.stats.total_trips += 1;
        a.stats.total_participants += u64::from(booking.participants);
        a.stats.revenue_generated += snapshot.booking_revenue(booking);
        *a.stats
            .popular_periods
            .entry(period_key(booking.begin))
            .or_insert(0) += 1;
        if let Some(score) = booking.satisfaction {
            a.rating_sum += score;
            a.rating_count += 1;
        }
        if booking.status == BookingStatus::Completed {
            a.completed += 1;
        }
    }

    acc.into_iter()
        .map(|(id, a)| {
            let mut s = a.stats;
            if a.rating_count > 0 {
                s.avg_satisfaction = a.rating_sum / f64::from(a.rating_count);
            }
            if s.total_trips > 0 {
                s.completion_rate = f64::from(a.completed) / f64::from(s.total_trips) * 100.0;
            }
            (id.to_string(), s)
        })
        .collect()
}
