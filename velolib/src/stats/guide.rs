use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{error::Result, model::Snapshot, window::Window};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuideStats {
    pub total_tours: u32,
    pub total_participants: u64,
    /// Языки гида - статический атрибут, от бронирований не зависит.
    pub languages: BTreeSet<String>,
    /// Регионы, где гид реально водил туры в окне.
    pub regions: BTreeSet<String>,
    pub revenue_generated: Decimal,
}

/// Бронирования, начавшиеся в `[start, end]` включительно.
pub fn guide_performance(
    snapshot: &Snapshot,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<BTreeMap<String, GuideStats>> {
    let window = Window::closed(start, end)?;
    Ok(guide_stats_in(snapshot, &window))
}

pub fn guide_stats_in(snapshot: &Snapshot, window: &Window) -> BTreeMap<String, GuideStats> {
    let mut stats: BTreeMap<String, GuideStats> = snapshot
        .guides()
        .values()
        .map(|g| {
            let s = GuideStats {
                languages: g.languages.clone(),
                ..GuideStats::default()
            };
            (g.id.clone(), s)
        })
        .collect();

    for booking in snapshot.bookings() {
        if !window.contains(booking.begin) {
            continue;
        }
        let Some(s) = booking.guide.as_ref().and_then(|id| stats.get_mut(id)) else {
            continue;
        };
        s.total_tours += 1;
        s.total_participants += u64::from(booking.participants);
        s.revenue_generated += snapshot.booking_revenue(booking);
        if let Some(region) = booking.path.as_deref().and_then(|p| snapshot.path_region(p)) {
            s.regions.insert(region.to_string());
        }
    }
    stats
}
