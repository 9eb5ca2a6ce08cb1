//! Выручка бронирования и режим интерпретации цены пакета.
//!
//! В исходных документах нет явного признака «цена за группу / за участника».
//! Режим выводится один раз на снимок: есть секция `clients` - цена за группу,
//! нет - за каждого участника. Режим можно переопределить
//! через [`Snapshot::with_pricing_mode`](crate::model::Snapshot::with_pricing_mode).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Booking, TourPackage};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PricingMode {
    /// `revenue = price`
    PerGroup,
    /// `revenue = price * participants`
    PerParticipant,
}

impl PricingMode {
    pub fn from_clients_section(present: bool) -> Self {
        if present {
            PricingMode::PerGroup
        } else {
            PricingMode::PerParticipant
        }
    }
}

/// Участников ноль быть не может: такие бронирования отклоняются при загрузке.
pub fn revenue(booking: &Booking, package: &TourPackage, mode: PricingMode) -> Decimal {
    match mode {
        PricingMode::PerGroup => package.price,
        PricingMode::PerParticipant => package.price * Decimal::from(booking.participants),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookingKind, BookingStatus};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn booking(participants: u32) -> Booking {
        let begin = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Booking {
            id: "k1".into(),
            bike: "b1".into(),
            guide: Some("g1".into()),
            path: Some("r1".into()),
            package: Some("p1".into()),
            participants,
            begin,
            end: begin + chrono::Duration::hours(3),
            kind: BookingKind::Rental,
            status: BookingStatus::Completed,
            satisfaction: None,
            maintenance_cost: None,
        }
    }

    fn package() -> TourPackage {
        TourPackage {
            id: "p1".into(),
            name: None,
            price: dec!(49.90),
        }
    }

    #[test]
    fn clients_section_selects_mode() {
        assert_eq!(PricingMode::from_clients_section(true), PricingMode::PerGroup);
        assert_eq!(
            PricingMode::from_clients_section(false),
            PricingMode::PerParticipant
        );
    }

    #[test]
    fn per_group_ignores_participants() {
        let p = package();
        assert_eq!(revenue(&booking(1), &p, PricingMode::PerGroup), dec!(49.90));
        assert_eq!(revenue(&booking(7), &p, PricingMode::PerGroup), dec!(49.90));
    }

    #[test]
    fn per_participant_multiplies_exactly() {
        let p = package();
        assert_eq!(
            revenue(&booking(3), &p, PricingMode::PerParticipant),
            dec!(149.70)
        );
    }
}
