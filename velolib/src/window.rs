//! Временные окна агрегации и пересечение интервалов.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

use crate::error::{Result, VeloError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: NaiveDateTime,
    end: NaiveDateTime,
    /// `true` - `[start, end]`, `false` - `[start, end)`.
    closed: bool,
}

impl Window {
    /// `[start, end)`; пустое окно - ошибка.
    pub fn half_open(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end <= start {
            return Err(VeloError::InvalidWindow(format!(
                "empty window [{start}, {end})"
            )));
        }
        Ok(Self { start, end, closed: false })
    }

    /// `[start, end]`, допускается `start == end`.
    pub fn closed(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end < start {
            return Err(VeloError::InvalidWindow(format!(
                "end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end, closed: true })
    }

    /// Календарный месяц `[1-е число, 1-е число следующего месяца)`.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| VeloError::InvalidWindow(format!("no such month {year}-{month}")))?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| VeloError::InvalidWindow(format!("month {year}-{month} out of range")))?;
        Self::half_open(midnight(first), midnight(next))
    }

    /// `[now - months, now)`.
    pub fn trailing_months(now: NaiveDateTime, months: u32) -> Result<Self> {
        if months == 0 {
            return Err(VeloError::InvalidWindow("period_months must be positive".into()));
        }
        let start = now
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| VeloError::InvalidWindow(format!("{months} months before {now}")))?;
        Self::half_open(start, now)
    }

    /// `[now - days, now)`.
    pub fn trailing_days(now: NaiveDateTime, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(VeloError::InvalidWindow("period_days must be positive".into()));
        }
        let start = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| VeloError::InvalidWindow(format!("{days} days before {now}")))?;
        Self::half_open(start, now)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start && (ts < self.end || (self.closed && ts == self.end))
    }

    /// Длина окна в часах.
    pub fn hours(&self) -> f64 {
        hours(self.end - self.start)
    }

    /// Пересекается ли интервал `[begin, end)` с окном.
    /// Интервал нулевой длины считается точкой.
    pub fn overlaps(&self, begin: NaiveDateTime, end: NaiveDateTime) -> bool {
        if begin == end {
            return self.contains(begin);
        }
        begin < self.end && end > self.start
    }

    /// Часы интервала `[begin, end)`, попадающие в окно.
    pub fn overlap_hours(&self, begin: NaiveDateTime, end: NaiveDateTime) -> f64 {
        let from = begin.max(self.start);
        let to = end.min(self.end);
        if to <= from {
            0.0
        } else {
            hours(to - from)
        }
    }
}

/// Ключ периода `YYYY-MM`.
pub fn period_key(ts: NaiveDateTime) -> String {
    format!("{:04}-{:02}", ts.year(), ts.month())
}

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_time(chrono::NaiveTime::MIN)
}

fn hours(d: Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn december_rolls_into_next_year() {
        let w = Window::month(2023, 12).unwrap();
        assert_eq!(w.start(), ts(2023, 12, 1, 0));
        assert_eq!(w.end(), ts(2024, 1, 1, 0));
        assert_eq!(w.hours(), 31.0 * 24.0);
    }

    #[test]
    fn bad_month_is_invalid_window() {
        assert!(matches!(Window::month(2024, 13), Err(VeloError::InvalidWindow(_))));
        assert!(matches!(Window::month(2024, 0), Err(VeloError::InvalidWindow(_))));
    }

    #[test]
    fn closed_window_includes_end() {
        let w = Window::closed(ts(2024, 3, 1, 0), ts(2024, 3, 31, 0)).unwrap();
        assert!(w.contains(ts(2024, 3, 31, 0)));
        assert!(!w.contains(ts(2024, 3, 31, 1)));

        let h = Window::half_open(ts(2024, 3, 1, 0), ts(2024, 3, 31, 0)).unwrap();
        assert!(!h.contains(ts(2024, 3, 31, 0)));
    }

    #[test]
    fn reversed_range_rejected() {
        let err = Window::closed(ts(2024, 3, 2, 0), ts(2024, 3, 1, 0)).unwrap_err();
        assert!(matches!(err, VeloError::InvalidWindow(_)));
    }

    #[test]
    fn overlap_is_clipped_to_window() {
        let w = Window::month(2024, 3).unwrap();
        let begin = ts(2024, 3, 31, 12);
        let end = ts(2024, 4, 2, 12);
        assert!(w.overlaps(begin, end));
        assert_eq!(w.overlap_hours(begin, end), 12.0);
        assert_eq!(Window::month(2024, 4).unwrap().overlap_hours(begin, end), 36.0);
    }

    #[test]
    fn touching_interval_does_not_overlap() {
        let w = Window::month(2024, 3).unwrap();
        assert!(!w.overlaps(ts(2024, 2, 28, 0), ts(2024, 3, 1, 0)));
        assert!(!w.overlaps(ts(2024, 4, 1, 0), ts(2024, 4, 1, 5)));
    }

    #[test]
    fn trailing_windows_need_positive_period() {
        let now = ts(2024, 4, 15, 0);
        assert!(Window::trailing_months(now, 0).is_err());
        assert!(Window::trailing_days(now, 0).is_err());
        let w = Window::trailing_months(now, 2).unwrap();
        assert_eq!(w.start(), ts(2024, 2, 15, 0));
        assert_eq!(period_key(w.start()), "2024-02");
    }

    #[test]
    fn trailing_days_out_of_range_is_invalid_window() {
        let now = ts(2024, 4, 15, 0);
        assert!(matches!(
            Window::trailing_days(now, u32::MAX),
            Err(VeloError::InvalidWindow(_))
        ));
        let w = Window::trailing_days(now, 30).unwrap();
        assert_eq!(w.start(), ts(2024, 3, 16, 0));
    }
}
