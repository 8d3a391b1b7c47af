//! Collection statistics.
//!
//! Always computed over the full collection, never the filtered view.

use crate::model::ToyRecord;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Window for [`CatalogStats::recent_additions`].
pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_toys: usize,
    /// Created since the first day of the current calendar month.
    pub monthly_toys: usize,
    /// Created within the last [`RECENT_WINDOW_DAYS`] days.
    pub recent_additions: usize,
    /// Sum of parsed prices; missing or invalid prices add nothing.
    pub total_value: f64,
}

/// Midnight (UTC) on the first day of `now`'s month.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

pub fn compute_stats(records: &[ToyRecord], now: DateTime<Utc>) -> CatalogStats {
    let month_start = start_of_month(now);
    let week_start = now - Duration::days(RECENT_WINDOW_DAYS);

    CatalogStats {
        total_toys: records.len(),
        monthly_toys: records
            .iter()
            .filter(|r| r.created_at >= month_start)
            .count(),
        recent_additions: records
            .iter()
            .filter(|r| r.created_at >= week_start)
            .count(),
        total_value: records.iter().map(ToyRecord::parsed_price).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{record, sample_collection};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn total_value_sums_parsed_prices() {
        let stats = compute_stats(&sample_collection(), at(2024, 3, 5, 12));
        assert_eq!(stats.total_toys, 3);
        assert!((stats.total_value - 44.99).abs() < 1e-9);
    }

    #[test]
    fn empty_collection() {
        let stats = compute_stats(&[], at(2024, 3, 5, 12));
        assert_eq!(stats, CatalogStats::default());
    }

    #[test]
    fn month_and_week_windows() {
        let now = at(2024, 3, 5, 12);
        let mut records = Vec::new();
        for (name, created) in [
            ("today", at(2024, 3, 5, 9)),
            ("month start", at(2024, 3, 1, 0)),
            ("last week", at(2024, 2, 27, 12)),
            ("just outside week", at(2024, 2, 27, 11)),
            ("last year", at(2023, 3, 5, 12)),
        ] {
            let mut r = record(name, None, None, None);
            r.created_at = created;
            records.push(r);
        }

        let stats = compute_stats(&records, now);
        assert_eq!(stats.monthly_toys, 2);
        assert_eq!(stats.recent_additions, 3);
    }

    #[test]
    fn start_of_month_is_midnight_on_the_first() {
        assert_eq!(start_of_month(at(2024, 2, 29, 23)), at(2024, 2, 1, 0));
    }
}
