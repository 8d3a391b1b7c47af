//! Display ordering.

use crate::model::ToyRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sort order of the display list. `Newest` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    PriceLowHigh,
    PriceHighLow,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::Newest,
        SortBy::Oldest,
        SortBy::PriceLowHigh,
        SortBy::PriceHighLow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::PriceLowHigh => "price-low-high",
            SortBy::PriceHighLow => "price-high-low",
        }
    }

    pub fn compare(&self, a: &ToyRecord, b: &ToyRecord) -> Ordering {
        match self {
            SortBy::Newest => b.created_at.cmp(&a.created_at),
            SortBy::Oldest => a.created_at.cmp(&b.created_at),
            SortBy::PriceLowHigh => a.parsed_price().total_cmp(&b.parsed_price()),
            SortBy::PriceHighLow => b.parsed_price().total_cmp(&a.parsed_price()),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sort order '{0}' (expected newest, oldest, price-low-high or price-high-low)")]
pub struct ParseSortError(pub String);

impl FromStr for SortBy {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s.trim())
            .ok_or_else(|| ParseSortError(s.to_string()))
    }
}

/// Sorts in place. The sort is stable: ties keep their incoming order.
pub fn sort_records(records: &mut [&ToyRecord], sort_by: SortBy) {
    records.sort_by(|a, b| sort_by.compare(a, b));
}
