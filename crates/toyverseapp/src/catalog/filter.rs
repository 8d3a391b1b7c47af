//! Record filtering.
//!
//! [`FilterConfig`] is the filter panel's state. It is owned by the presentation
//! layer and handed in by value on every recomputation; nothing here keeps it.
//! [`matches`] decides a single record, [`filter_records`] applies it to a
//! collection while preserving input order.

use super::schema::{Category, FILTER_FIELDS};
use super::sort::SortBy;
use crate::model::ToyRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive purchase-date bounds. The range constrains only when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Filter and sort state. An empty string means "no filter" for text keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    #[serde(rename = "type")]
    pub toy_type: String,
    pub series: String,
    pub brand: String,
    pub condition: String,
    pub color_variant: String,
    pub purchase_location: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub has_images: bool,
    /// Selected tags. A record matches if it has any of them.
    pub tags: BTreeSet<String>,
    pub date_range: DateRange,
    pub specific_date: Option<NaiveDate>,
    /// English month name, e.g. "March".
    pub month: String,
    /// Four-digit year, e.g. "2024".
    pub year: String,
    pub sort_by: SortBy,
}

impl FilterConfig {
    pub fn category(&self, category: Category) -> &str {
        category.of_config(self)
    }

    pub fn set_category(&mut self, category: Category, value: impl Into<String>) {
        let slot = match category {
            Category::Type => &mut self.toy_type,
            Category::Series => &mut self.series,
            Category::Brand => &mut self.brand,
            Category::Condition => &mut self.condition,
            Category::ColorVariant => &mut self.color_variant,
            Category::PurchaseLocation => &mut self.purchase_location,
        };
        *slot = value.into();
    }

    /// Pins both price bounds to one value (the "exact price" search).
    pub fn set_exact_price(&mut self, price: f64) {
        self.min_price = Some(price);
        self.max_price = Some(price);
    }

    pub fn toggle_tag(&mut self, tag: &str, selected: bool) {
        if selected {
            self.tags.insert(tag.to_string());
        } else {
            self.tags.remove(tag);
        }
    }

    /// Resets every filter and the sort order to their defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Whether `record` survives the search text and every active filter.
pub fn matches(record: &ToyRecord, config: &FilterConfig, search: &str) -> bool {
    matches_search(record, search)
        && FILTER_FIELDS
            .iter()
            .all(|field| field.admits(record, config))
}

fn matches_search(record: &ToyRecord, search: &str) -> bool {
    search.is_empty()
        || record
            .name
            .to_lowercase()
            .contains(&search.to_lowercase())
}

/// The records passing [`matches`], in input order.
pub fn filter_records<'a>(
    records: &'a [ToyRecord],
    config: &FilterConfig,
    search: &str,
) -> Vec<&'a ToyRecord> {
    records
        .iter()
        .filter(|record| matches(record, config, search))
        .collect()
}
