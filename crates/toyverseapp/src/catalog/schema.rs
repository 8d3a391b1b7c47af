//! Filter field registry.
//!
//! Each entry of [`FILTER_FIELDS`] names one key of [`FilterConfig`] and knows two
//! things about it: whether the key currently holds a meaningful value
//! ([`FilterField::is_set`]) and whether a record passes it
//! ([`FilterField::admits`]). The predicate evaluator and the active-filter
//! counter both walk this table, so adding a filter means adding one entry here.
//!
//! `sort_by` is not a filter and has no entry.

use super::filter::FilterConfig;
use crate::model::{month_name, ToyRecord};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// The categorical (exact-match) fields of a toy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Type,
    Series,
    Brand,
    Condition,
    ColorVariant,
    PurchaseLocation,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Type,
        Category::Series,
        Category::Brand,
        Category::Condition,
        Category::ColorVariant,
        Category::PurchaseLocation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Type => "type",
            Category::Series => "series",
            Category::Brand => "brand",
            Category::Condition => "condition",
            Category::ColorVariant => "colorVariant",
            Category::PurchaseLocation => "purchaseLocation",
        }
    }

    pub fn of_record<'a>(&self, record: &'a ToyRecord) -> Option<&'a str> {
        let value = match self {
            Category::Type => &record.toy_type,
            Category::Series => &record.series,
            Category::Brand => &record.brand,
            Category::Condition => &record.condition,
            Category::ColorVariant => &record.color_variant,
            Category::PurchaseLocation => &record.purchase_location,
        };
        value.as_deref()
    }

    pub fn of_config<'a>(&self, config: &'a FilterConfig) -> &'a str {
        match self {
            Category::Type => &config.toy_type,
            Category::Series => &config.series,
            Category::Brand => &config.brand,
            Category::Condition => &config.condition,
            Category::ColorVariant => &config.color_variant,
            Category::PurchaseLocation => &config.purchase_location,
        }
    }
}

/// What a filter key constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Exact match on a categorical field.
    Categorical(Category),
    /// Inclusive lower bound on the parsed price.
    MinPrice,
    /// Inclusive upper bound on the parsed price.
    MaxPrice,
    /// Record must carry a primary or additional image.
    HasImages,
    /// Record must share at least one tag with the selection.
    Tags,
    /// Inclusive purchase-date range; constrains only when both bounds are set.
    DateRange,
    /// Exact purchase date.
    SpecificDate,
    /// Purchase month by English name.
    Month,
    /// Purchase year as text.
    Year,
}

/// One key of [`FilterConfig`].
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    /// The key name as the presentation layer spells it.
    pub name: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    const fn new(name: &'static str, kind: FilterKind) -> Self {
        Self { name, kind }
    }

    /// Whether the key holds a meaningful (non-default) value.
    pub fn is_set(&self, config: &FilterConfig) -> bool {
        match self.kind {
            FilterKind::Categorical(category) => !category.of_config(config).is_empty(),
            FilterKind::MinPrice => config.min_price.is_some(),
            FilterKind::MaxPrice => config.max_price.is_some(),
            FilterKind::HasImages => config.has_images,
            FilterKind::Tags => !config.tags.is_empty(),
            FilterKind::DateRange => {
                config.date_range.start_date.is_some() || config.date_range.end_date.is_some()
            }
            FilterKind::SpecificDate => config.specific_date.is_some(),
            FilterKind::Month => !config.month.is_empty(),
            FilterKind::Year => !config.year.is_empty(),
        }
    }

    /// Whether `record` passes this key. Keys that are not set admit everything.
    ///
    /// A record missing the value an active key looks at never passes.
    pub fn admits(&self, record: &ToyRecord, config: &FilterConfig) -> bool {
        if !self.is_set(config) {
            return true;
        }
        match self.kind {
            FilterKind::Categorical(category) => {
                category.of_record(record) == Some(category.of_config(config))
            }
            FilterKind::MinPrice => config
                .min_price
                .map_or(true, |min| record.parsed_price() >= min),
            FilterKind::MaxPrice => config
                .max_price
                .map_or(true, |max| record.parsed_price() <= max),
            FilterKind::HasImages => record.has_images(),
            FilterKind::Tags => config.tags.iter().any(|tag| record.tags.contains(tag)),
            FilterKind::DateRange => {
                let range = &config.date_range;
                match (range.start_date, range.end_date) {
                    (Some(start), Some(end)) => record
                        .purchase_date
                        .is_some_and(|date| start <= date && date <= end),
                    _ => true,
                }
            }
            FilterKind::SpecificDate => record.purchase_date == config.specific_date,
            FilterKind::Month => record
                .purchase_date
                .is_some_and(|date| month_name(date) == config.month),
            FilterKind::Year => record
                .purchase_date
                .is_some_and(|date| date.year().to_string() == config.year),
        }
    }
}

/// Every filter key, in the order the filter panel shows them.
pub const FILTER_FIELDS: &[FilterField] = &[
    FilterField::new("type", FilterKind::Categorical(Category::Type)),
    FilterField::new("series", FilterKind::Categorical(Category::Series)),
    FilterField::new("brand", FilterKind::Categorical(Category::Brand)),
    FilterField::new("condition", FilterKind::Categorical(Category::Condition)),
    FilterField::new(
        "colorVariant",
        FilterKind::Categorical(Category::ColorVariant),
    ),
    FilterField::new(
        "purchaseLocation",
        FilterKind::Categorical(Category::PurchaseLocation),
    ),
    FilterField::new("minPrice", FilterKind::MinPrice),
    FilterField::new("maxPrice", FilterKind::MaxPrice),
    FilterField::new("hasImages", FilterKind::HasImages),
    FilterField::new("tags", FilterKind::Tags),
    FilterField::new("dateRange", FilterKind::DateRange),
    FilterField::new("specificDate", FilterKind::SpecificDate),
    FilterField::new("month", FilterKind::Month),
    FilterField::new("year", FilterKind::Year),
];

/// Look up a filter key by name.
pub fn get_field(name: &str) -> Option<&'static FilterField> {
    FILTER_FIELDS.iter().find(|field| field.name == name)
}

/// Number of keys in `config` holding a meaningful value.
pub fn active_filter_count(config: &FilterConfig) -> usize {
    FILTER_FIELDS
        .iter()
        .filter(|field| field.is_set(config))
        .count()
}
