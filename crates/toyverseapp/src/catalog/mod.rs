//! # Catalog Pipeline
//!
//! Everything the collection page derives from the in-memory list of toys:
//!
//! ```text
//!   records ──┬─► filter (search + FilterConfig) ──► sort (SortBy) ──► display list
//!             ├─► stats   (unfiltered)
//!             └─► facets  (unfiltered)
//!   FilterConfig ──► active filter count
//! ```
//!
//! All functions here are pure and synchronous. They borrow the records and
//! never modify them; the caller re-runs [`CatalogView::compute`] whenever the
//! records, the search text, or the filter configuration change.
//!
//! ## Modules
//!
//! - [`schema`]: the single registry of filter keys shared by the predicate and the counter
//! - [`filter`]: [`FilterConfig`] and the record predicate
//! - [`sort`]: [`SortBy`] and the stable comparator
//! - [`stats`]: collection totals
//! - [`facets`]: dropdown values

pub mod facets;
pub mod filter;
pub mod schema;
pub mod sort;
pub mod stats;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ToyRecord;

pub use facets::{extract_facets, unique_values, Facets};
pub use filter::{filter_records, matches, DateRange, FilterConfig};
pub use schema::{active_filter_count, get_field, Category, FilterField, FilterKind, FILTER_FIELDS};
pub use sort::{sort_records, ParseSortError, SortBy};
pub use stats::{compute_stats, CatalogStats};

/// Everything the collection page shows, derived in one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    /// Filtered and sorted.
    pub toys: Vec<ToyRecord>,
    pub stats: CatalogStats,
    pub facets: Facets,
    pub active_filters: usize,
}

impl CatalogView {
    pub fn compute(
        records: &[ToyRecord],
        config: &FilterConfig,
        search: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let mut visible = filter_records(records, config, search);
        sort_records(&mut visible, config.sort_by);
        log::debug!(
            "catalog view: {} of {} records visible (sort: {})",
            visible.len(),
            records.len(),
            config.sort_by
        );

        Self {
            toys: visible.into_iter().cloned().collect(),
            stats: compute_stats(records, now),
            facets: extract_facets(records),
            active_filters: active_filter_count(config),
        }
    }
}
