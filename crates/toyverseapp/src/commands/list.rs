use crate::catalog::{CatalogView, FilterConfig};
use crate::commands::helpers::load_records;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::ToyStore;
use chrono::{DateTime, Utc};

pub fn run<S: ToyStore>(
    store: &S,
    config: &FilterConfig,
    search: &str,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let records = load_records(store)?;
    let view = CatalogView::compute(&records, config, search, now);

    let mut result = CmdResult::default();
    if records.is_empty() {
        result.add_message(CmdMessage::info("Your collection is empty."));
    } else if view.toys.is_empty() {
        result.add_message(CmdMessage::info("No toys match the current filters."));
    }
    Ok(result.with_catalog(view))
}
