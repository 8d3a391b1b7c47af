use super::Tables;
use crate::error::Result;

/// Abstract interface for raw table I/O.
///
/// This trait handles the "where" of storage (file vs memory), while
/// `TableStore` handles the "what" (keys, not-found errors, link rules).
pub trait TableBackend {
    /// Load the current snapshot. A backend with nothing saved yet returns empty tables.
    fn load_tables(&self) -> Result<Tables>;

    /// Replace the snapshot.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_tables(&self, tables: &Tables) -> Result<()>;
}
