use crate::commands::CmdResult;
use crate::error::Result;
use crate::storage::{ImageStorage, StorageUsage};
use crate::store::ToyStore;
use serde::Serialize;

/// Row counts per table and bucket size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub toys: usize,
    pub toy_images: usize,
    pub labels: usize,
    pub toy_labels: usize,
    pub storage: StorageUsage,
}

pub fn run<S: ToyStore, I: ImageStorage>(store: &S, storage: &I) -> Result<CmdResult> {
    let report = UsageReport {
        toys: store.list_toys()?.len(),
        toy_images: store.list_images()?.len(),
        labels: store.list_labels()?.len(),
        toy_labels: store.list_toy_labels()?.len(),
        storage: storage.usage()?,
    };
    Ok(CmdResult::default().with_usage(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::model::{ImageUpload, ToyDraft};
    use crate::storage::MemStorage;
    use crate::store::memory::InMemoryStore;
    use chrono::Utc;

    #[test]
    fn test_usage_counts_rows_and_bytes() {
        let mut store = InMemoryStore::new();
        let mut storage = MemStorage::new();
        let mut draft = ToyDraft::new("Goku", "figure");
        draft.labels = vec!["anime".into(), "rare".into()];
        create::run(
            &mut store,
            &mut storage,
            &draft,
            Some(&ImageUpload::new("a.png", vec![0; 10])),
            &[ImageUpload::new("b.png", vec![0; 5])],
            Utc::now(),
        )
        .unwrap();

        let report = run(&store, &storage).unwrap().usage.unwrap();
        assert_eq!(
            report,
            UsageReport {
                toys: 1,
                toy_images: 1,
                labels: 2,
                toy_labels: 2,
                storage: StorageUsage {
                    objects: 2,
                    bytes: 15
                },
            }
        );
    }

    #[test]
    fn test_usage_of_empty_catalog() {
        let report = run(&InMemoryStore::new(), &MemStorage::new())
            .unwrap()
            .usage
            .unwrap();
        assert_eq!(report, UsageReport::default());
    }
}
