use super::json_backend::JsonBackend;
use super::table_store::TableStore;
use std::path::PathBuf;

/// Catalog tables persisted to a single JSON file.
pub type FileStore = TableStore<JsonBackend>;

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        TableStore::with_backend(JsonBackend::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Label, Toy, ToyDraft, ToyImage, ToyLabel};
    use crate::store::ToyStore;
    use chrono::Utc;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("toys.json"));
        assert!(store.list_toys().unwrap().is_empty());
        assert!(store.list_labels().unwrap().is_empty());
    }

    #[test]
    fn test_rows_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("toys.json");

        let toy = Toy::from_draft(&ToyDraft::new("Goku", "figure"), Utc::now());
        let label = Label::new("anime");
        {
            let mut store = FileStore::open(&path);
            store.insert_toy(&toy).unwrap();
            store
                .insert_image(&ToyImage::new(toy.id, "file:///a.png"))
                .unwrap();
            store.insert_label(&label).unwrap();
            store
                .link_label(ToyLabel {
                    toy_id: toy.id,
                    label_id: label.id,
                })
                .unwrap();
        }

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_toy(&toy.id).unwrap(), toy);
        assert_eq!(reopened.images_for(&toy.id).unwrap().len(), 1);
        assert_eq!(reopened.labels_for(&toy.id).unwrap(), vec![label]);
    }

    #[test]
    fn test_no_tmp_files_left_behind() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("toys.json"));
        store
            .insert_toy(&Toy::from_draft(&ToyDraft::new("Goku", "figure"), Utc::now()))
            .unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["toys.json".to_string()]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toys.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.list_toys().is_err());
    }
}
