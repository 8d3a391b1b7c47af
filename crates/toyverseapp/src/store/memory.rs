use super::mem_backend::MemBackend;
use super::table_store::TableStore;

pub type InMemoryStore = TableStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        TableStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::error::{Result, ToyverseError};
    use crate::model::{Label, Toy, ToyDraft, ToyImage, ToyLabel};
    use crate::store::ToyStore;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        /// Rows are created one day apart starting here so ordering is deterministic.
        next_created: chrono::DateTime<Utc>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                next_created: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            }
        }

        fn insert(&mut self, draft: &ToyDraft) -> Toy {
            let toy = Toy::from_draft(draft, self.next_created);
            self.next_created += Duration::days(1);
            self.store.insert_toy(&toy).unwrap();
            toy
        }

        pub fn with_toys(mut self, count: usize, toy_type: &str) -> Self {
            for i in 0..count {
                self.insert(&ToyDraft::new(format!("Test Toy {}", i + 1), toy_type));
            }
            self
        }

        pub fn with_toy(mut self, name: &str, toy_type: &str, price: &str) -> Self {
            let mut draft = ToyDraft::new(name, toy_type);
            draft.price = Some(price.to_string());
            self.insert(&draft);
            self
        }

        pub fn with_pictured_toy(mut self, name: &str, primary: &str, additional: &[&str]) -> Self {
            let mut toy = self.insert(&ToyDraft::new(name, "figure"));
            toy.primary_image_url = Some(primary.to_string());
            self.store.update_toy(&toy).unwrap();
            for url in additional {
                self.store.insert_image(&ToyImage::new(toy.id, *url)).unwrap();
            }
            self
        }

        pub fn with_labeled_toy(mut self, name: &str, labels: &[&str]) -> Self {
            let toy = self.insert(&ToyDraft::new(name, "figure"));
            for name in labels {
                let label = match self.store.find_label(name).unwrap() {
                    Some(existing) => existing,
                    None => {
                        let label = Label::new(*name);
                        self.store.insert_label(&label).unwrap();
                        label
                    }
                };
                self.store
                    .link_label(ToyLabel {
                        toy_id: toy.id,
                        label_id: label.id,
                    })
                    .unwrap();
            }
            self
        }
    }

    /// Wraps an [`InMemoryStore`] and fails every `update_toy`, leaving the
    /// other tables writable.
    #[derive(Default)]
    pub struct RejectingUpdates(pub InMemoryStore);

    impl ToyStore for RejectingUpdates {
        fn list_toys(&self) -> Result<Vec<Toy>> {
            self.0.list_toys()
        }

        fn get_toy(&self, id: &Uuid) -> Result<Toy> {
            self.0.get_toy(id)
        }

        fn insert_toy(&mut self, toy: &Toy) -> Result<()> {
            self.0.insert_toy(toy)
        }

        fn update_toy(&mut self, _toy: &Toy) -> Result<()> {
            Err(ToyverseError::Store("Simulated update error".into()))
        }

        fn delete_toy(&mut self, id: &Uuid) -> Result<()> {
            self.0.delete_toy(id)
        }

        fn list_images(&self) -> Result<Vec<ToyImage>> {
            self.0.list_images()
        }

        fn insert_image(&mut self, image: &ToyImage) -> Result<()> {
            self.0.insert_image(image)
        }

        fn delete_image(&mut self, image_id: &Uuid) -> Result<()> {
            self.0.delete_image(image_id)
        }

        fn list_labels(&self) -> Result<Vec<Label>> {
            self.0.list_labels()
        }

        fn insert_label(&mut self, label: &Label) -> Result<()> {
            self.0.insert_label(label)
        }

        fn list_toy_labels(&self) -> Result<Vec<ToyLabel>> {
            self.0.list_toy_labels()
        }

        fn link_label(&mut self, link: ToyLabel) -> Result<()> {
            self.0.link_label(link)
        }

        fn unlink_label(&mut self, link: ToyLabel) -> Result<()> {
            self.0.unlink_label(link)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use crate::store::ToyStore;

    #[test]
    fn test_fixture_builds_rows_in_order() {
        let fixture = StoreFixture::new()
            .with_toys(2, "plush")
            .with_toy("Goku", "figure", "19.99");
        let toys = fixture.store.list_toys().unwrap();

        assert_eq!(toys.len(), 3);
        assert_eq!(toys[2].name, "Goku");
        assert!(toys[0].created_at < toys[1].created_at);
    }

    #[test]
    fn test_fixture_links_shared_labels_once() {
        let fixture = StoreFixture::new()
            .with_labeled_toy("Goku", &["anime", "rare"])
            .with_labeled_toy("Vegeta", &["anime"]);

        assert_eq!(fixture.store.list_labels().unwrap().len(), 2);
        assert_eq!(fixture.store.list_toy_labels().unwrap().len(), 3);
    }

    #[test]
    fn test_fixture_pictured_toy() {
        let fixture = StoreFixture::new().with_pictured_toy(
            "Goku",
            "http://img/primary.png",
            &["http://img/a.png", "http://img/b.png"],
        );
        let toys = fixture.store.list_toys().unwrap();
        let toy = &toys[0];

        assert_eq!(toy.primary_image_url.as_deref(), Some("http://img/primary.png"));
        assert_eq!(fixture.store.images_for(&toy.id).unwrap().len(), 2);
    }
}
