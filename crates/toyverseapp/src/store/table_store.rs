use super::backend::TableBackend;
use super::{Tables, ToyStore};
use crate::error::Result;
use crate::model::{Label, Toy, ToyImage, ToyLabel};
use uuid::Uuid;

pub struct TableStore<B: TableBackend> {
    /// The underlying table backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: TableBackend> TableStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load, modify, save. Nothing is saved if `change` fails.
    fn write<T>(&mut self, change: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self.backend.load_tables()?;
        let out = change(&mut tables)?;
        self.backend.save_tables(&tables)?;
        Ok(out)
    }
}

impl<B: TableBackend> ToyStore for TableStore<B> {
    fn list_toys(&self) -> Result<Vec<Toy>> {
        Ok(self.backend.load_tables()?.toys)
    }

    fn get_toy(&self, id: &Uuid) -> Result<Toy> {
        self.backend.load_tables()?.get_toy(id).cloned()
    }

    fn insert_toy(&mut self, toy: &Toy) -> Result<()> {
        self.write(|t| t.insert_toy(toy))
    }

    fn update_toy(&mut self, toy: &Toy) -> Result<()> {
        self.write(|t| t.update_toy(toy))
    }

    fn delete_toy(&mut self, id: &Uuid) -> Result<()> {
        self.write(|t| t.delete_toy(id))
    }

    fn list_images(&self) -> Result<Vec<ToyImage>> {
        Ok(self.backend.load_tables()?.toy_images)
    }

    fn insert_image(&mut self, image: &ToyImage) -> Result<()> {
        self.write(|t| t.insert_image(image))
    }

    fn delete_image(&mut self, image_id: &Uuid) -> Result<()> {
        self.write(|t| t.delete_image(image_id))
    }

    fn list_labels(&self) -> Result<Vec<Label>> {
        Ok(self.backend.load_tables()?.labels)
    }

    fn insert_label(&mut self, label: &Label) -> Result<()> {
        self.write(|t| t.insert_label(label))
    }

    fn list_toy_labels(&self) -> Result<Vec<ToyLabel>> {
        Ok(self.backend.load_tables()?.toy_labels)
    }

    fn link_label(&mut self, link: ToyLabel) -> Result<()> {
        self.write(|t| t.link_label(link))
    }

    fn unlink_label(&mut self, link: ToyLabel) -> Result<()> {
        self.write(|t| t.unlink_label(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToyverseError;
    use crate::model::ToyDraft;
    use crate::store::mem_backend::MemBackend;
    use chrono::Utc;

    fn make_store() -> TableStore<MemBackend> {
        TableStore::with_backend(MemBackend::new())
    }

    fn toy(name: &str) -> Toy {
        Toy::from_draft(&ToyDraft::new(name, "figure"), Utc::now())
    }

    #[test]
    fn test_insert_and_get_toy() {
        let mut store = make_store();
        let goku = toy("Goku");
        store.insert_toy(&goku).unwrap();

        assert_eq!(store.get_toy(&goku.id).unwrap(), goku);
        assert_eq!(store.list_toys().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let mut store = make_store();
        let goku = toy("Goku");
        store.insert_toy(&goku).unwrap();
        assert!(matches!(
            store.insert_toy(&goku),
            Err(ToyverseError::Store(_))
        ));
    }

    #[test]
    fn test_get_nonexistent_toy_returns_error() {
        let store = make_store();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.get_toy(&id),
            Err(ToyverseError::ToyNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_update_and_delete_unknown_toy_fail() {
        let mut store = make_store();
        let ghost = toy("Ghost");
        assert!(store.update_toy(&ghost).is_err());
        assert!(store.delete_toy(&ghost.id).is_err());
    }

    #[test]
    fn test_update_replaces_row() {
        let mut store = make_store();
        let mut goku = toy("Goku");
        store.insert_toy(&goku).unwrap();

        goku.name = "Son Goku".into();
        store.update_toy(&goku).unwrap();
        assert_eq!(store.get_toy(&goku.id).unwrap().name, "Son Goku");
    }

    #[test]
    fn test_images_belong_to_existing_toys() {
        let mut store = make_store();
        let goku = toy("Goku");
        store.insert_toy(&goku).unwrap();

        let image = ToyImage::new(goku.id, "http://img/a.png");
        store.insert_image(&image).unwrap();
        assert_eq!(store.images_for(&goku.id).unwrap(), vec![image.clone()]);

        let orphan = ToyImage::new(Uuid::new_v4(), "http://img/b.png");
        assert!(store.insert_image(&orphan).is_err());

        store.delete_image(&image.id).unwrap();
        assert!(store.images_for(&goku.id).unwrap().is_empty());
        assert!(store.delete_image(&image.id).is_err());
    }

    #[test]
    fn test_label_names_are_unique_and_links_idempotent() {
        let mut store = make_store();
        let goku = toy("Goku");
        store.insert_toy(&goku).unwrap();

        let anime = Label::new("anime");
        store.insert_label(&anime).unwrap();
        assert!(store.insert_label(&Label::new("anime")).is_err());
        assert_eq!(store.find_label("anime").unwrap(), Some(anime.clone()));
        assert_eq!(store.find_label("manga").unwrap(), None);

        let link = ToyLabel {
            toy_id: goku.id,
            label_id: anime.id,
        };
        store.link_label(link).unwrap();
        store.link_label(link).unwrap();
        assert_eq!(store.list_toy_labels().unwrap().len(), 1);
        assert_eq!(store.labels_for(&goku.id).unwrap(), vec![anime]);

        store.unlink_label(link).unwrap();
        assert!(store.labels_for(&goku.id).unwrap().is_empty());
    }

    #[test]
    fn test_save_fails_on_write_error() {
        let mut store = make_store();
        store.backend.set_simulate_write_error(true);
        assert!(store.insert_toy(&toy("Goku")).is_err());

        store.backend.set_simulate_write_error(false);
        assert!(store.list_toys().unwrap().is_empty());
    }
}
