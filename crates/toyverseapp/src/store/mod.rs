//! # Data Layer
//!
//! The hosted database exposes four tables; this module mirrors them and hides
//! where they live behind the [`ToyStore`] trait.
//!
//! | table | row type | key |
//! |-------|----------|-----|
//! | `toys` | [`Toy`] | `id` |
//! | `toy_images` | [`ToyImage`] | `id`, belongs to a toy |
//! | `labels` | [`Label`] | `id`, unique `name` |
//! | `toy_labels` | [`ToyLabel`] | (`toy_id`, `label_id`) |
//!
//! ## Store vs Backend
//!
//! [`table_store::TableStore`] implements the table semantics (not-found errors,
//! duplicate keys, idempotent links) once, on top of a [`backend::TableBackend`]
//! that only knows how to load and save a [`Tables`] snapshot:
//!
//! - [`memory::InMemoryStore`]: `TableStore<MemBackend>`, for tests.
//! - [`fs::FileStore`]: `TableStore<JsonBackend>`, a JSON snapshot of the tables
//!   on disk. The CLI uses it as a local stand-in for the hosted database.
//!
//! Deleting a toy row does not cascade; callers remove image rows and label
//! links first (see `commands::delete`).

use crate::error::{Result, ToyverseError};
use crate::model::{Label, Toy, ToyImage, ToyLabel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod backend;
pub mod fs;
pub mod json_backend;
pub mod mem_backend;
pub mod memory;
pub mod table_store;

/// Abstract interface for the catalog tables.
pub trait ToyStore {
    /// All toy rows, in insertion order.
    fn list_toys(&self) -> Result<Vec<Toy>>;

    fn get_toy(&self, id: &Uuid) -> Result<Toy>;

    /// Insert a new toy row. Fails if the id is taken.
    fn insert_toy(&mut self, toy: &Toy) -> Result<()>;

    /// Replace an existing toy row.
    fn update_toy(&mut self, toy: &Toy) -> Result<()>;

    fn delete_toy(&mut self, id: &Uuid) -> Result<()>;

    fn list_images(&self) -> Result<Vec<ToyImage>>;

    /// Additional images of one toy, in insertion order.
    fn images_for(&self, toy_id: &Uuid) -> Result<Vec<ToyImage>> {
        Ok(self
            .list_images()?
            .into_iter()
            .filter(|img| img.toy_id == *toy_id)
            .collect())
    }

    fn insert_image(&mut self, image: &ToyImage) -> Result<()>;

    fn delete_image(&mut self, image_id: &Uuid) -> Result<()>;

    fn list_labels(&self) -> Result<Vec<Label>>;

    fn find_label(&self, name: &str) -> Result<Option<Label>> {
        Ok(self.list_labels()?.into_iter().find(|l| l.name == name))
    }

    /// Insert a new label. Fails if the name is taken.
    fn insert_label(&mut self, label: &Label) -> Result<()>;

    fn list_toy_labels(&self) -> Result<Vec<ToyLabel>>;

    /// Label rows linked to one toy.
    fn labels_for(&self, toy_id: &Uuid) -> Result<Vec<Label>> {
        let links = self.list_toy_labels()?;
        Ok(self
            .list_labels()?
            .into_iter()
            .filter(|label| {
                links
                    .iter()
                    .any(|link| link.toy_id == *toy_id && link.label_id == label.id)
            })
            .collect())
    }

    /// Link a label to a toy. Linking twice is a no-op.
    fn link_label(&mut self, link: ToyLabel) -> Result<()>;

    fn unlink_label(&mut self, link: ToyLabel) -> Result<()>;
}

/// A full snapshot of the four tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub toys: Vec<Toy>,
    #[serde(default)]
    pub toy_images: Vec<ToyImage>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub toy_labels: Vec<ToyLabel>,
}

impl Tables {
    pub fn get_toy(&self, id: &Uuid) -> Result<&Toy> {
        self.toys
            .iter()
            .find(|t| t.id == *id)
            .ok_or(ToyverseError::ToyNotFound(*id))
    }

    pub fn insert_toy(&mut self, toy: &Toy) -> Result<()> {
        if self.toys.iter().any(|t| t.id == toy.id) {
            return Err(ToyverseError::Store(format!(
                "Duplicate toy id: {}",
                toy.id
            )));
        }
        self.toys.push(toy.clone());
        Ok(())
    }

    pub fn update_toy(&mut self, toy: &Toy) -> Result<()> {
        let slot = self
            .toys
            .iter_mut()
            .find(|t| t.id == toy.id)
            .ok_or(ToyverseError::ToyNotFound(toy.id))?;
        *slot = toy.clone();
        Ok(())
    }

    pub fn delete_toy(&mut self, id: &Uuid) -> Result<()> {
        let before = self.toys.len();
        self.toys.retain(|t| t.id != *id);
        if self.toys.len() == before {
            return Err(ToyverseError::ToyNotFound(*id));
        }
        Ok(())
    }

    pub fn insert_image(&mut self, image: &ToyImage) -> Result<()> {
        if !self.toys.iter().any(|t| t.id == image.toy_id) {
            return Err(ToyverseError::ToyNotFound(image.toy_id));
        }
        self.toy_images.push(image.clone());
        Ok(())
    }

    pub fn delete_image(&mut self, image_id: &Uuid) -> Result<()> {
        let before = self.toy_images.len();
        self.toy_images.retain(|img| img.id != *image_id);
        if self.toy_images.len() == before {
            return Err(ToyverseError::Store(format!(
                "Image not found: {}",
                image_id
            )));
        }
        Ok(())
    }

    pub fn insert_label(&mut self, label: &Label) -> Result<()> {
        if self.labels.iter().any(|l| l.name == label.name) {
            return Err(ToyverseError::Store(format!(
                "Label already exists: {}",
                label.name
            )));
        }
        self.labels.push(label.clone());
        Ok(())
    }

    pub fn link_label(&mut self, link: ToyLabel) -> Result<()> {
        if !self.toys.iter().any(|t| t.id == link.toy_id) {
            return Err(ToyverseError::ToyNotFound(link.toy_id));
        }
        if !self.labels.iter().any(|l| l.id == link.label_id) {
            return Err(ToyverseError::Store(format!(
                "Label not found: {}",
                link.label_id
            )));
        }
        if !self.toy_labels.contains(&link) {
            self.toy_labels.push(link);
        }
        Ok(())
    }

    pub fn unlink_label(&mut self, link: ToyLabel) -> Result<()> {
        self.toy_labels.retain(|l| *l != link);
        Ok(())
    }
}
