use crate::commands::helpers::{add_images, attach_labels, object_path};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{ImageUpload, ToyDraft, ToyLabel};
use crate::storage::ImageStorage;
use crate::store::ToyStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An edit of one toy.
///
/// `draft` replaces every editable column and the label set. Images are only
/// touched when asked: a new primary replaces the old one, `add_images` are
/// appended and `remove_image_urls` are dropped (row and blob).
#[derive(Debug, Clone, Default)]
pub struct ToyUpdate {
    pub draft: ToyDraft,
    pub primary_image: Option<ImageUpload>,
    pub add_images: Vec<ImageUpload>,
    pub remove_image_urls: Vec<String>,
}

impl ToyUpdate {
    pub fn new(draft: ToyDraft) -> Self {
        Self {
            draft,
            ..Default::default()
        }
    }
}

pub fn run<S: ToyStore, I: ImageStorage>(
    store: &mut S,
    storage: &mut I,
    id: &Uuid,
    update: &ToyUpdate,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    update.draft.validate()?;
    let mut toy = store.get_toy(id)?;
    let millis = now.timestamp_millis();
    let mut result = CmdResult::default();

    toy.apply_draft(&update.draft);

    let mut replaced_blob = None;
    let mut uploaded_blob = None;
    if let Some(primary) = &update.primary_image {
        let path = object_path(id, "primary", millis, &primary.file_name);
        storage.upload(&path, &primary.bytes)?;
        replaced_blob = toy
            .primary_image_url
            .as_deref()
            .and_then(|url| storage.path_for_url(url));
        toy.primary_image_url = Some(storage.public_url(&path));
        uploaded_blob = Some(path);
    }

    if let Err(e) = store.update_toy(&toy) {
        if let Some(path) = uploaded_blob {
            if let Err(cleanup) = storage.remove(&[path]) {
                log::warn!("could not remove new primary image of {}: {}", id, cleanup);
            }
        }
        return Err(e);
    }

    if let Some(old) = replaced_blob {
        if let Err(e) = storage.remove(&[old]) {
            log::warn!("could not remove replaced primary image of {}: {}", id, e);
        }
    }

    if !update.remove_image_urls.is_empty() {
        let images = store.images_for(id)?;
        for url in &update.remove_image_urls {
            let Some(image) = images.iter().find(|img| img.image_url == *url) else {
                result.add_message(CmdMessage::warning(format!(
                    "Image not attached to this toy: {}",
                    url
                )));
                continue;
            };
            store.delete_image(&image.id)?;
            if let Some(path) = storage.path_for_url(url) {
                if let Err(e) = storage.remove(&[path]) {
                    log::warn!("could not remove image blob {}: {}", url, e);
                }
            }
        }
    }

    add_images(store, storage, id, &update.add_images, millis + 1, &mut result);

    let wanted = update.draft.label_names();
    for label in store.labels_for(id)? {
        if !wanted.contains(&label.name) {
            store.unlink_label(ToyLabel {
                toy_id: *id,
                label_id: label.id,
            })?;
        }
    }
    attach_labels(store, id, &wanted)?;

    log::info!("updated toy {} ({})", toy.name, toy.id);
    result.add_message(CmdMessage::success(format!("Toy updated: {}", toy.name)));
    result.affected_toys.push(toy);
    Ok(result)
}
