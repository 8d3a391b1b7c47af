use crate::commands::helpers::blob_paths;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::storage::ImageStorage;
use crate::store::ToyStore;
use uuid::Uuid;

/// Removes a toy: image rows, label links, the row itself, then its blobs.
///
/// Blobs go last; if removing them fails the toy is already gone and the
/// failure is reported as a warning.
pub fn run<S: ToyStore, I: ImageStorage>(
    store: &mut S,
    storage: &mut I,
    id: &Uuid,
) -> Result<CmdResult> {
    let toy = store.get_toy(id)?;
    let paths = blob_paths(store, storage, id, toy.primary_image_url.as_deref())?;

    for image in store.images_for(id)? {
        store.delete_image(&image.id)?;
    }
    for link in store.list_toy_labels()? {
        if link.toy_id == *id {
            store.unlink_label(link)?;
        }
    }
    store.delete_toy(id)?;

    let mut result = CmdResult::default();
    if let Err(e) = storage.remove(&paths) {
        log::warn!("could not remove images of {}: {}", id, e);
        result.add_message(CmdMessage::warning(format!(
            "Toy deleted but its images could not be removed: {}",
            e
        )));
    }

    log::info!("deleted toy {} ({})", toy.name, toy.id);
    result.add_message(CmdMessage::success(format!("Toy deleted: {}", toy.name)));
    result.affected_toys.push(toy);
    Ok(result)
}
