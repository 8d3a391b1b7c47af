use crate::commands::helpers::{add_images, attach_labels, object_path};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ToyverseError};
use crate::model::{ImageUpload, Toy, ToyDraft};
use crate::storage::{sanitize_file_name, ImageStorage};
use crate::store::ToyStore;
use chrono::{DateTime, Utc};

/// Creates a toy row with its primary image, additional images and labels.
///
/// The primary image is uploaded under `temp/` first because the toy id does
/// not exist yet, then moved next to the toy once the row is in.
pub fn run<S: ToyStore, I: ImageStorage>(
    store: &mut S,
    storage: &mut I,
    draft: &ToyDraft,
    primary: Option<&ImageUpload>,
    additional: &[ImageUpload],
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    draft.validate()?;
    let primary =
        primary.ok_or_else(|| ToyverseError::Validation("Primary image is required".into()))?;

    let millis = now.timestamp_millis();
    let temp_path = format!("temp/{}-{}", millis, sanitize_file_name(&primary.file_name));
    storage.upload(&temp_path, &primary.bytes)?;

    let mut toy = Toy::from_draft(draft, now);
    toy.primary_image_url = Some(storage.public_url(&temp_path));
    if let Err(e) = store.insert_toy(&toy) {
        if let Err(cleanup) = storage.remove(&[temp_path]) {
            log::warn!("could not remove temporary upload: {}", cleanup);
        }
        return Err(e);
    }

    let mut result = CmdResult::default();

    let final_path = object_path(&toy.id, "primary", millis, &primary.file_name);
    match storage.move_object(&temp_path, &final_path) {
        Ok(()) => {
            let temp_url = toy.primary_image_url.replace(storage.public_url(&final_path));
            if let Err(e) = store.update_toy(&toy) {
                // The row still points at temp/
                storage.move_object(&final_path, &temp_path)?;
                toy.primary_image_url = temp_url;
                log::warn!("primary image of {} left at {}: {}", toy.id, temp_path, e);
                result.add_message(CmdMessage::warning(format!(
                    "Primary image kept at its temporary location: {}",
                    e
                )));
            }
        }
        Err(e) => {
            log::warn!("primary image of {} left at {}: {}", toy.id, temp_path, e);
            result.add_message(CmdMessage::warning(format!(
                "Primary image kept at its temporary location: {}",
                e
            )));
        }
    }

    add_images(store, storage, &toy.id, additional, millis + 1, &mut result);
    attach_labels(store, &toy.id, &draft.label_names())?;

    log::info!("created toy {} ({})", toy.name, toy.id);
    result.add_message(CmdMessage::success(format!("Toy created: {}", toy.name)));
    result.affected_toys.push(toy);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::load_records;
    use crate::storage::MemStorage;
    use crate::store::memory::fixtures::RejectingUpdates;
    use crate::store::memory::InMemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn goku() -> ToyDraft {
        let mut draft = ToyDraft::new("Goku", "figure");
        draft.price = Some("19.99".into());
        draft.labels = vec!["anime".into(), " rare ".into(), "anime".into()];
        draft
    }

    fn photo(name: &str) -> ImageUpload {
        ImageUpload::new(name, vec![1, 2, 3])
    }

    #[test]
    fn test_create_moves_primary_next_to_toy() {
        let mut store = InMemoryStore::new();
        let mut storage = MemStorage::new();

        let result = run(&mut store, &mut storage, &goku(), Some(&photo("front.png")), &[], now())
            .unwrap();
        let toy = &result.affected_toys[0];

        let expected = format!("{}/primary-{}-front.png", toy.id, now().timestamp_millis());
        assert_eq!(storage.paths(), vec![expected.clone()]);
        assert_eq!(
            toy.primary_image_url.as_deref(),
            Some(storage.public_url(&expected).as_str())
        );
        assert_eq!(store.get_toy(&toy.id).unwrap(), *toy);
        assert_eq!(result.warnings().count(), 0);
    }

    #[test]
    fn test_create_requires_primary_image() {
        let mut store = InMemoryStore::new();
        let mut storage = MemStorage::new();

        let err = run(&mut store, &mut storage, &goku(), None, &[], now()).unwrap_err();
        assert!(matches!(err, ToyverseError::Validation(_)));
        assert!(store.list_toys().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_draft_before_upload() {
        let mut store = InMemoryStore::new();
        let mut storage = MemStorage::new();

        let draft = ToyDraft::new("", "figure");
        assert!(run(&mut store, &mut storage, &draft, Some(&photo("a.png")), &[], now()).is_err());
        assert!(storage.paths().is_empty());
    }

    #[test]
    fn test_failed_primary_upload_aborts() {
        let mut store = InMemoryStore::new();
        let mut storage = MemStorage::new();
        storage.set_fail_uploads(true);

        let err = run(&mut store, &mut storage, &goku(), Some(&photo("a.png")), &[], now())
            .unwrap_err();
        assert!(matches!(err, ToyverseError::Storage(_)));
        assert!(store.list_toys().unwrap().is_empty());
    }

    #[test]
    fn test_failed_insert_removes_temp_upload() {
        let mut store = InMemoryStore::new();
        store.backend.set_simulate_write_error(true);
        let mut storage = MemStorage::new();

        assert!(run(&mut store, &mut storage, &goku(), Some(&photo("a.png")), &[], now()).is_err());
        assert!(storage.paths().is_empty());
    }

    #[test]
    fn test_failed_move_keeps_temp_url_and_warns() {
        let mut store = InMemoryStore::new();
        let mut storage = MemStorage::new();
        storage.set_fail_moves(true);

        let result = run(&mut store, &mut storage, &goku(), Some(&photo("a.png")), &[], now())
            .unwrap();
        let toy = &result.affected_toys[0];

        let temp = format!("temp/{}-a.png", now().timestamp_millis());
        assert_eq!(
            toy.primary_image_url.as_deref(),
            Some(storage.public_url(&temp).as_str())
        );
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_failed_row_update_moves_primary_back_to_temp() {
        let mut store = RejectingUpdates::default();
        let mut storage = MemStorage::new();

        let result = run(&mut store, &mut storage, &goku(), Some(&photo("a.png")), &[], now())
            .unwrap();
        let toy = &result.affected_toys[0];

        let temp = format!("temp/{}-a.png", now().timestamp_millis());
        let stored = store.get_toy(&toy.id).unwrap();
        assert_eq!(stored.primary_image_url, toy.primary_image_url);
        assert_eq!(
            stored.primary_image_url.as_deref(),
            Some(storage.public_url(&temp).as_str())
        );
        assert_eq!(storage.paths(), vec![temp]);
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_create_attaches_additional_images_and_labels() {
        let mut store = InMemoryStore::new();
        let mut storage = MemStorage::new();

        let result = run(
            &mut store,
            &mut storage,
            &goku(),
            Some(&photo("front.png")),
            &[photo("back.png"), photo("side.png")],
            now(),
        )
        .unwrap();
        let id = result.affected_toys[0].id;

        let records = load_records(&store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].additional_images.len(), 2);
        assert_eq!(
            records[0].tags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["anime", "rare"]
        );
        assert_eq!(storage.paths().len(), 3);
        assert!(storage.paths().iter().all(|p| p.starts_with(&id.to_string())));
    }
}
