use crate::auth::{AuthProvider, User};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ToyverseError};
use crate::model::{ImageUpload, Label, ToyImage, ToyLabel, ToyRecord};
use crate::storage::{sanitize_file_name, ImageStorage};
use crate::store::ToyStore;
use std::collections::HashMap;
use uuid::Uuid;

/// Loads every toy joined with its image rows and label names, newest first.
pub fn load_records<S: ToyStore>(store: &S) -> Result<Vec<ToyRecord>> {
    let toys = store.list_toys()?;
    let images = store.list_images()?;
    let labels: HashMap<Uuid, String> = store
        .list_labels()?
        .into_iter()
        .map(|l| (l.id, l.name))
        .collect();
    let links = store.list_toy_labels()?;

    let mut records: Vec<ToyRecord> = toys
        .iter()
        .map(|toy| {
            let additional = images
                .iter()
                .filter(|img| img.toy_id == toy.id)
                .map(|img| img.image_url.clone())
                .collect();
            let tags = links
                .iter()
                .filter(|link| link.toy_id == toy.id)
                .filter_map(|link| labels.get(&link.label_id).cloned());
            ToyRecord::from_row(toy, additional, tags)
        })
        .collect();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

/// The signed-in user, or an `Auth` error naming the action.
pub fn require_user<A: AuthProvider>(auth: &A, action: &str) -> Result<User> {
    auth.current_user()
        .cloned()
        .ok_or_else(|| ToyverseError::Auth(format!("You must be signed in to {}", action)))
}

/// `{toy_id}/{kind}-{millis}-{file}`
pub fn object_path(toy_id: &Uuid, kind: &str, millis: i64, file_name: &str) -> String {
    format!(
        "{}/{}-{}-{}",
        toy_id,
        kind,
        millis,
        sanitize_file_name(file_name)
    )
}

/// Uploads additional images and records a `toy_images` row for each.
///
/// A failed upload or row insert is reported as a warning and skipped.
/// Each upload gets its own stamp, starting at `millis` and counting up.
pub fn add_images<S: ToyStore, I: ImageStorage>(
    store: &mut S,
    storage: &mut I,
    toy_id: &Uuid,
    uploads: &[ImageUpload],
    millis: i64,
    result: &mut CmdResult,
) -> Vec<ToyImage> {
    let mut added = Vec::new();
    for (offset, upload) in uploads.iter().enumerate() {
        let path = object_path(toy_id, "additional", millis + offset as i64, &upload.file_name);
        if let Err(e) = storage.upload(&path, &upload.bytes) {
            log::warn!("skipping additional image {}: {}", upload.file_name, e);
            result.add_message(CmdMessage::warning(format!(
                "Could not upload {}: {}",
                upload.file_name, e
            )));
            continue;
        }

        let image = ToyImage::new(*toy_id, storage.public_url(&path));
        if let Err(e) = store.insert_image(&image) {
            log::warn!("skipping additional image {}: {}", upload.file_name, e);
            if let Err(cleanup) = storage.remove(&[path]) {
                log::warn!("could not remove orphaned upload: {}", cleanup);
            }
            result.add_message(CmdMessage::warning(format!(
                "Could not save {}: {}",
                upload.file_name, e
            )));
            continue;
        }
        added.push(image);
    }
    added
}

/// Links each named label to the toy, creating labels that do not exist yet.
pub fn attach_labels<S: ToyStore>(
    store: &mut S,
    toy_id: &Uuid,
    names: &[String],
) -> Result<Vec<Label>> {
    let mut attached = Vec::with_capacity(names.len());
    for name in names {
        let label = match store.find_label(name)? {
            Some(existing) => existing,
            None => {
                let label = Label::new(name.as_str());
                store.insert_label(&label)?;
                log::debug!("created label '{}'", name);
                label
            }
        };
        store.link_label(ToyLabel {
            toy_id: *toy_id,
            label_id: label.id,
        })?;
        attached.push(label);
    }
    Ok(attached)
}

/// Storage paths of every blob a toy references: primary first, then additional.
pub fn blob_paths<S: ToyStore, I: ImageStorage>(
    store: &S,
    storage: &I,
    toy_id: &Uuid,
    primary_url: Option<&str>,
) -> Result<Vec<String>> {
    let mut paths: Vec<String> = primary_url
        .and_then(|url| storage.path_for_url(url))
        .into_iter()
        .collect();
    paths.extend(
        store
            .images_for(toy_id)?
            .iter()
            .filter_map(|img| storage.path_for_url(&img.image_url)),
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LocalAuth;
    use crate::storage::MemStorage;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn test_load_records_joins_and_orders_newest_first() {
        let fixture = StoreFixture::new()
            .with_toy("Batman", "figure", "")
            .with_labeled_toy("Goku", &["anime", "rare"])
            .with_pictured_toy("Pikachu", "http://img/p.png", &["http://img/p2.png"]);

        let records = load_records(&fixture.store).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Pikachu", "Goku", "Batman"]);

        assert_eq!(records[0].image.as_deref(), Some("http://img/p.png"));
        assert_eq!(records[0].additional_images, vec!["http://img/p2.png"]);
        assert_eq!(
            records[1].tags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["anime", "rare"]
        );
        assert_eq!(records[2].price, None);
    }

    #[test]
    fn test_require_user() {
        let mut auth = LocalAuth::new().with_account("me@example.com", "pw");
        assert!(matches!(
            require_user(&auth, "delete toys"),
            Err(ToyverseError::Auth(msg)) if msg.contains("delete toys")
        ));

        auth.sign_in("me@example.com", "pw").unwrap();
        assert_eq!(require_user(&auth, "delete toys").unwrap().email, "me@example.com");
    }

    #[test]
    fn test_object_path() {
        let id = Uuid::nil();
        assert_eq!(
            object_path(&id, "primary", 1700000000000, "my goku.png"),
            format!("{}/primary-1700000000000-my_goku.png", id)
        );
    }

    #[test]
    fn test_attach_labels_reuses_existing() {
        let mut fixture = StoreFixture::new()
            .with_labeled_toy("Goku", &["anime"])
            .with_toy("Vegeta", "figure", "");
        let vegeta = fixture.store.list_toys().unwrap()[1].clone();

        attach_labels(
            &mut fixture.store,
            &vegeta.id,
            &["anime".to_string(), "saiyan".to_string()],
        )
        .unwrap();

        assert_eq!(fixture.store.list_labels().unwrap().len(), 2);
        assert_eq!(fixture.store.labels_for(&vegeta.id).unwrap().len(), 2);
    }

    #[test]
    fn test_add_images_skips_failed_uploads() {
        let mut fixture = StoreFixture::new().with_toy("Goku", "figure", "");
        let goku = fixture.store.list_toys().unwrap()[0].clone();
        let mut storage = MemStorage::new();
        storage.set_fail_uploads(true);

        let mut result = CmdResult::default();
        let added = add_images(
            &mut fixture.store,
            &mut storage,
            &goku.id,
            &[ImageUpload::new("a.png", vec![1])],
            1,
            &mut result,
        );

        assert!(added.is_empty());
        assert_eq!(result.warnings().count(), 1);
        assert!(fixture.store.images_for(&goku.id).unwrap().is_empty());
    }

    #[test]
    fn test_add_images_stamps_are_distinct() {
        let mut store = InMemoryStore::new();
        let toy = crate::model::Toy::from_draft(
            &crate::model::ToyDraft::new("Goku", "figure"),
            chrono::Utc::now(),
        );
        store.insert_toy(&toy).unwrap();
        let mut storage = MemStorage::new();

        let mut result = CmdResult::default();
        let added = add_images(
            &mut store,
            &mut storage,
            &toy.id,
            &[
                ImageUpload::new("a.png", vec![1]),
                ImageUpload::new("a.png", vec![2]),
            ],
            100,
            &mut result,
        );

        assert_eq!(added.len(), 2);
        assert_eq!(storage.paths().len(), 2);
    }
}
