use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Toy;
use crate::store::ToyStore;
use serde::Serialize;
use uuid::Uuid;

/// One toy as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyDetail {
    pub toy: Toy,
    /// Sorted label names.
    pub labels: Vec<String>,
    /// Primary image first, then additional images in insertion order.
    pub gallery: Vec<String>,
}

impl ToyDetail {
    pub fn new(toy: Toy, labels: Vec<String>, additional: Vec<String>) -> Self {
        let gallery = toy
            .primary_image_url
            .iter()
            .cloned()
            .chain(additional)
            .filter(|url| !url.trim().is_empty())
            .collect();
        let mut labels = labels;
        labels.sort();
        Self {
            toy,
            labels,
            gallery,
        }
    }
}

pub fn run<S: ToyStore>(store: &S, id: &Uuid) -> Result<CmdResult> {
    let toy = store.get_toy(id)?;
    let labels = store.labels_for(id)?.into_iter().map(|l| l.name).collect();
    let additional = store
        .images_for(id)?
        .into_iter()
        .map(|img| img.image_url)
        .collect();
    Ok(CmdResult::default().with_detail(ToyDetail::new(toy, labels, additional)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToyverseError;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_gallery_starts_with_primary() {
        let fixture = StoreFixture::new().with_pictured_toy(
            "Goku",
            "http://img/front.png",
            &["http://img/back.png", "http://img/side.png"],
        );
        let id = fixture.store.list_toys().unwrap()[0].id;

        let detail = run(&fixture.store, &id).unwrap().detail.unwrap();
        assert_eq!(
            detail.gallery,
            vec![
                "http://img/front.png",
                "http://img/back.png",
                "http://img/side.png"
            ]
        );
    }

    #[test]
    fn test_gallery_skips_blank_urls() {
        let detail = ToyDetail::new(
            crate::model::Toy::from_draft(
                &crate::model::ToyDraft::new("Goku", "figure"),
                chrono::Utc::now(),
            ),
            vec![],
            vec!["".into(), "http://img/a.png".into()],
        );
        assert_eq!(detail.gallery, vec!["http://img/a.png"]);
    }

    #[test]
    fn test_labels_are_sorted() {
        let fixture = StoreFixture::new().with_labeled_toy("Goku", &["rare", "anime"]);
        let id = fixture.store.list_toys().unwrap()[0].id;

        let detail = run(&fixture.store, &id).unwrap().detail.unwrap();
        assert_eq!(detail.labels, vec!["anime", "rare"]);
        assert!(detail.gallery.is_empty());
    }

    #[test]
    fn test_view_unknown_toy() {
        let fixture = StoreFixture::new();
        assert!(matches!(
            run(&fixture.store, &Uuid::new_v4()),
            Err(ToyverseError::ToyNotFound(_))
        ));
    }
}
