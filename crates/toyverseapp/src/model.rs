//! # Domain Model
//!
//! Two shapes of the same toy live in this module:
//!
//! - **Rows** ([`Toy`], [`ToyImage`], [`Label`], [`ToyLabel`]): what the data
//!   collaborator stores, one struct per table (`toys`, `toy_images`, `labels`,
//!   `toy_labels`). Field names follow the table columns.
//! - **Records** ([`ToyRecord`]): the read-only, normalized projection that the
//!   catalog pipeline consumes. A record joins a toy row with its additional
//!   image rows and label names, and collapses blank text into `None`.
//!
//! Input for create/edit comes in as a [`ToyDraft`] plus [`ImageUpload`]s.
//!
//! ## Prices
//!
//! Prices are kept as the raw text the user typed (`"19.99"`, `""`, or absent).
//! [`parse_price`] turns the leading number of that text into a value for
//! comparisons and sums; anything absent or unparseable counts as `0`.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::error::{Result, ToyverseError};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Canonical English month name for a date (e.g. "January").
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Parses the leading number of a raw price, so `"19.99 USD"` is `19.99` and
/// `"1,299"` is `1`. Absent, blank, non-numeric or non-finite input yields `0.0`.
pub fn parse_price(raw: Option<&str>) -> f64 {
    raw.and_then(|s| numeric_prefix(s.trim_start()).parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix of the form `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int = digits(end);
    end += int;
    let mut frac = 0;
    if bytes.get(end) == Some(&b'.') {
        frac = digits(end + 1);
        if int + frac > 0 {
            end += 1 + frac;
        }
    }
    if int + frac == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let n = digits(exp);
        if n > 0 {
            end = exp + n;
        }
    }
    &s[..end]
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn default_quantity() -> u32 {
    1
}

/// A row of the `toys` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toy {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub toy_type: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub code_number: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub color_variant: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub purchase_location: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub primary_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Toy {
    /// Builds a fresh row from a validated draft.
    pub fn from_draft(draft: &ToyDraft, now: DateTime<Utc>) -> Self {
        let mut toy = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            toy_type: None,
            series: None,
            brand: None,
            code_number: None,
            quantity: 1,
            condition: None,
            color_variant: None,
            purchase_date: None,
            purchase_location: None,
            price: None,
            notes: None,
            custom_fields: BTreeMap::new(),
            primary_image_url: None,
            created_at: now,
        };
        toy.apply_draft(draft);
        toy
    }

    /// Overwrites every editable column with the draft's values.
    ///
    /// `id`, `created_at` and `primary_image_url` are left untouched.
    pub fn apply_draft(&mut self, draft: &ToyDraft) {
        self.name = draft.name.trim().to_string();
        self.toy_type = non_blank(Some(&draft.toy_type));
        self.series = non_blank(draft.series.as_deref());
        self.brand = non_blank(draft.brand.as_deref());
        self.code_number = non_blank(draft.code_number.as_deref());
        self.quantity = draft.quantity;
        self.condition = non_blank(draft.condition.as_deref());
        self.color_variant = non_blank(draft.color_variant.as_deref());
        self.purchase_date = draft.purchase_date;
        self.purchase_location = non_blank(draft.purchase_location.as_deref());
        self.price = non_blank(draft.price.as_deref());
        self.notes = non_blank(draft.notes.as_deref());
        self.custom_fields = draft.custom_fields();
    }

    pub fn parsed_price(&self) -> f64 {
        parse_price(self.price.as_deref())
    }
}

/// A row of the `toy_images` table: one supplementary image of a toy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToyImage {
    pub id: Uuid,
    pub toy_id: Uuid,
    pub image_url: String,
}

impl ToyImage {
    pub fn new(toy_id: Uuid, image_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            toy_id,
            image_url: image_url.into(),
        }
    }
}

/// A row of the `labels` table. Label names are the tags shown on records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: Uuid,
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A row of the `toy_labels` join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToyLabel {
    pub toy_id: Uuid,
    pub label_id: Uuid,
}

/// Normalized, read-only view of one toy as consumed by the catalog pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub toy_type: Option<String>,
    pub series: Option<String>,
    pub brand: Option<String>,
    pub condition: Option<String>,
    pub color_variant: Option<String>,
    pub purchase_location: Option<String>,
    pub price: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub tags: BTreeSet<String>,
    pub image: Option<String>,
    pub additional_images: Vec<String>,
}

impl ToyRecord {
    /// Joins a toy row with its additional image URLs and label names.
    pub fn from_row<I, T>(toy: &Toy, additional_images: Vec<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id: toy.id,
            name: toy.name.clone(),
            toy_type: non_blank(toy.toy_type.as_deref()),
            series: non_blank(toy.series.as_deref()),
            brand: non_blank(toy.brand.as_deref()),
            condition: non_blank(toy.condition.as_deref()),
            color_variant: non_blank(toy.color_variant.as_deref()),
            purchase_location: non_blank(toy.purchase_location.as_deref()),
            price: toy.price.clone(),
            purchase_date: toy.purchase_date,
            created_at: toy.created_at,
            tags: tags.into_iter().map(Into::into).collect(),
            image: non_blank(toy.primary_image_url.as_deref()),
            additional_images: additional_images
                .into_iter()
                .filter(|url| !url.trim().is_empty())
                .collect(),
        }
    }

    pub fn parsed_price(&self) -> f64 {
        parse_price(self.price.as_deref())
    }

    pub fn has_images(&self) -> bool {
        self.image.is_some() || !self.additional_images.is_empty()
    }
}

/// User input for creating or editing a toy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToyDraft {
    pub name: String,
    pub toy_type: String,
    pub series: Option<String>,
    pub brand: Option<String>,
    pub code_number: Option<String>,
    pub quantity: u32,
    pub condition: Option<String>,
    pub color_variant: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_location: Option<String>,
    pub price: Option<String>,
    pub notes: Option<String>,
    /// Free-form key/value pairs. Entries with a blank key are dropped on save.
    pub custom_fields: Vec<(String, String)>,
    /// Label names; missing labels are created on save.
    pub labels: Vec<String>,
}

impl Default for ToyDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            toy_type: String::new(),
            series: None,
            brand: None,
            code_number: None,
            quantity: 1,
            condition: None,
            color_variant: None,
            purchase_date: None,
            purchase_location: None,
            price: None,
            notes: None,
            custom_fields: Vec::new(),
            labels: Vec::new(),
        }
    }
}

impl ToyDraft {
    pub fn new(name: impl Into<String>, toy_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            toy_type: toy_type.into(),
            ..Default::default()
        }
    }

    /// Draft pre-filled from a stored row, the starting point of an edit.
    pub fn from_toy(toy: &Toy, labels: Vec<String>) -> Self {
        Self {
            name: toy.name.clone(),
            toy_type: toy.toy_type.clone().unwrap_or_default(),
            series: toy.series.clone(),
            brand: toy.brand.clone(),
            code_number: toy.code_number.clone(),
            quantity: toy.quantity,
            condition: toy.condition.clone(),
            color_variant: toy.color_variant.clone(),
            purchase_date: toy.purchase_date,
            purchase_location: toy.purchase_location.clone(),
            price: toy.price.clone(),
            notes: toy.notes.clone(),
            custom_fields: toy
                .custom_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            labels,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ToyverseError::Validation("Name is required".into()));
        }
        if self.toy_type.trim().is_empty() {
            return Err(ToyverseError::Validation("Type is required".into()));
        }
        if self.quantity == 0 {
            return Err(ToyverseError::Validation(
                "Quantity must be at least 1".into(),
            ));
        }
        if let Some(price) = self.price.as_deref().map(str::trim) {
            let valid = matches!(price.parse::<f64>(), Ok(p) if p.is_finite() && p >= 0.0);
            if !price.is_empty() && !valid {
                return Err(ToyverseError::Validation(format!(
                    "Price must be a non-negative number, got '{}'",
                    price
                )));
            }
        }
        Ok(())
    }

    pub fn custom_fields(&self) -> BTreeMap<String, String> {
        self.custom_fields
            .iter()
            .filter(|(key, _)| !key.trim().is_empty())
            .map(|(key, value)| (key.trim().to_string(), value.clone()))
            .collect()
    }

    /// Distinct, non-blank label names in input order.
    pub fn label_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && seen.insert(l.to_string()))
            .map(str::to_string)
            .collect()
    }
}

/// An image file handed in by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn toy_row() -> Toy {
        let mut draft = ToyDraft::new("Goku", "figure");
        draft.series = Some("Dragon Ball".into());
        draft.brand = Some("  ".into());
        draft.price = Some("19.99".into());
        Toy::from_draft(&draft, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn parse_price_handles_missing_and_garbage() {
        assert_eq!(parse_price(Some("19.99")), 19.99);
        assert_eq!(parse_price(Some(" 25 ")), 25.0);
        assert_eq!(parse_price(Some("")), 0.0);
        assert_eq!(parse_price(Some("cheap")), 0.0);
        assert_eq!(parse_price(Some("NaN")), 0.0);
        assert_eq!(parse_price(None), 0.0);
    }

    #[test]
    fn parse_price_reads_leading_number() {
        assert_eq!(parse_price(Some("19.99 USD")), 19.99);
        assert_eq!(parse_price(Some("25€")), 25.0);
        assert_eq!(parse_price(Some("1,299")), 1.0);
        assert_eq!(parse_price(Some(".5")), 0.5);
        assert_eq!(parse_price(Some("-3")), -3.0);
        assert_eq!(parse_price(Some("2e2 yen")), 200.0);
        assert_eq!(parse_price(Some("3e")), 3.0);
        assert_eq!(parse_price(Some("$19.99")), 0.0);
        assert_eq!(parse_price(Some("-")), 0.0);
        assert_eq!(parse_price(Some("Infinity")), 0.0);
    }

    #[test]
    fn month_name_is_english() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 15).unwrap();
        assert_eq!(month_name(date), "December");
    }

    #[test]
    fn from_draft_collapses_blank_fields() {
        let toy = toy_row();
        assert_eq!(toy.toy_type.as_deref(), Some("figure"));
        assert_eq!(toy.series.as_deref(), Some("Dragon Ball"));
        assert_eq!(toy.brand, None);
        assert_eq!(toy.quantity, 1);
    }

    #[test]
    fn record_joins_images_and_tags() {
        let mut toy = toy_row();
        toy.primary_image_url = Some("http://img/primary.png".into());
        let record = ToyRecord::from_row(
            &toy,
            vec!["http://img/a.png".into(), "".into()],
            ["anime", "anime", "figures"],
        );

        assert_eq!(record.additional_images, vec!["http://img/a.png"]);
        assert_eq!(record.tags.len(), 2);
        assert!(record.has_images());
        assert_eq!(record.parsed_price(), 19.99);
    }

    #[test]
    fn record_without_images() {
        let toy = toy_row();
        let record = ToyRecord::from_row(&toy, vec![], Vec::<String>::new());
        assert!(!record.has_images());
    }

    #[test]
    fn draft_requires_name_and_type() {
        assert!(ToyDraft::new("", "figure").validate().is_err());
        assert!(ToyDraft::new("Goku", " ").validate().is_err());
        assert!(ToyDraft::new("Goku", "figure").validate().is_ok());
    }

    #[test]
    fn draft_rejects_bad_price_and_quantity() {
        let mut draft = ToyDraft::new("Goku", "figure");
        draft.price = Some("abc".into());
        assert!(matches!(
            draft.validate(),
            Err(ToyverseError::Validation(_))
        ));

        draft.price = Some("".into());
        draft.quantity = 0;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn custom_fields_drop_blank_keys() {
        let mut draft = ToyDraft::new("Goku", "figure");
        draft.custom_fields = vec![
            ("scale".into(), "1/6".into()),
            ("".into(), "ignored".into()),
        ];
        let fields = draft.custom_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("scale").map(String::as_str), Some("1/6"));
    }

    #[test]
    fn label_names_are_distinct_and_trimmed() {
        let mut draft = ToyDraft::new("Goku", "figure");
        draft.labels = vec![" anime ".into(), "anime".into(), "".into(), "rare".into()];
        assert_eq!(draft.label_names(), vec!["anime", "rare"]);
    }

    #[test]
    fn draft_from_toy_round_trips_editable_fields() {
        let toy = toy_row();
        let draft = ToyDraft::from_toy(&toy, vec!["anime".into()]);
        assert_eq!(draft.name, "Goku");
        assert_eq!(draft.toy_type, "figure");
        assert_eq!(draft.price.as_deref(), Some("19.99"));
        assert_eq!(draft.labels, vec!["anime"]);

        let mut copy = toy.clone();
        copy.apply_draft(&draft);
        assert_eq!(copy, toy);
    }

    #[test]
    fn toy_row_deserializes_with_defaults() {
        let json = r#"{
            "id": "6f1c9a62-3f1b-4b53-9a54-9d8f2f1a0b11",
            "name": "Batman",
            "type": "figure",
            "created_at": "2024-01-02T03:04:05Z"
        }"#;
        let toy: Toy = serde_json::from_str(json).unwrap();
        assert_eq!(toy.toy_type.as_deref(), Some("figure"));
        assert_eq!(toy.quantity, 1);
        assert!(toy.custom_fields.is_empty());
    }
}
