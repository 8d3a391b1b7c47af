//! Facet values for populating filter dropdowns.

use super::schema::Category;
use crate::model::{month_name, ToyRecord};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// Distinct non-empty values per categorical field, sorted.
    pub categories: BTreeMap<Category, Vec<String>>,
    pub tags: Vec<String>,
    /// Most recent first.
    pub years: Vec<String>,
    /// Sorted by name, not calendar order.
    pub months: Vec<String>,
}

impl Facets {
    pub fn values(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Distinct non-empty values of one categorical field, sorted.
pub fn unique_values(records: &[ToyRecord], category: Category) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| category.of_record(r))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn extract_facets(records: &[ToyRecord]) -> Facets {
    let categories = Category::ALL
        .into_iter()
        .map(|category| (category, unique_values(records, category)))
        .collect();

    let tags: BTreeSet<&String> = records.iter().flat_map(|r| r.tags.iter()).collect();

    let years: BTreeSet<i32> = records
        .iter()
        .filter_map(|r| r.purchase_date)
        .map(|d| d.year())
        .collect();

    let months: BTreeSet<&'static str> = records
        .iter()
        .filter_map(|r| r.purchase_date)
        .map(month_name)
        .collect();

    Facets {
        categories,
        tags: tags.into_iter().cloned().collect(),
        years: years.into_iter().rev().map(|y| y.to_string()).collect(),
        months: months.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{date, record, sample_collection};

    #[test]
    fn categorical_values_are_distinct_and_sorted() {
        let mut records = sample_collection();
        records.push(record("Vegeta", Some("figure"), None, None));
        let facets = extract_facets(&records);
        assert_eq!(facets.values(Category::Type), ["figure", "plush"]);
        assert!(facets.values(Category::Brand).is_empty());
    }

    #[test]
    fn tags_are_flattened() {
        let mut a = record("A", None, None, None);
        a.tags = ["rare", "anime"].into_iter().map(String::from).collect();
        let mut b = record("B", None, None, None);
        b.tags = ["anime", "boxed"].into_iter().map(String::from).collect();

        let facets = extract_facets(&[a, b]);
        assert_eq!(facets.tags, vec!["anime", "boxed", "rare"]);
    }

    #[test]
    fn years_descend_and_months_sort_by_name() {
        let records = vec![
            record("A", None, None, Some(date(2022, 1, 10))),
            record("B", None, None, Some(date(2024, 3, 1))),
            record("C", None, None, Some(date(2023, 12, 15))),
            record("D", None, None, Some(date(2024, 1, 2))),
            record("E", None, None, None),
        ];
        let facets = extract_facets(&records);
        assert_eq!(facets.years, vec!["2024", "2023", "2022"]);
        assert_eq!(facets.months, vec!["December", "January", "March"]);
    }

    #[test]
    fn empty_collection_has_empty_facets() {
        let facets = extract_facets(&[]);
        assert!(facets.tags.is_empty());
        assert!(facets.years.is_empty());
        assert!(Category::ALL
            .iter()
            .all(|c| facets.values(*c).is_empty()));
    }
}
