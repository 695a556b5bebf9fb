//! Central configuration for search scenarios.
//!
//! Every scenario's query parameters and expected result count live
//! here, derived from the known generation distributions rather than
//! hardcoded at call sites. The expected counts assume the default
//! seed (42) over 1,000,000 records; they are soft assertions, so the
//! runner logs a deviation and never aborts on one.

use crate::dataset::values::{self, DATE_START_EPOCH};
use chrono::{DateTime, Utc};
use std::fmt;

/// Expected result count assertion for a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedCount {
    /// Exactly this many results.
    Exact(usize),
    /// Inclusive range of acceptable counts.
    Range { min: usize, max: usize },
    /// No validation.
    Any,
}

impl ExpectedCount {
    /// Check an actual count against the expectation.
    #[must_use]
    pub const fn validate(&self, actual: usize) -> bool {
        match self {
            Self::Exact(expected) => actual == *expected,
            Self::Range { min, max } => actual >= *min && actual <= *max,
            Self::Any => true,
        }
    }
}

impl fmt::Display for ExpectedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(count) => write!(f, "exactly {count}"),
            Self::Range { min, max } => write!(f, "{min}-{max}"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// Typed query parameters for one scenario.
///
/// Only the parameters a scenario actually uses are populated; the
/// rest stay `None` rather than carrying meaningless defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    /// Exact-match product name.
    pub name: Option<String>,
    /// Exact-match category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<i64>,
    /// Inclusive upper price bound.
    pub price_max: Option<i64>,
    /// Date floor (`date >= date_from`).
    pub date_from: Option<DateTime<Utc>>,
    /// Substring keyword against the description field.
    pub keyword: Option<String>,
    /// Single tag the record must carry.
    pub tag: Option<String>,
    /// Multiple tags the record must carry (AND logic).
    pub tags: Option<Vec<String>>,
}

/// Fixed search scenarios, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScenario {
    /// Exact name match against the most frequent Zipf rank.
    Equality,
    /// Price between 1000 and 5000.
    Range,
    /// Category + price range + date floor.
    Complex,
    /// Description keyword containment.
    FullText,
    /// Records carrying one specific tag.
    TagEquality,
    /// Price range narrowed by a tag.
    RangeTag,
    /// Category + price + date narrowed by a tag.
    ComplexTag,
    /// Keyword containment narrowed by a tag.
    FullTextTag,
    /// Records carrying two specific tags at once.
    MultipleTags,
}

impl SearchScenario {
    /// All scenarios in fixed execution order.
    #[must_use]
    pub const fn all() -> [Self; 9] {
        [
            Self::Equality,
            Self::Range,
            Self::Complex,
            Self::FullText,
            Self::TagEquality,
            Self::RangeTag,
            Self::ComplexTag,
            Self::FullTextTag,
            Self::MultipleTags,
        ]
    }

    /// Scenarios answerable from a flat fixture.
    #[must_use]
    pub const fn flat() -> [Self; 4] {
        [Self::Equality, Self::Range, Self::Complex, Self::FullText]
    }

    /// Scenarios that need the relational (tagged) fixture.
    #[must_use]
    pub const fn relational() -> [Self; 5] {
        [
            Self::TagEquality,
            Self::RangeTag,
            Self::ComplexTag,
            Self::FullTextTag,
            Self::MultipleTags,
        ]
    }

    /// Whether the scenario requires tag data.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::TagEquality
                | Self::RangeTag
                | Self::ComplexTag
                | Self::FullTextTag
                | Self::MultipleTags
        )
    }

    /// Scenario label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equality => "Equality",
            Self::Range => "Range",
            Self::Complex => "Complex",
            Self::FullText => "FullText",
            Self::TagEquality => "Relational-TagEquality",
            Self::RangeTag => "Relational-RangeTag",
            Self::ComplexTag => "Relational-ComplexTag",
            Self::FullTextTag => "Relational-FullTextTag",
            Self::MultipleTags => "Relational-MultipleTags",
        }
    }

    /// Query parameters for this scenario.
    ///
    /// Values reference the generation pools directly so queries can
    /// never drift from the data the generator produced.
    #[must_use]
    pub fn query_params(self) -> QueryParameters {
        let date_floor = DateTime::from_timestamp(DATE_START_EPOCH, 0);
        match self {
            Self::Equality => QueryParameters {
                name: Some(values::most_frequent_name().to_string()),
                ..QueryParameters::default()
            },
            Self::Range => QueryParameters {
                price_min: Some(1000),
                price_max: Some(5000),
                ..QueryParameters::default()
            },
            Self::Complex => QueryParameters {
                category: Some(values::most_frequent_category().to_string()),
                price_min: Some(2000),
                price_max: Some(8000),
                date_from: date_floor,
                ..QueryParameters::default()
            },
            Self::FullText => QueryParameters {
                keyword: Some("premium".to_string()),
                ..QueryParameters::default()
            },
            Self::TagEquality => QueryParameters {
                tag: Some(values::tag_by_index(0).to_string()),
                ..QueryParameters::default()
            },
            Self::RangeTag => QueryParameters {
                price_min: Some(1000),
                price_max: Some(5000),
                tag: Some(values::tag_by_index(10).to_string()),
                ..QueryParameters::default()
            },
            Self::ComplexTag => QueryParameters {
                category: Some(values::most_frequent_category().to_string()),
                price_min: Some(2000),
                price_max: Some(8000),
                date_from: date_floor,
                tag: Some(values::tag_by_index(20).to_string()),
                ..QueryParameters::default()
            },
            Self::FullTextTag => QueryParameters {
                keyword: Some("premium".to_string()),
                tag: Some(values::tag_by_index(5).to_string()),
                ..QueryParameters::default()
            },
            Self::MultipleTags => QueryParameters {
                tags: Some(vec![
                    values::tag_by_index(15).to_string(),
                    values::tag_by_index(20).to_string(),
                ]),
                ..QueryParameters::default()
            },
        }
    }

    /// Expected result count at the default seed over 1M records.
    #[must_use]
    pub const fn expected_count(self) -> ExpectedCount {
        match self {
            Self::Equality => ExpectedCount::Range {
                min: 13_000,
                max: 17_000,
            },
            Self::Range => ExpectedCount::Range {
                min: 75_000,
                max: 85_000,
            },
            Self::Complex => ExpectedCount::Range {
                min: 6_000,
                max: 14_000,
            },
            Self::FullText => ExpectedCount::Range {
                min: 12_000,
                max: 28_000,
            },
            Self::TagEquality => ExpectedCount::Range {
                min: 3_000,
                max: 7_000,
            },
            Self::RangeTag => ExpectedCount::Range {
                min: 2_500,
                max: 6_000,
            },
            Self::ComplexTag => ExpectedCount::Range {
                min: 400,
                max: 2_500,
            },
            Self::FullTextTag => ExpectedCount::Range {
                min: 600,
                max: 2_000,
            },
            Self::MultipleTags => ExpectedCount::Range { min: 30, max: 300 },
        }
    }

    /// Human-readable query condition for report entries.
    #[must_use]
    pub fn query_condition(self) -> String {
        let p = self.query_params();
        let date_str = p
            .date_from
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        match self {
            Self::Equality => format!("name == '{}'", p.name.unwrap_or_default()),
            Self::Range => format!(
                "price BETWEEN {} AND {}",
                p.price_min.unwrap_or_default(),
                p.price_max.unwrap_or_default()
            ),
            Self::Complex => format!(
                "category='{}' AND price BETWEEN {}-{} AND date>='{date_str}'",
                p.category.unwrap_or_default(),
                p.price_min.unwrap_or_default(),
                p.price_max.unwrap_or_default()
            ),
            Self::FullText => {
                format!("description CONTAINS '{}'", p.keyword.unwrap_or_default())
            }
            Self::TagEquality => format!("tags CONTAINS '{}'", p.tag.unwrap_or_default()),
            Self::RangeTag => format!(
                "price BETWEEN {}-{} AND tags CONTAINS '{}'",
                p.price_min.unwrap_or_default(),
                p.price_max.unwrap_or_default(),
                p.tag.unwrap_or_default()
            ),
            Self::ComplexTag => format!(
                "category='{}' AND price BETWEEN {}-{} AND date>='{date_str}' AND tags CONTAINS '{}'",
                p.category.unwrap_or_default(),
                p.price_min.unwrap_or_default(),
                p.price_max.unwrap_or_default(),
                p.tag.unwrap_or_default()
            ),
            Self::FullTextTag => format!(
                "description CONTAINS '{}' AND tags CONTAINS '{}'",
                p.keyword.unwrap_or_default(),
                p.tag.unwrap_or_default()
            ),
            Self::MultipleTags => {
                let tags = p.tags.unwrap_or_default();
                let joined = tags
                    .iter()
                    .map(|t| format!("'{t}'"))
                    .collect::<Vec<_>>()
                    .join(" AND tags CONTAINS ");
                format!("tags CONTAINS {joined}")
            }
        }
    }
}

impl fmt::Display for SearchScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_count_validation() {
        assert!(ExpectedCount::Exact(5).validate(5));
        assert!(!ExpectedCount::Exact(5).validate(6));
        assert!(ExpectedCount::Range { min: 10, max: 20 }.validate(10));
        assert!(ExpectedCount::Range { min: 10, max: 20 }.validate(20));
        assert!(!ExpectedCount::Range { min: 10, max: 20 }.validate(21));
        assert!(ExpectedCount::Any.validate(usize::MAX));
    }

    #[test]
    fn equality_params_are_minimal() {
        let params = SearchScenario::Equality.query_params();
        assert!(params.name.is_some());
        assert!(params.category.is_none());
        assert!(params.price_min.is_none());
        assert!(params.keyword.is_none());
        assert!(params.tag.is_none());
        assert!(params.tags.is_none());
    }

    #[test]
    fn relational_flag_matches_tag_usage() {
        for scenario in SearchScenario::all() {
            let params = scenario.query_params();
            let uses_tags = params.tag.is_some() || params.tags.is_some();
            assert_eq!(scenario.is_relational(), uses_tags, "{scenario}");
        }
    }

    #[test]
    fn scenario_order_is_stable() {
        let labels: Vec<_> = SearchScenario::all()
            .iter()
            .map(|s| s.label())
            .collect();
        assert_eq!(labels[0], "Equality");
        assert_eq!(labels[3], "FullText");
        assert_eq!(labels[8], "Relational-MultipleTags");
    }

    #[test]
    fn query_conditions_render() {
        assert_eq!(
            SearchScenario::Equality.query_condition(),
            "name == 'Product-AA'"
        );
        assert_eq!(
            SearchScenario::Range.query_condition(),
            "price BETWEEN 1000 AND 5000"
        );
        assert!(
            SearchScenario::Complex
                .query_condition()
                .contains("date>='2023-01-01'")
        );
    }
}
