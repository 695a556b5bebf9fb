//! Finite value pools and dataset generation constants.
//!
//! All search scenarios query values drawn from these pools, so the
//! pools and the distribution parameters live in one place: a query
//! that hardcoded its own value could silently drift from what the
//! generator actually produced.

use crate::dataset::zipf::ZipfianGenerator;
use once_cell::sync::Lazy;

/// Default seed for fixture generation.
pub const DEFAULT_SEED: u64 = 42;

/// Uniform price range, half-open: `[100, 50001)`.
pub const PRICE_MIN: i64 = 100;
pub const PRICE_MAX: i64 = 50_001;

/// Date window for the uniform date field (epoch seconds).
/// 2023-01-01T00:00:00Z to 2024-12-31T00:00:00Z.
pub const DATE_START_EPOCH: i64 = 1_672_531_200;
pub const DATE_END_EPOCH: i64 = 1_735_689_600;

/// Probability that `is_active` is true.
pub const IS_ACTIVE_PROBABILITY: f64 = 0.7;

/// Tag cardinality per product record, inclusive bounds (mean ~2.5).
pub const TAGS_PER_RECORD_MIN: i64 = 1;
pub const TAGS_PER_RECORD_MAX: i64 = 5;

/// Zipf parameters for the name field.
pub const NAME_SKEWNESS: f64 = 1.3;
pub const NAME_UNIQUE_COUNT: usize = 100;

/// Zipf parameters for the category field.
pub const CATEGORY_SKEWNESS: f64 = 1.5;
pub const CATEGORY_UNIQUE_COUNT: usize = 50;

/// Progress is reported once per this many generated records.
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Preset Zipf generator for product names (s=1.3, k=100).
pub static NAME_GENERATOR: Lazy<ZipfianGenerator> =
    Lazy::new(|| ZipfianGenerator::new(NAME_SKEWNESS, NAME_UNIQUE_COUNT));

/// Preset Zipf generator for categories (s=1.5, k=50).
pub static CATEGORY_GENERATOR: Lazy<ZipfianGenerator> =
    Lazy::new(|| ZipfianGenerator::new(CATEGORY_SKEWNESS, CATEGORY_UNIQUE_COUNT));

/// 100 product names: `Product-AA`, `Product-AB`, ... indexed by Zipf rank.
pub static PRODUCT_NAMES: Lazy<Vec<String>> = Lazy::new(|| {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    (0..NAME_UNIQUE_COUNT)
        .map(|i| {
            let first = ALPHABET[i / 26] as char;
            let second = ALPHABET[i % 26] as char;
            format!("Product-{first}{second}")
        })
        .collect()
});

/// 50 categories, indexed by Zipf rank (rank 0 = most frequent).
pub static CATEGORIES: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "Electronics",
        "Books",
        "Home",
        "Sports",
        "Toys",
        "Clothing",
        "Food",
        "Beauty",
        "Automotive",
        "Garden",
        "Health",
        "Music",
        "Movies",
        "Games",
        "Office",
        "Pet",
        "Baby",
        "Tools",
        "Jewelry",
        "Shoes",
        "Luggage",
        "Grocery",
        "Handmade",
        "Industrial",
        "Arts",
        "Crafts",
        "Outdoors",
        "Kitchen",
        "Furniture",
        "Appliances",
        "Software",
        "Computers",
        "Cameras",
        "CellPhones",
        "Accessories",
        "Musical",
        "Instruments",
        "VideoGames",
        "Watches",
        "Collectibles",
        "Fine Art",
        "Wine",
        "Magazines",
        "Gift Cards",
        "Fashion",
        "Smart Home",
        "Hobby",
        "Wellness",
        "Stationery",
        "Subscription",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
});

/// 200 tag names: a prefix-base grid followed by a base-suffix grid.
pub static TAG_NAMES: Lazy<Vec<String>> = Lazy::new(|| {
    let prefixes = [
        "new", "sale", "hot", "premium", "limited", "eco", "pro", "mini", "max", "ultra",
    ];
    let bases = [
        "tech", "quality", "value", "best", "top", "choice", "pick", "deal", "offer", "buy",
    ];
    let suffixes = [
        "2024", "2023", "today", "now", "special", "plus", "extra", "super", "mega", "grand",
    ];

    let mut tags = Vec::with_capacity(200);
    for prefix in prefixes {
        for base in bases {
            tags.push(format!("{prefix}-{base}"));
            if tags.len() >= 200 {
                return tags;
            }
        }
    }
    for suffix in suffixes {
        for base in bases {
            tags.push(format!("{base}-{suffix}"));
            if tags.len() >= 200 {
                return tags;
            }
        }
    }
    tags
});

/// Word dictionary for description text. Contains "premium", which the
/// full-text search scenarios key on.
pub static DESCRIPTION_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "product",
        "quality",
        "excellent",
        "premium",
        "innovative",
        "advanced",
        "modern",
        "professional",
        "reliable",
        "durable",
        "efficient",
        "powerful",
        "versatile",
        "compact",
        "lightweight",
        "portable",
        "feature",
        "design",
        "performance",
        "technology",
        "solution",
        "system",
        "device",
        "tool",
        "high",
        "best",
        "top",
        "great",
        "perfect",
        "ideal",
        "superior",
        "outstanding",
        "customer",
        "satisfaction",
        "guarantee",
        "warranty",
        "support",
        "service",
        "experience",
        "value",
        "easy",
        "simple",
        "convenient",
        "user-friendly",
        "intuitive",
        "smart",
        "quick",
        "fast",
        "safe",
        "secure",
        "trusted",
        "certified",
        "approved",
        "tested",
        "proven",
        "verified",
        "new",
        "latest",
        "updated",
        "improved",
        "enhanced",
        "upgraded",
        "revolutionary",
        "cutting-edge",
        "affordable",
        "economical",
        "cost-effective",
        "budget",
        "savings",
        "deal",
        "offer",
        "price",
        "includes",
        "features",
        "offers",
        "provides",
        "delivers",
        "ensures",
        "guarantees",
        "supports",
        "compatible",
        "works",
        "fits",
        "matches",
        "connects",
        "integrates",
        "combines",
        "pairs",
        "available",
        "stock",
        "ready",
        "shipping",
        "delivery",
        "order",
        "purchase",
        "buy",
        "material",
        "construction",
        "build",
        "made",
        "manufactured",
        "produced",
        "crafted",
        "engineered",
    ]
});

/// Most frequent product name (Zipf rank 0).
#[must_use]
pub fn most_frequent_name() -> &'static str {
    &PRODUCT_NAMES[0]
}

/// Most frequent category (Zipf rank 0).
#[must_use]
pub fn most_frequent_category() -> &'static str {
    &CATEGORIES[0]
}

/// Tag at the given pool index, clamped to the pool.
#[must_use]
pub fn tag_by_index(index: usize) -> &'static str {
    TAG_NAMES.get(index).map_or(&TAG_NAMES[0], |t| t)
}

/// Human-readable distribution description embedded in fixture metadata.
#[must_use]
pub fn distribution_description() -> String {
    format!(
        "name: Zipf(s={NAME_SKEWNESS}, k={NAME_UNIQUE_COUNT}), \
         category: Zipf(s={CATEGORY_SKEWNESS}, k={CATEGORY_UNIQUE_COUNT})"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_sizes_match_generators() {
        assert_eq!(PRODUCT_NAMES.len(), NAME_GENERATOR.unique_count());
        assert_eq!(CATEGORIES.len(), CATEGORY_GENERATOR.unique_count());
        assert_eq!(TAG_NAMES.len(), 200);
    }

    #[test]
    fn pools_have_no_duplicates() {
        let mut names = PRODUCT_NAMES.clone();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 100);

        let mut tags = TAG_NAMES.clone();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 200);
    }

    #[test]
    fn rank_zero_values() {
        assert_eq!(most_frequent_name(), "Product-AA");
        assert_eq!(most_frequent_category(), "Electronics");
        assert_eq!(tag_by_index(0), "new-tech");
    }

    #[test]
    fn dictionary_contains_fulltext_keyword() {
        assert!(DESCRIPTION_WORDS.contains(&"premium"));
    }
}
