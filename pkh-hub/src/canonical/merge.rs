//! Field-wise payload merge
//!
//! Given payloads already ordered by the ranking policy, resolves every
//! field of the canonical payload:
//!
//! - scalar fields take the first non-empty value in rank order;
//! - array fields take the union in rank order with duplicates removed.
//!
//! Duplicate means structural equality after normalizing whitespace and
//! case on string members; structured elements compare on their full
//! normalized tuple. The first occurrence keeps its original spelling.
//!
//! Everything here is pure: no store access, no clock, no external lookup.

use std::collections::HashSet;

use crate::models::document::{Attribute, CompatibleWithItem, Image, Media, Product};

/// Merge ranked payloads into one canonical payload
pub fn merge_payloads(ordered: &[&Product]) -> Product {
    Product {
        product_name: first_non_empty(ordered.iter().map(|p| p.product_name.as_str())),
        brand: first_non_empty(ordered.iter().map(|p| p.brand.as_str())),
        manufacturer_reference: first_non_empty(
            ordered.iter().map(|p| p.manufacturer_reference.as_str()),
        ),
        ean_codes: union_strings(ordered.iter().map(|p| p.ean_codes.as_slice())),
        gtin_codes: union_strings(ordered.iter().map(|p| p.gtin_codes.as_slice())),
        manufacturer_reference_aliases: union_strings(
            ordered.iter().map(|p| p.manufacturer_reference_aliases.as_slice()),
        ),
        short_descriptions: union_strings(ordered.iter().map(|p| p.short_descriptions.as_slice())),
        long_descriptions: union_strings(ordered.iter().map(|p| p.long_descriptions.as_slice())),
        strengths: union_strings(ordered.iter().map(|p| p.strengths.as_slice())),
        applications: union_strings(ordered.iter().map(|p| p.applications.as_slice())),
        marketing: union_strings(ordered.iter().map(|p| p.marketing.as_slice())),
        compatible_with: union_structured(
            ordered.iter().map(|p| p.compatible_with.as_slice()),
            compatible_key,
        ),
        categories: union_strings(ordered.iter().map(|p| p.categories.as_slice())),
        tags: union_strings(ordered.iter().map(|p| p.tags.as_slice())),
        regulatory: union_strings(ordered.iter().map(|p| p.regulatory.as_slice())),
        attributes: union_structured(
            ordered.iter().map(|p| p.attributes.as_slice()),
            attribute_key,
        ),
        images: union_structured(ordered.iter().map(|p| p.images.as_slice()), image_key),
        media: union_structured(ordered.iter().map(|p| p.media.as_slice()), media_key),
        other_texts: union_strings(ordered.iter().map(|p| p.other_texts.as_slice())),
    }
}

/// First value that is non-empty after trimming, or empty
fn first_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Whitespace/case normalization used for duplicate detection only;
/// surviving elements keep their original spelling
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn normalize_opt(s: &Option<String>) -> String {
    s.as_deref().map(normalize).unwrap_or_default()
}

/// Rank-ordered union of string lists, whitespace-only elements dropped
fn union_strings<'a>(lists: impl Iterator<Item = &'a [String]>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for list in lists {
        for item in list {
            if item.trim().is_empty() {
                continue;
            }
            if seen.insert(normalize(item)) {
                out.push(item.clone());
            }
        }
    }
    out
}

/// Rank-ordered union of structured lists, keyed by the full normalized tuple
fn union_structured<'a, T: Clone + 'a>(
    lists: impl Iterator<Item = &'a [T]>,
    key: impl Fn(&T) -> String,
) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for list in lists {
        for item in list {
            if seen.insert(key(item)) {
                out.push(item.clone());
            }
        }
    }
    out
}

// US unit separator keeps tuple members from bleeding into each other
const SEP: char = '\u{1f}';

fn join_key(parts: &[String]) -> String {
    parts.join(&SEP.to_string())
}

fn attribute_key(a: &Attribute) -> String {
    join_key(&[normalize(&a.name), normalize(&a.value), normalize(&a.unit)])
}

fn compatible_key(c: &CompatibleWithItem) -> String {
    join_key(&[
        normalize(&c.raw_text),
        normalize_opt(&c.brand),
        normalize_opt(&c.manufacturer_reference),
        normalize_opt(&c.gtin),
        normalize_opt(&c.item_type),
    ])
}

fn image_key(i: &Image) -> String {
    join_key(&[
        normalize(&i.id),
        normalize(&i.source),
        i.page.map(|p| p.to_string()).unwrap_or_default(),
        normalize_opt(&i.file_path),
        normalize_opt(&i.filename),
        normalize_opt(&i.url),
        normalize(&i.classification),
        normalize(&i.description),
        normalize(&i.product_name_from_image),
        normalize(&i.brand_from_image),
    ])
}

fn media_key(m: &Media) -> String {
    join_key(&[
        normalize(&m.media_type),
        normalize(&m.title),
        normalize(&m.language_code),
        normalize(&m.url),
        normalize(&m.source),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> Product {
        Product {
            product_name: name.into(),
            brand: "Acme".into(),
            manufacturer_reference: "REF-1".into(),
            ..Product::default()
        }
    }

    #[test]
    fn scalar_takes_first_non_empty_in_rank_order() {
        let top = payload("");
        let second = payload("  ");
        let third = payload("Widget Pro");

        let merged = merge_payloads(&[&top, &second, &third]);
        assert_eq!(merged.product_name, "Widget Pro");
    }

    #[test]
    fn scalar_empty_when_no_record_supplies_it() {
        let a = payload("");
        let b = payload("");
        let merged = merge_payloads(&[&a, &b]);
        assert_eq!(merged.product_name, "");
    }

    #[test]
    fn string_arrays_union_with_case_and_whitespace_insensitive_dedupe() {
        let mut a = payload("Widget");
        a.tags = vec!["ip65".into(), "ip65".into(), "outdoor".into()];
        let mut b = payload("Widget");
        b.tags = vec!["Outdoor".into(), "sealed".into()];

        let merged = merge_payloads(&[&a, &b]);
        assert_eq!(merged.tags, vec!["ip65", "outdoor", "sealed"]);
    }

    #[test]
    fn higher_ranked_spelling_survives_dedupe() {
        let mut a = payload("Widget");
        a.categories = vec!["Power  Tools".into()];
        let mut b = payload("Widget");
        b.categories = vec!["power tools".into()];

        let merged = merge_payloads(&[&a, &b]);
        assert_eq!(merged.categories, vec!["Power  Tools"]);
    }

    #[test]
    fn whitespace_only_elements_are_dropped() {
        let mut a = payload("Widget");
        a.strengths = vec!["  ".into(), "durable".into()];

        let merged = merge_payloads(&[&a]);
        assert_eq!(merged.strengths, vec!["durable"]);
    }

    #[test]
    fn attributes_dedupe_on_full_normalized_triple() {
        let mut a = payload("Widget");
        a.attributes = vec![
            Attribute {
                name: "Weight".into(),
                value: "1.9".into(),
                unit: "kg".into(),
            },
            Attribute {
                name: "weight".into(),
                value: "1.9".into(),
                unit: "KG".into(),
            },
        ];
        let mut b = payload("Widget");
        b.attributes = vec![Attribute {
            name: "Weight".into(),
            value: "2.1".into(),
            unit: "kg".into(),
        }];

        let merged = merge_payloads(&[&a, &b]);
        // Same triple collapses; a different value is new information
        assert_eq!(merged.attributes.len(), 2);
        assert_eq!(merged.attributes[0].value, "1.9");
        assert_eq!(merged.attributes[1].value, "2.1");
    }

    #[test]
    fn media_dedupes_on_full_tuple() {
        let mut a = payload("Widget");
        a.media = vec![Media {
            media_type: "datasheet".into(),
            title: "Datasheet EN".into(),
            language_code: "en".into(),
            url: "https://example.com/ds.pdf".into(),
            source: "vendor".into(),
        }];
        let mut b = payload("Widget");
        b.media = vec![
            Media {
                media_type: "datasheet".into(),
                title: "datasheet en".into(),
                language_code: "en".into(),
                url: "https://example.com/ds.pdf".into(),
                source: "vendor".into(),
            },
            Media {
                media_type: "video".into(),
                title: "Intro".into(),
                language_code: "en".into(),
                url: "https://example.com/v".into(),
                source: "vendor".into(),
            },
        ];

        let merged = merge_payloads(&[&a, &b]);
        assert_eq!(merged.media.len(), 2);
        assert_eq!(merged.media[0].title, "Datasheet EN");
        assert_eq!(merged.media[1].media_type, "video");
    }

    #[test]
    fn merge_is_deterministic_for_fixed_order() {
        let mut a = payload("Widget");
        a.tags = vec!["x".into(), "y".into()];
        let mut b = payload("Widget Pro");
        b.tags = vec!["z".into()];

        let once = merge_payloads(&[&a, &b]);
        let twice = merge_payloads(&[&a, &b]);
        assert_eq!(once, twice);
    }
}
