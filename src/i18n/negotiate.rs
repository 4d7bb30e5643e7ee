//! `Accept-Language` negotiation against the loaded languages.

use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use unic_langid::LanguageIdentifier;

/// A single `Accept-Language` entry with its quality weight.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    /// Requested tag (e.g., "es-MX", "en", "*")
    pub tag: String,

    /// Quality weight in `0.0..=1.0`
    pub quality: f32,
}

/// Parse an `Accept-Language` header value.
///
/// Ranges are returned by descending quality, keeping header order among
/// equal weights. Entries with a malformed or out-of-range weight are
/// dropped, as are entries with weight 0 ("not acceptable").
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .filter_map(|part| {
            let mut components = part.split(';');
            let tag = components.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let mut quality = 1.0;
            for param in components {
                let Some((name, value)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().ok()?;
                }
            }

            if !(0.0..=1.0).contains(&quality) || quality == 0.0 {
                return None;
            }

            Some(LanguageRange {
                tag: tag.to_string(),
                quality,
            })
        })
        .collect();

    // sort_by is stable, so header order breaks ties
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

/// Pick the best available language for an `Accept-Language` header.
///
/// Ranges are tried in preference order; tags and available codes are
/// compared as language identifiers, so `es-MX` matches `es`, `en` matches
/// `en-US` and case is ignored. A `*` range accepts the first available
/// language. Returns the available abbreviation as stored.
pub fn negotiate<'a, S: AsRef<str>>(header: &str, available: &'a [S]) -> Option<&'a str> {
    negotiate_ranges(&parse_accept_language(header), available)
}

/// Same as [`negotiate`] with an already parsed priority list.
pub fn negotiate_ranges<'a, S: AsRef<str>>(
    ranges: &[LanguageRange],
    available: &'a [S],
) -> Option<&'a str> {
    // Nothing after a wildcard can beat it
    let wildcard = ranges.iter().position(|range| range.tag == "*");
    let requested: Vec<LanguageIdentifier> = ranges[..wildcard.unwrap_or(ranges.len())]
        .iter()
        .filter_map(|range| range.tag.parse().ok())
        .collect();

    // Codes that are not valid language identifiers can only be reached by a wildcard
    let (codes, ids): (Vec<&'a str>, Vec<LanguageIdentifier>) = available
        .iter()
        .filter_map(|code| {
            let code = code.as_ref();
            code.parse().ok().map(|id| (code, id))
        })
        .unzip();

    let matched = negotiate_languages(&requested, &ids, None, NegotiationStrategy::Filtering);
    if let Some(best) = matched.first() {
        let index = ids.iter().position(|id| std::ptr::eq(id, *best))?;
        return Some(codes[index]);
    }

    wildcard.and_then(|_| available.first().map(|code| code.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const AVAILABLE: &[&str] = &["en", "es"];

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_orders_by_quality() {
        let ranges = parse_accept_language("en;q=0.5, es, fr;q=0.8");
        let tags: Vec<_> = ranges.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["es", "fr", "en"]);
    }

    #[test]
    fn test_parse_keeps_header_order_on_ties() {
        let ranges = parse_accept_language("fr, de, es");
        let tags: Vec<_> = ranges.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["fr", "de", "es"]);
    }

    #[test]
    fn test_parse_drops_zero_and_malformed_weights() {
        let ranges = parse_accept_language("es;q=0, fr;q=abc, de;q=1.5, en");
        let tags: Vec<_> = ranges.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["en"]);
    }

    #[test]
    fn test_parse_empty_header() {
        assert!(parse_accept_language("").is_empty());
        assert!(parse_accept_language(" , ,").is_empty());
    }

    // ==================== Negotiation Tests ====================

    #[test]
    fn test_negotiate_exact_match() {
        assert_eq!(negotiate("es", AVAILABLE), Some("es"));
    }

    #[test]
    fn test_negotiate_unavailable_language() {
        assert_eq!(negotiate("fr", AVAILABLE), None);
    }

    #[test]
    fn test_negotiate_region_matches_primary() {
        assert_eq!(negotiate("es-MX,fr;q=0.9", AVAILABLE), Some("es"));
    }

    #[test]
    fn test_negotiate_primary_matches_region() {
        assert_eq!(negotiate("en", &["de", "en-US"]), Some("en-US"));
    }

    #[test]
    fn test_negotiate_case_insensitive() {
        assert_eq!(negotiate("ES", AVAILABLE), Some("es"));
    }

    #[test]
    fn test_negotiate_skips_to_next_preference() {
        assert_eq!(negotiate("fr, de;q=0.9, es;q=0.1", AVAILABLE), Some("es"));
    }

    #[test]
    fn test_negotiate_wildcard_takes_first_available() {
        assert_eq!(negotiate("fr, *;q=0.5", AVAILABLE), Some("en"));
    }

    #[test]
    fn test_negotiate_skips_malformed_tags() {
        assert_eq!(negotiate("not a tag!, es;q=0.5", AVAILABLE), Some("es"));
    }

    #[test]
    fn test_negotiate_underscore_separator() {
        assert_eq!(negotiate("es_MX", AVAILABLE), Some("es"));
    }

    #[test]
    fn test_negotiate_higher_quality_wins() {
        assert_eq!(negotiate("en;q=0.3, es;q=0.9", AVAILABLE), Some("es"));
    }

    proptest! {
        #[test]
        fn prop_negotiated_language_is_available(header in "[a-zA-Z*,;=.0-9 -]{0,40}") {
            if let Some(code) = negotiate(&header, AVAILABLE) {
                prop_assert!(AVAILABLE.contains(&code));
            }
        }

        #[test]
        fn prop_available_code_negotiates_to_itself(idx in 0usize..2) {
            let code = AVAILABLE[idx];
            prop_assert_eq!(negotiate(code, AVAILABLE), Some(code));
        }
    }
}
