//! Variation resolution.

use crate::tree::Variation;

/// Pick the variation to render for `(language, version)`.
///
/// Tiers, each returning the first match in declaration order:
/// 1. same language and version
/// 2. same version, any language
/// 3. same language, any version
/// 4. the first variation
///
/// Tier 2 does not look for the closest older version; any exact version
/// match wins. Returns `None` only for an empty list.
#[must_use]
pub fn resolve<'a>(
    variations: &'a [Variation],
    language: &str,
    version: &str,
) -> Option<&'a Variation> {
    variations
        .iter()
        .find(|v| v.language == language && v.version == version)
        .or_else(|| variations.iter().find(|v| v.version == version))
        .or_else(|| variations.iter().find(|v| v.language == language))
        .or_else(|| variations.first())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn variation(language: &str, version: &str) -> Variation {
        Variation {
            url: "page".to_owned(),
            language: language.to_owned(),
            version: version.to_owned(),
            filename: PathBuf::from(format!("page_{language}_{version}.md")),
            title: format!("{language}/{version}"),
        }
    }

    fn pick<'a>(variations: &'a [Variation], language: &str, version: &str) -> Option<&'a str> {
        resolve(variations, language, version).map(|v| v.title.as_str())
    }

    #[test]
    fn test_exact_match() {
        let vs = vec![variation("en", "v1"), variation("es", "v1")];

        assert_eq!(pick(&vs, "es", "v1"), Some("es/v1"));
    }

    #[test]
    fn test_version_tier_beats_language_tier() {
        let vs = vec![variation("en", "v1"), variation("es", "v1"), variation("en", "v2")];

        assert_eq!(pick(&vs, "es", "v2"), Some("en/v2"));
    }

    #[test]
    fn test_language_tier() {
        let vs = vec![variation("en", "v1"), variation("es", "v1")];

        assert_eq!(pick(&vs, "es", "v2"), Some("es/v1"));
    }

    #[test]
    fn test_first_variation_is_last_resort() {
        let vs = vec![variation("en", "v1"), variation("es", "v1")];

        assert_eq!(pick(&vs, "zh", "v3"), Some("en/v1"));
    }

    #[test]
    fn test_earliest_match_within_tier() {
        let vs = vec![variation("en", "v2"), variation("es", "v2")];

        assert_eq!(pick(&vs, "zh", "v2"), Some("en/v2"));
    }

    #[test]
    fn test_unspecified_tokens_match_empty_request_only() {
        let vs = vec![variation("", ""), variation("es", "")];

        assert_eq!(pick(&vs, "es", "v1"), Some("es/"));
        assert_eq!(pick(&vs, "en", "v1"), Some("/"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(pick(&[], "en", "v1"), None);
    }

    #[test]
    fn test_deterministic() {
        let vs = vec![variation("en", "v1"), variation("es", "v2"), variation("zh", "v1")];

        for _ in 0..3 {
            assert_eq!(pick(&vs, "es", "v1"), Some("en/v1"));
        }
    }
}
