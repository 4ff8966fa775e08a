//! Provide near-match suggestions for unknown property names.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use vc_utils::strsim::folded_distance;

/// Proposes property names close to a mistyped one.
///
/// Distances are case-insensitive Levenshtein distances. Names within
/// `max_distance` are ordered by distance, then by name, and capped at
/// `max_suggestions`.
///
/// # Examples
///
/// ```
/// use vc_property::suggest::SuggestionEngine;
///
/// let engine = SuggestionEngine::default();
/// let names = ["name", "myString", "myStriNg", "myStringss"];
/// assert_eq!(
///     engine.suggest("mystring", names),
///     ["myStriNg", "myString", "myStringss"],
/// );
/// assert!(engine.suggest("zzz", names).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct SuggestionEngine {
    /// Largest distance still suggested.
    pub max_distance: usize,
    /// Largest number of suggestions returned.
    pub max_suggestions: usize,
}

impl Default for SuggestionEngine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionEngine {
    /// Creates an engine with distance 2 and at most 5 suggestions.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_distance: 2,
            max_suggestions: 5,
        }
    }

    /// Returns the candidates close to `invalid`. Never fails.
    pub fn suggest<'a>(
        &self,
        invalid: &str,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut matches: Vec<(usize, &str)> = candidates
            .into_iter()
            .filter_map(|name| {
                folded_distance(invalid, name, self.max_distance).map(|distance| (distance, name))
            })
            .collect();

        matches.sort_unstable();
        matches.dedup_by(|a, b| a.1 == b.1);
        matches.truncate(self.max_suggestions);
        matches.into_iter().map(|(_, name)| name.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::SuggestionEngine;

    #[test]
    fn single_close_name() {
        let engine = SuggestionEngine::new();
        let names = ["age", "name", "touchy", "spouse", "nicknames", "ratings"];
        assert_eq!(engine.suggest("ag", names), ["age"]);
        assert_eq!(engine.suggest("names", names.into_iter().chain(["title"])), ["name"]);
    }

    #[test]
    fn duplicates_and_cap() {
        let engine = SuggestionEngine {
            max_distance: 1,
            max_suggestions: 2,
        };
        let names = ["ab", "ac", "ab", "ad", "abc"];
        assert_eq!(engine.suggest("ab", names), ["ab", "abc"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_partial_config() {
        let engine: SuggestionEngine = serde_json::from_str(r#"{"max_distance": 3}"#).unwrap();
        assert_eq!(engine.max_distance, 3);
        assert_eq!(engine.max_suggestions, 5);
    }
}
