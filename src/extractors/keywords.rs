// src/extractors/keywords.rs
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::utils::error::AppError;

// --- Default Keyword Lists ---
const DEFAULT_START_KEYWORDS: &[&str] = &[
    "qualification",
    "eligibility",
    "mandatory eligibility criteria",
    "financial criteria",
    "bid capacity criteria",
    "participate for bidding",
];

const DEFAULT_STOP_KEYWORDS: &[&str] = &[
    "bid capacity",
    "compensation",
    "scope of work",
    "clause",
    "asphalt plant.",
];

const DEFAULT_IRRELEVANT_PHRASES: &[&str] = &[
    "financial year",
    "compounded",
    "multiplying",
    "applicable factor",
];

const DEFAULT_HEADING_KEYWORDS: &[&str] = &[
    "mandatory eligibility criteria",
    "eligibility criteria",
];

static DEFAULT_CONFIG: Lazy<KeywordConfig> = Lazy::new(|| KeywordConfig {
    start: KeywordSet::new(DEFAULT_START_KEYWORDS.iter().copied()),
    stop: KeywordSet::new(DEFAULT_STOP_KEYWORDS.iter().copied()),
    irrelevant: KeywordSet::new(DEFAULT_IRRELEVANT_PHRASES.iter().copied()),
    heading: KeywordSet::new(DEFAULT_HEADING_KEYWORDS.iter().copied()),
});

/// An immutable set of lower-cased phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    phrases: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lowered: Vec<String> = Vec::new();
        for phrase in phrases {
            let phrase = phrase.as_ref().trim().to_lowercase();
            if !phrase.is_empty() && !lowered.contains(&phrase) {
                lowered.push(phrase);
            }
        }
        Self { phrases: lowered }
    }

    /// True when any phrase occurs as a substring of `lowered`.
    /// `lowered` must already be lower-cased.
    pub fn any_contained_in(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }

    /// True when `lowered` equals one of the phrases exactly.
    pub fn matches_exactly(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|p| p == lowered)
    }

    #[cfg(test)]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// The four keyword sets driving both extraction strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordConfig {
    pub start: KeywordSet,
    pub stop: KeywordSet,
    pub irrelevant: KeywordSet,
    pub heading: KeywordSet,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

/// On-disk shape of a keyword file. Omitted fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeywordFile {
    start: Option<Vec<String>>,
    stop: Option<Vec<String>>,
    irrelevant: Option<Vec<String>>,
    heading: Option<Vec<String>>,
}

impl KeywordConfig {
    /// Parses a JSON keyword configuration.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let file: KeywordFile = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Invalid keyword configuration: {}", e)))?;

        let defaults = KeywordConfig::default();
        let pick = |custom: Option<Vec<String>>, fallback: KeywordSet| match custom {
            Some(list) => KeywordSet::new(list),
            None => fallback,
        };

        let config = KeywordConfig {
            start: pick(file.start, defaults.start),
            stop: pick(file.stop, defaults.stop),
            irrelevant: pick(file.irrelevant, defaults.irrelevant),
            heading: pick(file.heading, defaults.heading),
        };

        if config.heading.is_empty() && config.start.is_empty() {
            tracing::warn!("Keyword configuration has no heading or start keywords; nothing can be extracted");
        }
        Ok(config)
    }

    /// Loads a JSON keyword configuration from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read keyword file {}: {}", path.display(), e))
        })?;
        tracing::info!("Loaded keyword configuration from {}", path.display());
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_lowercase() {
        let config = KeywordConfig::default();
        assert!(config.heading.matches_exactly("mandatory eligibility criteria"));
        assert!(config.start.any_contained_in("the bidder qualification shall include"));
        assert!(config.irrelevant.any_contained_in("in the financial year 2020"));
        assert!(config.stop.any_contained_in("see scope of work below"));
    }

    #[test]
    fn test_exact_match_is_not_substring() {
        let set = KeywordSet::new(["eligibility criteria"]);
        assert!(set.matches_exactly("eligibility criteria"));
        assert!(!set.matches_exactly("general eligibility criteria"));
        assert!(set.any_contained_in("general eligibility criteria"));
    }

    #[test]
    fn test_keyword_set_lowercases_and_dedups() {
        let set = KeywordSet::new(["Scope Of Work", "scope of work", "  "]);
        assert_eq!(set.phrases(), &["scope of work".to_string()]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = KeywordConfig::from_json(r#"{ "stop": ["Annexure"] }"#).unwrap();
        assert_eq!(config.stop.phrases(), &["annexure".to_string()]);
        assert_eq!(config.start, KeywordConfig::default().start);
        assert_eq!(config.heading, KeywordConfig::default().heading);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = KeywordConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = KeywordConfig::from_json(r#"{ "begin": ["x"] }"#).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeywordConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
