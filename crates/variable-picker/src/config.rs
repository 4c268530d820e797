//! Picker configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default values for [`PickerConfig`]
pub mod defaults {
    /// Delay before an outside click or blur actually closes the picker
    pub const CLOSE_DELAY_MS: u64 = 150;
    /// Characters shown in a sample value preview
    pub const PREVIEW_MAX_CHARS: usize = 60;
    /// Search is case-insensitive unless configured otherwise
    pub const CASE_SENSITIVE_SEARCH: bool = false;
}

/// Tunables for the picker's interaction behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Debounce before a pending close is applied, in milliseconds.
    /// Gives clicks on the picker's own controls time to re-focus it.
    pub close_delay_ms: u64,
    /// Maximum characters in a sample value preview
    pub preview_max_chars: usize,
    /// Whether search matching respects case
    pub case_sensitive_search: bool,
    /// Cap on the number of nodes listed (None = unlimited)
    pub max_node_results: Option<usize>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: defaults::CLOSE_DELAY_MS,
            preview_max_chars: defaults::PREVIEW_MAX_CHARS,
            case_sensitive_search: defaults::CASE_SENSITIVE_SEARCH,
            max_node_results: None,
        }
    }
}

impl PickerConfig {
    /// Parse config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The close debounce as a duration
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    /// Whether `haystack` matches the search term under this config
    pub fn matches(&self, haystack: &str, search: &str) -> bool {
        if search.is_empty() {
            return true;
        }
        if self.case_sensitive_search {
            haystack.contains(search)
        } else {
            haystack.to_lowercase().contains(&search.to_lowercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PickerConfig::default();
        assert_eq!(config.close_delay(), Duration::from_millis(150));
        assert_eq!(config.preview_max_chars, 60);
        assert!(!config.case_sensitive_search);
        assert!(config.max_node_results.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            PickerConfig::from_json(r#"{"closeDelayMs": 0, "maxNodeResults": 5}"#).unwrap();
        assert_eq!(config.close_delay_ms, 0);
        assert_eq!(config.max_node_results, Some(5));
        assert_eq!(config.preview_max_chars, defaults::PREVIEW_MAX_CHARS);
    }

    #[test]
    fn test_invalid_json() {
        assert!(PickerConfig::from_json(r#"{"closeDelayMs": "soon"}"#).is_err());
    }

    #[test]
    fn test_matches() {
        let config = PickerConfig::default();
        assert!(config.matches("Fetch User", "user"));
        assert!(config.matches("Fetch User", ""));
        assert!(!config.matches("Fetch User", "mail"));

        let strict = PickerConfig {
            case_sensitive_search: true,
            ..PickerConfig::default()
        };
        assert!(!strict.matches("Fetch User", "user"));
        assert!(strict.matches("Fetch User", "User"));
    }
}
