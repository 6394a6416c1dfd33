//! Selector configuration.
//!
//! Teams configure which test-automation attributes their markup carries as
//! a comma-separated preference list, e.g. `"data-qa,data-testid"`. Entries
//! wrapped in slashes are treated as regular expressions matched against
//! attribute names (`"/^data-test.*/"`).

use regex::Regex;
use tracing::warn;

/// Default preference order for explicit test attributes.
pub const DEFAULT_ATTRIBUTE_CSV: &str = "data-cy,data-e2e,data-qa,data-test,data-testid";

/// One configured test-attribute entry.
#[derive(Clone, Debug)]
pub enum AttributePattern {
    Exact(String),
    Pattern(Regex),
}

impl AttributePattern {
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        if entry.len() > 2 && entry.starts_with('/') && entry.ends_with('/') {
            let source = &entry[1..entry.len() - 1];
            match Regex::new(source) {
                Ok(regex) => return Some(AttributePattern::Pattern(regex)),
                Err(err) => {
                    warn!(entry, %err, "invalid attribute pattern skipped");
                    return None;
                }
            }
        }
        Some(AttributePattern::Exact(entry.to_string()))
    }

    /// Whether this entry selects the given attribute name.
    pub fn matches(&self, attribute: &str) -> bool {
        match self {
            AttributePattern::Exact(name) => name == attribute,
            AttributePattern::Pattern(regex) => regex.is_match(attribute),
        }
    }
}

/// Configuration for cue extraction and selector building.
#[derive(Clone, Debug)]
pub struct SelectorConfig {
    /// Ordered test-attribute preference list; first match wins.
    pub test_attributes: Vec<AttributePattern>,

    /// How many ancestor levels the builder may add while widening scope.
    pub max_ancestor_levels: usize,

    /// Longest canonical text that may become a text cue.
    pub text_cue_limit: usize,
}

impl SelectorConfig {
    /// Parse a comma-separated test-attribute list into a config.
    pub fn from_attribute_csv(csv: &str) -> Self {
        Self {
            test_attributes: csv.split(',').filter_map(AttributePattern::parse).collect(),
            ..Self::default()
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            test_attributes: DEFAULT_ATTRIBUTE_CSV
                .split(',')
                .filter_map(AttributePattern::parse)
                .collect(),
            max_ancestor_levels: 5,
            text_cue_limit: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_entries_in_order() {
        let config = SelectorConfig::from_attribute_csv("data-qa, data-testid");
        assert_eq!(config.test_attributes.len(), 2);
        assert!(config.test_attributes[0].matches("data-qa"));
        assert!(!config.test_attributes[0].matches("data-testid"));
        assert!(config.test_attributes[1].matches("data-testid"));
    }

    #[test]
    fn parses_regex_entries() {
        let config = SelectorConfig::from_attribute_csv("/^data-test.*/");
        assert_eq!(config.test_attributes.len(), 1);
        assert!(config.test_attributes[0].matches("data-testid"));
        assert!(config.test_attributes[0].matches("data-test"));
        assert!(!config.test_attributes[0].matches("data-qa"));
    }

    #[test]
    fn invalid_regex_entries_are_skipped() {
        let config = SelectorConfig::from_attribute_csv("/(/,data-qa");
        assert_eq!(config.test_attributes.len(), 1);
        assert!(config.test_attributes[0].matches("data-qa"));
    }
}
