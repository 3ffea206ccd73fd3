//! Filter values applied to the post listing.

use std::fmt;

/// Topic selection; `All` is the `"all"` sentinel used by navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicFilter {
    #[default]
    All,
    Topic(String),
}

impl TopicFilter {
    pub const ALL_KEY: &'static str = "all";

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ALL_KEY) {
            TopicFilter::All
        } else {
            TopicFilter::Topic(trimmed.to_string())
        }
    }

    pub fn key(&self) -> &str {
        match self {
            TopicFilter::All => Self::ALL_KEY,
            TopicFilter::Topic(value) => value.as_str(),
        }
    }

    pub fn matches(&self, topic: &str) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Topic(value) => value == topic,
        }
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Search text after trimming and lower-casing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An empty query matches everything.
    pub fn matches(&self, title: &str, topic: &str) -> bool {
        self.is_empty()
            || title.to_lowercase().contains(&self.0)
            || topic.to_lowercase().contains(&self.0)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_is_case_insensitive() {
        assert_eq!(TopicFilter::parse("all"), TopicFilter::All);
        assert_eq!(TopicFilter::parse("  ALL "), TopicFilter::All);
        assert_eq!(TopicFilter::parse(""), TopicFilter::All);
    }

    #[test]
    fn topic_keys_are_trimmed_but_keep_case() {
        let filter = TopicFilter::parse(" Rust ");
        assert_eq!(filter, TopicFilter::Topic("Rust".to_string()));
        assert!(filter.matches("Rust"));
        assert!(!filter.matches("rust"));
    }

    #[test]
    fn query_matches_title_or_topic_ignoring_case() {
        let query = SearchQuery::normalize("  SQL ");
        assert_eq!(query.as_str(), "sql");
        assert!(query.matches("Ten SQL tips", "databases"));
        assert!(query.matches("Indexes explained", "sql"));
        assert!(!query.matches("Borrow checker", "rust"));
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = SearchQuery::normalize("   ");
        assert!(query.is_empty());
        assert!(query.matches("anything", "any"));
    }
}
