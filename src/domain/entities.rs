//! Records decoded from the static post feed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::posts::UNCATEGORIZED_TOPIC;

/// One entry of the post feed, in the order the feed lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    /// Display string; never parsed.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default = "uncategorized", deserialize_with = "deserialize_topic")]
    pub topic: String,
}

impl PostRecord {
    pub fn new(title: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: String::new(),
            summary: String::new(),
            image: String::new(),
            alt: String::new(),
            topic: topic.into(),
        }
    }
}

fn uncategorized() -> String {
    UNCATEGORIZED_TOPIC.to_string()
}

fn deserialize_topic<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(uncategorized))
}
