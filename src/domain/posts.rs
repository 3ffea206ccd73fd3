use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;
use crate::domain::types::TopicFilter;

/// Topic assigned to records that arrive without one.
pub const UNCATEGORIZED_TOPIC: &str = "uncategorized";

/// Parse the feed body. Any malformed record rejects the whole feed.
pub fn decode_feed(bytes: &[u8]) -> Result<Vec<PostRecord>, DomainError> {
    serde_json::from_slice(bytes).map_err(|err| DomainError::decode(err.to_string()))
}

/// Per-topic detail page linked from a card.
pub fn detail_path(topic: &str) -> String {
    format!("/posts/{topic}.html")
}

/// The ordered subsequence of `posts` the filter admits.
pub fn applicable<'a>(posts: &'a [PostRecord], filter: &TopicFilter) -> Vec<&'a PostRecord> {
    posts
        .iter()
        .filter(|post| filter.matches(&post.topic))
        .collect()
}

pub fn count_applicable(posts: &[PostRecord], filter: &TopicFilter) -> usize {
    posts
        .iter()
        .filter(|post| filter.matches(&post.topic))
        .count()
}

/// Half-open range of the next page, clamped to `len`.
pub fn page_window(rendered: usize, page_size: usize, len: usize) -> (usize, usize) {
    let start = rendered.min(len);
    let end = start.saturating_add(page_size).min(len);
    (start, end)
}

/// Topics in the order they first appear in the feed.
pub fn distinct_topics(posts: &[PostRecord]) -> Vec<&str> {
    let mut topics: Vec<&str> = Vec::new();
    for post in posts {
        if !topics.contains(&post.topic.as_str()) {
            topics.push(post.topic.as_str());
        }
    }
    topics
}
