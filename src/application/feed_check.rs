//! Lint report over a decoded post feed.

use std::collections::HashSet;
use std::fmt;

use crate::domain::entities::PostRecord;
use crate::domain::posts::UNCATEGORIZED_TOPIC;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FeedReport {
    pub total: usize,
    /// In first-seen order.
    pub topics: Vec<TopicCount>,
    /// Titles of records filed under the fallback topic.
    pub uncategorized: Vec<String>,
    /// Topics absent from the configured list; empty when no list is configured.
    pub unknown_topics: Vec<String>,
    pub duplicate_titles: Vec<String>,
}

impl FeedReport {
    pub fn build(posts: &[PostRecord], known_topics: &[String]) -> Self {
        let mut report = FeedReport {
            total: posts.len(),
            ..FeedReport::default()
        };

        let mut seen_titles: HashSet<&str> = HashSet::new();
        for post in posts {
            match report.topics.iter_mut().find(|entry| entry.topic == post.topic) {
                Some(entry) => entry.count += 1,
                None => report.topics.push(TopicCount {
                    topic: post.topic.clone(),
                    count: 1,
                }),
            }

            if post.topic == UNCATEGORIZED_TOPIC {
                report.uncategorized.push(post.title.clone());
            }

            if !seen_titles.insert(post.title.as_str())
                && !report.duplicate_titles.contains(&post.title)
            {
                report.duplicate_titles.push(post.title.clone());
            }
        }

        if !known_topics.is_empty() {
            report.unknown_topics = report
                .topics
                .iter()
                .filter(|entry| !known_topics.iter().any(|known| *known == entry.topic))
                .map(|entry| entry.topic.clone())
                .collect();
        }

        report
    }

    pub fn findings(&self) -> usize {
        self.uncategorized.len() + self.unknown_topics.len() + self.duplicate_titles.len()
    }

    pub fn has_findings(&self) -> bool {
        self.findings() > 0
    }
}

impl fmt::Display for FeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "posts: {}", self.total)?;
        writeln!(f, "topics:")?;
        for entry in &self.topics {
            writeln!(f, "  {}: {}", entry.topic, entry.count)?;
        }

        for title in &self.uncategorized {
            writeln!(f, "warning: `{title}` has no topic; filed under {UNCATEGORIZED_TOPIC}")?;
        }
        for topic in &self.unknown_topics {
            writeln!(f, "warning: topic `{topic}` is not a known topic")?;
        }
        for title in &self.duplicate_titles {
            writeln!(f, "warning: title `{title}` appears more than once")?;
        }

        write!(f, "findings: {}", self.findings())
    }
}
