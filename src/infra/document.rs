//! A document tree held entirely in memory.
//!
//! Mirrors the elements the browser page carries so the listing can run
//! without a browser: in tests, and in the `preview` command.

use crate::application::document::{
    Anchor, DocumentError, LoadMoreState, PostDocument, RenderedCard,
};
use crate::domain::entities::PostRecord;
use crate::domain::types::TopicFilter;
use crate::presentation::views::{
    LoadMoreView, PostCard, PreviewTemplate, TemplateRenderError, render_card,
};

pub const DEFAULT_LOAD_MORE_LABEL: &str = "Load More";

#[derive(Debug, Clone)]
struct MemoryCard {
    card: PostCard,
    visible: bool,
}

#[derive(Debug, Clone)]
struct LoadMoreControl {
    label: String,
    state: LoadMoreState,
}

#[derive(Debug, Clone)]
struct TopicLink {
    topic: String,
    active: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    container: bool,
    cards: Vec<MemoryCard>,
    load_more: Option<LoadMoreControl>,
    no_results: Option<bool>,
    featured: Option<bool>,
    topic_links: Vec<TopicLink>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A listing page: container, load-more control and a hidden
    /// "no results" indicator. No featured section, no topic links.
    pub fn new() -> Self {
        Self {
            container: true,
            cards: Vec::new(),
            load_more: Some(LoadMoreControl {
                label: DEFAULT_LOAD_MORE_LABEL.to_string(),
                state: LoadMoreState::Available,
            }),
            no_results: Some(false),
            featured: None,
            topic_links: Vec::new(),
        }
    }

    /// Cards already present in the page's markup.
    pub fn with_static_posts(mut self, posts: &[PostRecord]) -> Self {
        self.cards.extend(posts.iter().map(|record| MemoryCard {
            card: PostCard::from_record(record),
            visible: true,
        }));
        self
    }

    pub fn with_featured(mut self) -> Self {
        self.featured = Some(true);
        self
    }

    pub fn with_topic_links<I, T>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.topic_links = topics
            .into_iter()
            .map(|topic| TopicLink {
                topic: topic.into(),
                active: false,
            })
            .collect();
        self
    }

    pub fn without_container(mut self) -> Self {
        self.container = false;
        self.cards.clear();
        self
    }

    pub fn without_load_more(mut self) -> Self {
        self.load_more = None;
        self
    }

    pub fn titles(&self) -> Vec<&str> {
        self.cards
            .iter()
            .map(|entry| entry.card.title.as_str())
            .collect()
    }

    pub fn visible_titles(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|entry| entry.visible)
            .map(|entry| entry.card.title.as_str())
            .collect()
    }

    pub fn load_more_state(&self) -> Option<&LoadMoreState> {
        self.load_more.as_ref().map(|control| &control.state)
    }

    pub fn load_more_label(&self) -> Option<&str> {
        self.load_more
            .as_ref()
            .map(|control| control.label.as_str())
    }

    pub fn no_results_visible(&self) -> bool {
        self.no_results.unwrap_or(false)
    }

    pub fn featured_visible(&self) -> Option<bool> {
        self.featured
    }

    pub fn active_topics(&self) -> Vec<&str> {
        self.topic_links
            .iter()
            .filter(|link| link.active)
            .map(|link| link.topic.as_str())
            .collect()
    }

    /// One line per card (`+` visible, `-` hidden), then the control states.
    pub fn outline(&self) -> String {
        let mut lines: Vec<String> = self
            .cards
            .iter()
            .map(|entry| {
                let marker = if entry.visible { '+' } else { '-' };
                format!("{marker} {} [{}]", entry.card.title, entry.card.topic)
            })
            .collect();

        let load_more = match self.load_more.as_ref().map(|control| &control.state) {
            None => "absent".to_string(),
            Some(LoadMoreState::Available) => "available".to_string(),
            Some(LoadMoreState::Exhausted) => "exhausted".to_string(),
            Some(LoadMoreState::Failed { label }) => format!("failed ({label})"),
        };
        lines.push(format!("load-more: {load_more}"));

        let no_results = if self.no_results_visible() {
            "shown"
        } else {
            "hidden"
        };
        lines.push(format!("no-results: {no_results}"));

        if let Some(visible) = self.featured {
            let featured = if visible { "shown" } else { "hidden" };
            lines.push(format!("featured: {featured}"));
        }

        lines.join("\n")
    }

    pub fn to_html(&self) -> Result<String, TemplateRenderError> {
        let cards = self
            .cards
            .iter()
            .map(|entry| render_card(&entry.card, !entry.visible))
            .collect::<Result<Vec<_>, _>>()?;

        let load_more = self.load_more.as_ref().map(|control| LoadMoreView {
            label: control.label.clone(),
            hidden: control.state == LoadMoreState::Exhausted,
            disabled: control.state != LoadMoreState::Available,
        });

        PreviewTemplate {
            cards,
            load_more,
            has_no_results: self.no_results.is_some(),
            no_results_visible: self.no_results_visible(),
            has_featured: self.featured.is_some(),
            featured_visible: self.featured.unwrap_or(false),
        }
        .render_html()
    }
}

impl PostDocument for MemoryDocument {
    fn has_anchor(&self, anchor: Anchor) -> bool {
        match anchor {
            Anchor::Container => self.container,
            Anchor::LoadMore => self.load_more.is_some(),
        }
    }

    fn rendered_cards(&self) -> Vec<RenderedCard> {
        self.cards
            .iter()
            .map(|entry| RenderedCard {
                title: entry.card.title.clone(),
                topic: entry.card.topic.clone(),
            })
            .collect()
    }

    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn append_card(&mut self, card: &PostCard) -> Result<(), DocumentError> {
        if !self.container {
            return Err(DocumentError::dom("post container is missing"));
        }
        self.cards.push(MemoryCard {
            card: card.clone(),
            visible: true,
        });
        Ok(())
    }

    fn clear_cards(&mut self) {
        self.cards.clear();
    }

    fn set_card_visible(&mut self, index: usize, visible: bool) {
        if let Some(entry) = self.cards.get_mut(index) {
            entry.visible = visible;
        }
    }

    fn set_load_more(&mut self, state: &LoadMoreState) {
        if let Some(control) = self.load_more.as_mut() {
            if let LoadMoreState::Failed { label } = state {
                control.label = label.clone();
            }
            control.state = state.clone();
        }
    }

    fn set_no_results_visible(&mut self, visible: bool) {
        if let Some(current) = self.no_results.as_mut() {
            *current = visible;
        }
    }

    fn set_featured_visible(&mut self, visible: bool) {
        if let Some(current) = self.featured.as_mut() {
            *current = visible;
        }
    }

    fn mark_active_topic(&mut self, topic: &TopicFilter) {
        let mut found = false;
        for link in &mut self.topic_links {
            link.active = !found && TopicFilter::parse(&link.topic) == *topic;
            found |= link.active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_state_replaces_label() {
        let mut document = MemoryDocument::new();
        document.set_load_more(&LoadMoreState::Failed {
            label: "Error loading posts".to_string(),
        });
        assert_eq!(document.load_more_label(), Some("Error loading posts"));
    }

    #[test]
    fn all_link_matches_all_filter() {
        let mut document = MemoryDocument::new().with_topic_links(["All", "sql", "rust"]);
        document.mark_active_topic(&TopicFilter::parse("sql"));
        document.mark_active_topic(&TopicFilter::All);
        assert_eq!(document.active_topics(), vec!["All"]);
    }

    #[test]
    fn duplicate_topic_links_activate_once() {
        let mut document = MemoryDocument::new().with_topic_links(["all", "sql", "rust", "sql"]);
        document.mark_active_topic(&TopicFilter::parse("sql"));
        assert_eq!(document.active_topics(), vec!["sql"]);
    }

    #[test]
    fn html_marks_hidden_cards_and_exhausted_control() {
        let posts = [PostRecord::new("Joins", "sql"), PostRecord::new("Traits", "rust")];
        let mut document = MemoryDocument::new().with_static_posts(&posts);
        document.set_card_visible(1, false);
        document.set_load_more(&LoadMoreState::Exhausted);

        let html = document.to_html().expect("preview renders");
        assert!(html.contains("data-count=\"2\""));
        assert!(html.contains("data-topic=\"rust\" hidden>"));
        assert!(html.contains("id=\"load-more\" class=\"load-more\" hidden"));
        assert!(html.contains("id=\"no-results\" hidden"));
    }

    #[test]
    fn outline_lists_cards_and_controls() {
        let posts = [PostRecord::new("Joins", "sql")];
        let document = MemoryDocument::new().with_static_posts(&posts).with_featured();
        insta::assert_snapshot!(document.outline(), @r"
        + Joins [sql]
        load-more: available
        no-results: hidden
        featured: shown
        ");
    }
}
