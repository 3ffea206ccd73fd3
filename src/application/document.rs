//! The document tree as seen by the listing controller.
//!
//! Adapters acquire their element handles once, when they are built; the
//! controller only ever talks to them through [`PostDocument`].

use thiserror::Error;

use crate::domain::types::TopicFilter;
use crate::presentation::views::{PostCard, TemplateRenderError};

/// Elements the listing looks up on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    LoadMore,
    Container,
}

/// Anchors without which the loader disables itself.
pub const REQUIRED_ANCHORS: [Anchor; 2] = [Anchor::LoadMore, Anchor::Container];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMoreState {
    Available,
    Exhausted,
    Failed { label: String },
}

/// What search needs to know about a card already in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub title: String,
    pub topic: String,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    #[error("document operation failed: {0}")]
    Dom(String),
}

impl DocumentError {
    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom(message.into())
    }
}

pub trait PostDocument {
    fn has_anchor(&self, anchor: Anchor) -> bool;

    /// Cards currently in the container, in document order.
    fn rendered_cards(&self) -> Vec<RenderedCard>;

    fn card_count(&self) -> usize {
        self.rendered_cards().len()
    }

    fn append_card(&mut self, card: &PostCard) -> Result<(), DocumentError>;

    fn clear_cards(&mut self);

    /// Out-of-range indexes are ignored.
    fn set_card_visible(&mut self, index: usize, visible: bool);

    fn set_load_more(&mut self, state: &LoadMoreState);

    fn set_no_results_visible(&mut self, visible: bool);

    /// No-op on pages without a featured section.
    fn set_featured_visible(&mut self, visible: bool);

    /// Only the first selector whose topic equals `topic` ends up active.
    fn mark_active_topic(&mut self, topic: &TopicFilter);
}
