use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::domain::entities::PostRecord;
use crate::domain::posts;

#[derive(Debug, Error)]
#[error("template `{template}` failed to render")]
pub struct TemplateRenderError {
    pub(crate) template: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(template: &'static str, error: AskamaError) -> Self {
        Self { template, error }
    }
}

/// Everything a rendered card shows for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub title: String,
    pub date: String,
    pub summary: String,
    pub image: String,
    pub alt: String,
    pub topic: String,
    pub detail_href: String,
}

impl PostCard {
    pub fn from_record(record: &PostRecord) -> Self {
        Self {
            title: record.title.clone(),
            date: record.date.clone(),
            summary: record.summary.clone(),
            image: record.image.clone(),
            alt: record.alt.clone(),
            topic: record.topic.clone(),
            detail_href: posts::detail_path(&record.topic),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/post_card.html")]
pub struct PostCardTemplate<'a> {
    pub card: &'a PostCard,
    pub hidden: bool,
}

pub fn render_card(card: &PostCard, hidden: bool) -> Result<String, TemplateRenderError> {
    PostCardTemplate { card, hidden }
        .render()
        .map_err(|err| TemplateRenderError::new("partials/post_card.html", err))
}

#[derive(Debug, Clone)]
pub struct LoadMoreView {
    pub label: String,
    pub hidden: bool,
    pub disabled: bool,
}

/// Listing markup as the in-memory document currently holds it.
#[derive(Template)]
#[template(path = "preview.html")]
pub struct PreviewTemplate {
    /// Pre-rendered card markup.
    pub cards: Vec<String>,
    pub load_more: Option<LoadMoreView>,
    pub has_no_results: bool,
    pub no_results_visible: bool,
    pub has_featured: bool,
    pub featured_visible: bool,
}

impl PreviewTemplate {
    pub fn render_html(&self) -> Result<String, TemplateRenderError> {
        self.render()
            .map_err(|err| TemplateRenderError::new("preview.html", err))
    }
}
