//! Incremental post listing with topic and search filters.

use std::num::NonZeroUsize;

use metrics::counter;
use tracing::{debug, error, info, warn};

use crate::application::document::{
    Anchor, LoadMoreState, PostDocument, REQUIRED_ANCHORS, RenderedCard,
};
use crate::application::repos::{PostSource, SourceError};
use crate::domain::entities::PostRecord;
use crate::domain::posts;
use crate::domain::types::{SearchQuery, TopicFilter};
use crate::presentation::views::PostCard;

pub const DEFAULT_PAGE_SIZE: usize = 2;
pub const DEFAULT_ERROR_LABEL: &str = "Error loading posts";

#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub page_size: NonZeroUsize,
    /// Replaces the load-more label when the feed cannot be fetched.
    pub error_label: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            error_label: DEFAULT_ERROR_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    /// Required anchors are missing; the loader never fetched.
    Inactive,
    /// The fetch failed; the control shows the error label.
    Failed,
    Ready,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    all_posts: Vec<PostRecord>,
    rendered_count: usize,
    current_topic: TopicFilter,
    search_query: SearchQuery,
}

impl ViewState {
    pub fn all_posts(&self) -> &[PostRecord] {
        &self.all_posts
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered_count
    }

    pub fn current_topic(&self) -> &TopicFilter {
        &self.current_topic
    }

    pub fn search_query(&self) -> &SearchQuery {
        &self.search_query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The feed is not loaded, so nothing can be rendered.
    Unavailable,
    Appended { count: usize, exhausted: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matched: usize,
    pub total: usize,
}

pub struct PostListController<D> {
    document: D,
    config: ListingConfig,
    status: ListingStatus,
    state: ViewState,
}

impl<D: PostDocument> PostListController<D> {
    /// A controller over the page's static markup, before any fetch.
    ///
    /// Search already works at this point; loading and topic filtering wait
    /// for [`finish_loading`](Self::finish_loading).
    pub fn new(document: D, config: ListingConfig) -> Self {
        let rendered_count = document.card_count();
        Self {
            document,
            config,
            status: ListingStatus::Inactive,
            state: ViewState {
                rendered_count,
                ..ViewState::default()
            },
        }
    }

    /// Whether the page carries the anchors the loader needs.
    pub fn wants_feed(&self) -> bool {
        let missing: Vec<Anchor> = REQUIRED_ANCHORS
            .into_iter()
            .filter(|anchor| !self.document.has_anchor(*anchor))
            .collect();
        if !missing.is_empty() {
            info!(
                target: "postlist::listing",
                ?missing,
                "listing anchors absent; loader disabled"
            );
            return false;
        }
        true
    }

    /// Check the page's anchors and fetch the feed once.
    ///
    /// Never fails: a page without the loader's anchors yields an inactive
    /// controller, and a failed fetch is surfaced on the load-more control.
    pub async fn initialize<S>(document: D, source: &S, config: ListingConfig) -> Self
    where
        S: PostSource + ?Sized,
    {
        let mut controller = Self::new(document, config);
        if !controller.wants_feed() {
            return controller;
        }

        let origin = source.describe();
        debug!(target: "postlist::listing", source = %origin, "fetching post feed");
        let result = source.fetch_posts().await;
        controller.finish_loading(&origin, result);
        controller
    }

    /// Store the fetched feed, or surface the failure on the load-more control.
    pub fn finish_loading(&mut self, origin: &str, result: Result<Vec<PostRecord>, SourceError>) {
        match result {
            Ok(all_posts) => {
                info!(
                    target: "postlist::listing",
                    source = %origin,
                    posts = all_posts.len(),
                    static_cards = self.state.rendered_count,
                    "post feed loaded"
                );
                self.state.all_posts = all_posts;
                self.status = ListingStatus::Ready;
                self.sync_load_more();
                self.refresh_visibility();
            }
            Err(err) => {
                counter!("postlist_feed_fetch_failures_total").increment(1);
                error!(
                    target: "postlist::listing",
                    source = %origin,
                    error = %err,
                    "failed to load post feed"
                );
                self.status = ListingStatus::Failed;
                let label = self.config.error_label.clone();
                self.document
                    .set_load_more(&LoadMoreState::Failed { label });
            }
        }
    }

    pub fn status(&self) -> ListingStatus {
        self.status
    }

    /// Whether topic links should be handled here instead of navigating.
    pub fn intercepts_topic_links(&self) -> bool {
        self.status == ListingStatus::Ready
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Append the next page of the current topic's posts.
    pub fn load_more(&mut self) -> LoadOutcome {
        if self.status != ListingStatus::Ready {
            debug!(
                target: "postlist::listing",
                status = ?self.status,
                "load more ignored"
            );
            return LoadOutcome::Unavailable;
        }

        let outcome = self.render_next_page();
        self.refresh_visibility();
        outcome
    }

    /// Re-render from scratch with only `topic`'s posts (or all of them for `"all"`).
    pub fn filter_by_topic(&mut self, topic: &str) -> LoadOutcome {
        if self.status != ListingStatus::Ready {
            debug!(
                target: "postlist::listing",
                status = ?self.status,
                topic,
                "topic filter ignored"
            );
            return LoadOutcome::Unavailable;
        }

        let topic = TopicFilter::parse(topic);
        debug!(target: "postlist::listing", topic = %topic, "filtering by topic");

        self.document.clear_cards();
        self.state.rendered_count = 0;
        self.document.mark_active_topic(&topic);
        self.state.current_topic = topic;

        let outcome = self.render_next_page();
        self.refresh_visibility();
        outcome
    }

    /// Show only rendered cards whose title or topic contains `query`.
    ///
    /// Returns `None` on pages without a post container.
    pub fn apply_search(&mut self, query: &str) -> Option<SearchOutcome> {
        if !self.document.has_anchor(Anchor::Container) {
            return None;
        }

        self.state.search_query = SearchQuery::normalize(query);
        if !self.state.search_query.is_empty() {
            counter!("postlist_search_queries_total").increment(1);
        }

        let outcome = self.refresh_visibility();
        debug!(
            target: "postlist::listing",
            query = %self.state.search_query,
            matched = outcome.matched,
            total = outcome.total,
            "search applied"
        );
        Some(outcome)
    }

    pub fn clear_search(&mut self) -> Option<SearchOutcome> {
        self.apply_search("")
    }

    fn render_next_page(&mut self) -> LoadOutcome {
        let subset = posts::applicable(&self.state.all_posts, &self.state.current_topic);
        let total = subset.len();
        let (start, end) =
            posts::page_window(self.state.rendered_count, self.config.page_size.get(), total);

        let mut appended = 0;
        for record in &subset[start..end] {
            let card = PostCard::from_record(record);
            if let Err(err) = self.document.append_card(&card) {
                warn!(
                    target: "postlist::listing",
                    title = %record.title,
                    error = %err,
                    "failed to append post card"
                );
                break;
            }
            appended += 1;
        }

        self.state.rendered_count += appended;
        if appended > 0 {
            counter!("postlist_cards_appended_total").increment(appended as u64);
        }

        let exhausted = self.state.rendered_count >= total;
        self.document.set_load_more(&if exhausted {
            LoadMoreState::Exhausted
        } else {
            LoadMoreState::Available
        });

        LoadOutcome::Appended {
            count: appended,
            exhausted,
        }
    }

    fn sync_load_more(&mut self) {
        let total = posts::count_applicable(&self.state.all_posts, &self.state.current_topic);
        let state = if self.state.rendered_count >= total {
            LoadMoreState::Exhausted
        } else {
            LoadMoreState::Available
        };
        self.document.set_load_more(&state);
    }

    fn refresh_visibility(&mut self) -> SearchOutcome {
        let cards: Vec<RenderedCard> = self.document.rendered_cards();
        let query = &self.state.search_query;

        let mut matched = 0;
        for (index, card) in cards.iter().enumerate() {
            let visible = query.matches(&card.title, &card.topic);
            if visible {
                matched += 1;
            }
            self.document.set_card_visible(index, visible);
        }

        let searching = !query.is_empty();
        let topic_is_empty = self.status == ListingStatus::Ready
            && cards.is_empty()
            && posts::count_applicable(&self.state.all_posts, &self.state.current_topic) == 0;

        self.document
            .set_no_results_visible((searching && matched == 0) || topic_is_empty);
        self.document
            .set_featured_visible(!(searching && matched > 0));

        SearchOutcome {
            matched,
            total: cards.len(),
        }
    }
}
