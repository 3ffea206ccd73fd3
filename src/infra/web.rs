//! Browser binding: live DOM elements behind [`PostDocument`] and a
//! `gloo-net` fetch behind [`PostSource`].

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, NodeList, console,
};

use crate::application::document::{
    Anchor, DocumentError, LoadMoreState, PostDocument, RenderedCard,
};
use crate::application::listing::{ListingConfig, PostListController};
use crate::application::repos::{PostSource, SourceError};
use crate::domain::entities::PostRecord;
use crate::domain::posts;
use crate::domain::types::TopicFilter;
use crate::infra::sources::DEFAULT_FEED_PATH;
use crate::presentation::views::{PostCard, render_card};

const CARD_SELECTOR: &str = ".post-card";
const CARD_TITLE_SELECTOR: &str = "h3";
const TOPIC_ATTRIBUTE: &str = "data-topic";
const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone)]
pub struct Selectors {
    pub load_more: &'static str,
    pub container: &'static str,
    pub search_input: &'static str,
    pub search_button: &'static str,
    pub search_clear: &'static str,
    pub topic_links: &'static str,
    pub no_results: &'static str,
    pub featured: &'static str,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            load_more: "#load-more",
            container: "#post-grid",
            search_input: "#search-input",
            search_button: "#search-button",
            search_clear: "#search-clear",
            topic_links: ".topic-link",
            no_results: "#no-results",
            featured: "#featured",
        }
    }
}

pub struct WebDocument {
    load_more: Option<Element>,
    container: Option<Element>,
    search_input: Option<HtmlInputElement>,
    search_button: Option<Element>,
    search_clear: Option<Element>,
    no_results: Option<Element>,
    featured: Option<Element>,
    topic_links: Vec<Element>,
}

impl WebDocument {
    pub fn locate(document: &Document, selectors: &Selectors) -> Self {
        let find = |selector: &str| document.query_selector(selector).ok().flatten();

        Self {
            load_more: find(selectors.load_more),
            container: find(selectors.container),
            search_input: find(selectors.search_input)
                .and_then(|element| element.dyn_into::<HtmlInputElement>().ok()),
            search_button: find(selectors.search_button),
            search_clear: find(selectors.search_clear),
            no_results: find(selectors.no_results),
            featured: find(selectors.featured),
            topic_links: document
                .query_selector_all(selectors.topic_links)
                .map(|list| collect_elements(&list))
                .unwrap_or_default(),
        }
    }

    fn cards(&self) -> Vec<Element> {
        self.container
            .as_ref()
            .and_then(|container| container.query_selector_all(CARD_SELECTOR).ok())
            .map(|list| collect_elements(&list))
            .unwrap_or_default()
    }
}

fn collect_elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Toggles both the `hidden` attribute and an inline `display: none`, so site
/// CSS that sets `display` cannot keep the element on screen.
fn set_hidden(element: &Element, hidden: bool) {
    let result = if hidden {
        element.set_attribute("hidden", "")
    } else {
        element.remove_attribute("hidden")
    };
    if let Err(err) = result {
        console::warn_1(&err);
    }

    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let style = element.style();
        let result = if hidden {
            style.set_property("display", "none")
        } else {
            style.remove_property("display").map(|_| ())
        };
        if let Err(err) = result {
            console::warn_1(&err);
        }
    }
}

fn set_disabled(element: &Element, disabled: bool) {
    let result = if disabled {
        element
            .set_attribute("disabled", "")
            .and_then(|()| element.set_attribute("aria-disabled", "true"))
    } else {
        element
            .remove_attribute("disabled")
            .and_then(|()| element.remove_attribute("aria-disabled"))
    };
    if let Err(err) = result {
        console::warn_1(&err);
    }
}

impl PostDocument for WebDocument {
    fn has_anchor(&self, anchor: Anchor) -> bool {
        match anchor {
            Anchor::LoadMore => self.load_more.is_some(),
            Anchor::Container => self.container.is_some(),
        }
    }

    fn rendered_cards(&self) -> Vec<RenderedCard> {
        self.cards()
            .iter()
            .map(|card| RenderedCard {
                title: card
                    .query_selector(CARD_TITLE_SELECTOR)
                    .ok()
                    .flatten()
                    .and_then(|heading| heading.text_content())
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                topic: card.get_attribute(TOPIC_ATTRIBUTE).unwrap_or_default(),
            })
            .collect()
    }

    fn append_card(&mut self, card: &PostCard) -> Result<(), DocumentError> {
        let container = self
            .container
            .as_ref()
            .ok_or_else(|| DocumentError::dom("post container is missing"))?;
        let html = render_card(card, false)?;
        container
            .insert_adjacent_html("beforeend", &html)
            .map_err(|err| DocumentError::dom(format!("{err:?}")))
    }

    fn clear_cards(&mut self) {
        for card in self.cards() {
            card.remove();
        }
    }

    fn set_card_visible(&mut self, index: usize, visible: bool) {
        if let Some(card) = self.cards().get(index) {
            set_hidden(card, !visible);
        }
    }

    fn set_load_more(&mut self, state: &LoadMoreState) {
        let Some(control) = self.load_more.as_ref() else {
            return;
        };
        match state {
            LoadMoreState::Available => {
                set_hidden(control, false);
                set_disabled(control, false);
            }
            LoadMoreState::Exhausted => {
                set_hidden(control, true);
                set_disabled(control, true);
            }
            LoadMoreState::Failed { label } => {
                control.set_text_content(Some(label.as_str()));
                set_disabled(control, true);
            }
        }
    }

    fn set_no_results_visible(&mut self, visible: bool) {
        if let Some(indicator) = self.no_results.as_ref() {
            set_hidden(indicator, !visible);
        }
    }

    fn set_featured_visible(&mut self, visible: bool) {
        if let Some(featured) = self.featured.as_ref() {
            set_hidden(featured, !visible);
        }
    }

    fn mark_active_topic(&mut self, topic: &TopicFilter) {
        let mut found = false;
        for link in &self.topic_links {
            // Links without a topic key never become active.
            let active = !found
                && link
                    .get_attribute(TOPIC_ATTRIBUTE)
                    .is_some_and(|key| TopicFilter::parse(&key) == *topic);
            found |= active;
            if let Err(err) = link.class_list().toggle_with_force(ACTIVE_CLASS, active) {
                console::warn_1(&err);
            }
        }
    }
}

/// Fetches the feed relative to the page's origin.
pub struct GlooPostSource {
    path: String,
}

impl GlooPostSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait(?Send)]
impl PostSource for GlooPostSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        let response = Request::get(&self.path)
            .send()
            .await
            .map_err(SourceError::transport)?;
        if !response.ok() {
            return Err(SourceError::Status {
                status: response.status(),
            });
        }
        let bytes = response.binary().await.map_err(SourceError::transport)?;
        Ok(posts::decode_feed(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

type SharedController = Rc<RefCell<PostListController<WebDocument>>>;

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn with_controller(
    controller: &SharedController,
    action: impl FnOnce(&mut PostListController<WebDocument>),
) {
    if let Ok(mut controller) = controller.try_borrow_mut() {
        action(&mut controller);
    }
}

/// Wire the listing on the current page.
///
/// Search listeners are attached right away. Load-more and topic listeners
/// are attached once the feed fetch has settled, so clicks before that are
/// inert.
#[wasm_bindgen(js_name = mountPostList)]
pub async fn mount_post_list(
    page_size: Option<u32>,
    feed_path: Option<String>,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document available"))?;

    let mut config = ListingConfig::default();
    if let Some(size) = page_size.and_then(|value| NonZeroUsize::new(value as usize)) {
        config.page_size = size;
    }

    let web_document = WebDocument::locate(&document, &Selectors::default());
    let load_more = web_document.load_more.clone();
    let search_input = web_document.search_input.clone();
    let search_button = web_document.search_button.clone();
    let search_clear = web_document.search_clear.clone();
    let topic_links = web_document.topic_links.clone();

    let controller = PostListController::new(web_document, config);
    let wants_feed = controller.wants_feed();
    let controller: SharedController = Rc::new(RefCell::new(controller));

    if let Some(input) = search_input.clone() {
        let controller = Rc::clone(&controller);
        let source_input = input.clone();
        listen(&input, "input", move |_event| {
            let query = source_input.value();
            with_controller(&controller, |controller| {
                controller.apply_search(&query);
            });
        })?;
    }

    if let (Some(button), Some(input)) = (search_button, search_input.clone()) {
        let controller = Rc::clone(&controller);
        listen(&button, "click", move |event| {
            event.prevent_default();
            let query = input.value();
            with_controller(&controller, |controller| {
                controller.apply_search(&query);
            });
        })?;
    }

    if let Some(clear) = search_clear {
        let controller = Rc::clone(&controller);
        listen(&clear, "click", move |event| {
            event.prevent_default();
            if let Some(input) = search_input.as_ref() {
                input.set_value("");
            }
            with_controller(&controller, |controller| {
                controller.clear_search();
            });
        })?;
    }

    if !wants_feed {
        return Ok(());
    }

    // The fetch runs without holding the controller, so search stays live.
    let source = GlooPostSource::new(feed_path.unwrap_or_else(|| DEFAULT_FEED_PATH.to_string()));
    let result = source.fetch_posts().await;
    let failed = result.is_err();
    controller
        .try_borrow_mut()
        .map_err(|_| JsValue::from_str("post listing is busy"))?
        .finish_loading(&source.describe(), result);
    if failed {
        let message = format!("failed to load post feed from {}", source.describe());
        console::error_1(&JsValue::from_str(&message));
    }

    if let Some(control) = load_more {
        let controller = Rc::clone(&controller);
        listen(&control, "click", move |event| {
            event.prevent_default();
            with_controller(&controller, |controller| {
                controller.load_more();
            });
        })?;
    }

    for link in topic_links {
        let controller = Rc::clone(&controller);
        let topic = link.get_attribute(TOPIC_ATTRIBUTE).unwrap_or_default();
        listen(&link, "click", move |event| {
            with_controller(&controller, |controller| {
                // Links keep navigating unless the listing can serve them.
                if controller.intercepts_topic_links() {
                    event.prevent_default();
                    controller.filter_by_topic(&topic);
                }
            });
        })?;
    }

    Ok(())
}
