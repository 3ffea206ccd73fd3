use async_trait::async_trait;
use postlist::application::document::LoadMoreState;
use postlist::application::listing::{
    ListingConfig, ListingStatus, LoadOutcome, PostListController, SearchOutcome,
};
use postlist::application::repos::{PostSource, SourceError};
use postlist::domain::entities::PostRecord;
use postlist::domain::posts::{self, UNCATEGORIZED_TOPIC};
use postlist::infra::document::MemoryDocument;
use postlist::infra::sources::StaticPostSource;
use postlist::presentation::views::PostCard;

fn feed() -> Vec<PostRecord> {
    posts::decode_feed(include_bytes!("fixtures/posts.json")).expect("fixture decodes")
}

struct UnreachableSource;

#[async_trait]
impl PostSource for UnreachableSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Err(SourceError::Status { status: 500 })
    }

    fn describe(&self) -> String {
        "unreachable".to_string()
    }
}

async fn controller_with_static(count: usize) -> PostListController<MemoryDocument> {
    let posts = feed();
    let document = MemoryDocument::new()
        .with_static_posts(&posts[..count])
        .with_featured()
        .with_topic_links(["all", "sql", "rust", "web"]);
    let source = StaticPostSource::new(posts);
    PostListController::initialize(document, &source, ListingConfig::default()).await
}

#[tokio::test]
async fn load_more_appends_remaining_posts_after_static_markup() {
    let mut controller = controller_with_static(5).await;
    assert_eq!(controller.status(), ListingStatus::Ready);
    assert_eq!(
        controller.document().load_more_state(),
        Some(&LoadMoreState::Available)
    );

    let outcome = controller.load_more();
    assert_eq!(
        outcome,
        LoadOutcome::Appended {
            count: 2,
            exhausted: true
        }
    );
    let titles = controller.document().titles();
    assert_eq!(
        &titles[5..],
        &["Window Functions Explained", "CSS Grid Layouts"]
    );

    let outcome = controller.load_more();
    assert_eq!(
        outcome,
        LoadOutcome::Appended {
            count: 0,
            exhausted: true
        }
    );
    assert_eq!(controller.document().titles().len(), 7);
    assert_eq!(
        controller.document().load_more_state(),
        Some(&LoadMoreState::Exhausted)
    );
}

#[tokio::test]
async fn exhausted_listing_ignores_further_loads() {
    let mut controller = controller_with_static(7).await;
    assert_eq!(
        controller.document().load_more_state(),
        Some(&LoadMoreState::Exhausted)
    );

    let before = controller.document().titles().len();
    for _ in 0..3 {
        controller.load_more();
    }
    assert_eq!(controller.document().titles().len(), before);
    assert_eq!(controller.state().rendered_count(), 7);
}

#[tokio::test]
async fn topic_pages_preserve_feed_order() {
    let mut controller = controller_with_static(5).await;

    controller.filter_by_topic("sql");
    assert_eq!(
        controller.document().titles(),
        vec!["Getting Started with SQL", "SQL tips for Analysts"]
    );
    assert_eq!(
        controller.document().load_more_state(),
        Some(&LoadMoreState::Available)
    );

    controller.load_more();
    assert_eq!(
        controller.document().titles(),
        vec![
            "Getting Started with SQL",
            "SQL tips for Analysts",
            "Window Functions Explained"
        ]
    );
    assert_eq!(
        controller.document().load_more_state(),
        Some(&LoadMoreState::Exhausted)
    );
}

#[tokio::test]
async fn topic_filter_renders_at_most_one_page() {
    let mut controller = controller_with_static(0).await;
    let page_size = controller.config().page_size.get();

    for topic in ["sql", "rust", "web", "all", "astrology"] {
        controller.filter_by_topic(topic);
        let subset = posts::count_applicable(
            controller.state().all_posts(),
            controller.state().current_topic(),
        );
        assert_eq!(
            controller.state().rendered_count(),
            page_size.min(subset),
            "topic {topic}"
        );
        assert_eq!(
            controller.document().titles().len(),
            controller.state().rendered_count()
        );
    }
}

#[tokio::test]
async fn unknown_topic_shows_no_results() {
    let mut controller = controller_with_static(5).await;

    controller.filter_by_topic("astrology");

    let document = controller.document();
    assert!(document.titles().is_empty());
    assert!(document.no_results_visible());
    assert_eq!(document.load_more_state(), Some(&LoadMoreState::Exhausted));
}

#[tokio::test]
async fn search_is_case_insensitive_over_title_and_topic() {
    let mut controller = controller_with_static(5).await;
    controller.load_more();

    let outcome = controller.apply_search("SQL");
    assert_eq!(
        outcome,
        Some(SearchOutcome {
            matched: 3,
            total: 7
        })
    );
    assert_eq!(
        controller.document().visible_titles(),
        vec![
            "Getting Started with SQL",
            "SQL tips for Analysts",
            "Window Functions Explained"
        ]
    );
    assert_eq!(controller.document().featured_visible(), Some(false));
    assert!(!controller.document().no_results_visible());
}

#[tokio::test]
async fn clearing_search_restores_rendered_cards() {
    let mut controller = controller_with_static(5).await;
    let before = controller.document().visible_titles().len();

    controller.apply_search("rust");
    assert_eq!(controller.document().visible_titles().len(), 2);

    controller.apply_search("");
    assert_eq!(controller.document().visible_titles().len(), before);
    assert_eq!(controller.document().featured_visible(), Some(true));
    assert!(!controller.document().no_results_visible());
}

#[tokio::test]
async fn search_without_matches_shows_indicator() {
    let mut controller = controller_with_static(5).await;

    let outcome = controller.apply_search("kubernetes");
    assert_eq!(outcome.map(|outcome| outcome.matched), Some(0));
    assert!(controller.document().visible_titles().is_empty());
    assert!(controller.document().no_results_visible());
    assert_eq!(controller.document().featured_visible(), Some(true));
}

#[tokio::test]
async fn missing_anchors_disable_loader_without_fetching() {
    let posts = feed();

    let source = StaticPostSource::new(posts.clone());
    let controller = PostListController::initialize(
        MemoryDocument::new().without_container(),
        &source,
        ListingConfig::default(),
    )
    .await;
    assert_eq!(controller.status(), ListingStatus::Inactive);
    assert_eq!(source.calls(), 0);

    let source = StaticPostSource::new(posts.clone());
    let mut controller = PostListController::initialize(
        MemoryDocument::new()
            .with_static_posts(&posts[..3])
            .without_load_more(),
        &source,
        ListingConfig::default(),
    )
    .await;
    assert_eq!(controller.status(), ListingStatus::Inactive);
    assert_eq!(source.calls(), 0);
    assert_eq!(controller.load_more(), LoadOutcome::Unavailable);

    // Search only needs the container.
    let outcome = controller.apply_search("rust");
    assert_eq!(outcome.map(|outcome| outcome.matched), Some(1));
}

#[tokio::test]
async fn search_requires_container() {
    let source = StaticPostSource::new(feed());
    let mut controller = PostListController::initialize(
        MemoryDocument::new().without_container(),
        &source,
        ListingConfig::default(),
    )
    .await;

    assert_eq!(controller.apply_search("sql"), None);
}

#[tokio::test]
async fn failed_fetch_shows_error_label() {
    let posts = feed();
    let document = MemoryDocument::new().with_static_posts(&posts[..5]);
    let config = ListingConfig {
        error_label: "Could not load posts".to_string(),
        ..ListingConfig::default()
    };
    let mut controller = PostListController::initialize(document, &UnreachableSource, config).await;

    assert_eq!(controller.status(), ListingStatus::Failed);
    assert_eq!(
        controller.document().load_more_label(),
        Some("Could not load posts")
    );
    assert!(matches!(
        controller.document().load_more_state(),
        Some(LoadMoreState::Failed { .. })
    ));
    assert_eq!(controller.load_more(), LoadOutcome::Unavailable);
    assert_eq!(controller.filter_by_topic("sql"), LoadOutcome::Unavailable);
    assert_eq!(controller.document().titles().len(), 5);

    let outcome = controller.apply_search("sql");
    assert_eq!(outcome.map(|outcome| outcome.matched), Some(2));
}

#[tokio::test]
async fn last_requested_topic_is_the_only_active_link() {
    let mut controller = controller_with_static(5).await;

    controller.filter_by_topic("sql");
    controller.filter_by_topic("web");
    assert_eq!(controller.document().active_topics(), vec!["web"]);

    controller.filter_by_topic("ALL");
    assert_eq!(controller.document().active_topics(), vec!["all"]);
}

#[tokio::test]
async fn search_survives_load_more_and_topic_change() {
    let mut controller = controller_with_static(0).await;

    controller.apply_search("window");
    assert!(controller.document().visible_titles().is_empty());

    controller.filter_by_topic("sql");
    controller.load_more();

    insta::assert_snapshot!(controller.document().outline(), @r"
    - Getting Started with SQL [sql]
    - SQL tips for Analysts [sql]
    + Window Functions Explained [sql]
    load-more: exhausted
    no-results: hidden
    featured: hidden
    ");
}

#[test]
fn records_without_topic_link_to_uncategorized_page() {
    let posts = posts::decode_feed(br#"[{"title": "Loose Notes"}, {"title": "Blank", "topic": "  "}]"#)
        .expect("feed decodes");

    for record in &posts {
        assert_eq!(record.topic, UNCATEGORIZED_TOPIC);
        let card = PostCard::from_record(record);
        assert_eq!(card.detail_href, "/posts/uncategorized.html");
    }
}

#[tokio::test]
async fn pages_without_loader_keep_topic_link_navigation() {
    let source = StaticPostSource::new(feed());
    let controller = PostListController::initialize(
        MemoryDocument::new().without_container(),
        &source,
        ListingConfig::default(),
    )
    .await;
    assert!(!controller.intercepts_topic_links());

    let controller =
        PostListController::initialize(MemoryDocument::new(), &UnreachableSource, ListingConfig::default())
            .await;
    assert!(!controller.intercepts_topic_links());

    let controller = controller_with_static(5).await;
    assert!(controller.intercepts_topic_links());
}
