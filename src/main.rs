#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::process;

    use postlist::{
        application::{
            error::AppError,
            feed_check::FeedReport,
            listing::{ListingConfig, PostListController},
        },
        config,
        domain::{entities::PostRecord, posts, types::TopicFilter},
        infra::{
            document::MemoryDocument,
            sources::{StaticPostSource, open_source},
            telemetry,
        },
    };
    use tracing::{Dispatch, Level, dispatcher, error, info};
    use tracing_subscriber::fmt as tracing_fmt;

    pub async fn main() {
        if let Err(error) = run().await {
            report_application_error(&error);
            process::exit(1);
        }
    }

    fn report_application_error(error: &AppError) {
        if dispatcher::has_been_set() {
            error!(error = %error, "application error");
            return;
        }

        let subscriber = tracing_fmt()
            .with_max_level(Level::ERROR)
            .with_writer(std::io::stderr)
            .finish();
        let dispatch = Dispatch::new(subscriber);
        dispatcher::with_default(&dispatch, || {
            error!(error = %error, "application error");
        });
    }

    async fn run() -> Result<(), AppError> {
        let (cli_args, settings) = config::load_with_cli()
            .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

        telemetry::init(&settings.logging).map_err(AppError::from)?;

        match cli_args.command {
            config::Command::Check(args) => run_check(settings, args).await,
            config::Command::Preview(args) => run_preview(settings, args).await,
        }
    }

    async fn fetch(settings: &config::Settings) -> Result<Vec<PostRecord>, AppError> {
        let source = open_source(&settings.feed.location, settings.feed.timeout)?;
        info!(
            target: "postlist::fetch",
            source = %source.describe(),
            "Fetching post feed"
        );
        Ok(source.fetch_posts().await?)
    }

    async fn run_check(settings: config::Settings, args: config::CheckArgs) -> Result<(), AppError> {
        let posts = fetch(&settings).await?;
        let report = FeedReport::build(&posts, &settings.listing.known_topics);
        println!("{report}");

        if args.strict && report.has_findings() {
            return Err(AppError::validation(format!(
                "feed has {} finding(s)",
                report.findings()
            )));
        }
        Ok(())
    }

    async fn run_preview(
        settings: config::Settings,
        args: config::PreviewArgs,
    ) -> Result<(), AppError> {
        let posts = fetch(&settings).await?;
        let static_count = settings.preview.static_cards.min(posts.len());

        let topic_links: Vec<String> = std::iter::once(TopicFilter::ALL_KEY.to_string())
            .chain(posts::distinct_topics(&posts).into_iter().map(str::to_string))
            .collect();
        let document = MemoryDocument::new()
            .with_static_posts(&posts[..static_count])
            .with_featured()
            .with_topic_links(topic_links);

        let source = StaticPostSource::new(posts);
        let mut controller = PostListController::initialize(
            document,
            &source,
            ListingConfig::from(&settings.listing),
        )
        .await;

        if let Some(topic) = args.topic.as_deref() {
            controller.filter_by_topic(topic);
        }
        for _ in 0..args.load_more {
            controller.load_more();
        }
        if let Some(query) = args.search.as_deref() {
            controller.apply_search(query);
        }

        info!(
            target: "postlist::preview",
            status = ?controller.status(),
            rendered = controller.state().rendered_count(),
            "Preview session finished"
        );

        let document = controller.into_document();
        if args.outline {
            println!("{}", document.outline());
        } else {
            println!("{}", document.to_html()?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    cli::main().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {}
