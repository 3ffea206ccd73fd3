//! Post feed adapters: in-memory, filesystem, and HTTP.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use url::Url;

use crate::application::repos::{PostSource, SourceError};
use crate::domain::entities::PostRecord;

/// Path the blog publishes its feed under.
pub const DEFAULT_FEED_PATH: &str = "/assets/data/posts.json";

/// Where a feed lives: an `http(s)` URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Url(Url),
    Path(PathBuf),
}

impl FeedLocation {
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SourceError::invalid_location(raw, "location must not be empty"));
        }

        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|err| SourceError::invalid_location(trimmed, err.to_string()))?;
            return Ok(FeedLocation::Url(url));
        }

        Ok(FeedLocation::Path(PathBuf::from(trimmed)))
    }
}

impl FromStr for FeedLocation {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedLocation::Url(url) => write!(f, "{url}"),
            FeedLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Serves a feed that is already in memory and counts how often it was asked.
#[derive(Debug, Default)]
pub struct StaticPostSource {
    posts: Vec<PostRecord>,
    calls: AtomicUsize,
}

impl StaticPostSource {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        Self {
            posts,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PostSource for StaticPostSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.posts.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} posts)", self.posts.len())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{FilePostSource, HttpPostSource, open_source};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::{Client, Url};

    use super::FeedLocation;
    use crate::application::repos::{PostSource, SourceError};
    use crate::domain::entities::PostRecord;
    use crate::domain::posts;

    pub struct HttpPostSource {
        client: Client,
        url: Url,
    }

    impl HttpPostSource {
        /// `timeout` of `None` keeps reqwest's default.
        pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, SourceError> {
            let mut builder = Client::builder().user_agent(Self::user_agent());
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder.build().map_err(SourceError::transport)?;
            Ok(Self { client, url })
        }

        pub fn user_agent() -> &'static str {
            concat!("postlist/", env!("CARGO_PKG_VERSION"))
        }
    }

    #[async_trait]
    impl PostSource for HttpPostSource {
        async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
            let response = self
                .client
                .get(self.url.clone())
                .send()
                .await
                .map_err(SourceError::transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status {
                    status: status.as_u16(),
                });
            }

            let bytes = response.bytes().await.map_err(SourceError::transport)?;
            Ok(posts::decode_feed(&bytes)?)
        }

        fn describe(&self) -> String {
            self.url.to_string()
        }
    }

    pub struct FilePostSource {
        path: PathBuf,
    }

    impl FilePostSource {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }
    }

    #[async_trait]
    impl PostSource for FilePostSource {
        async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
            let bytes = tokio::fs::read(&self.path).await?;
            Ok(posts::decode_feed(&bytes)?)
        }

        fn describe(&self) -> String {
            self.path.display().to_string()
        }
    }

    pub fn open_source(
        location: &FeedLocation,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn PostSource + Send + Sync>, SourceError> {
        match location {
            FeedLocation::Url(url) => Ok(Box::new(HttpPostSource::new(url.clone(), timeout)?)),
            FeedLocation::Path(path) => Ok(Box::new(FilePostSource::new(path.clone()))),
        }
    }
}
