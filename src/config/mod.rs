//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{num::NonZeroUsize, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::listing::{DEFAULT_ERROR_LABEL, DEFAULT_PAGE_SIZE, ListingConfig};
use crate::infra::sources::FeedLocation;

pub use cli::{CheckArgs, CliArgs, Command, FeedOverride, PreviewArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postlist";
const ENV_PREFIX: &str = "POSTLIST";
pub(crate) const DEFAULT_FEED_LOCATION: &str = "assets/data/posts.json";
pub(crate) const DEFAULT_STATIC_CARDS: usize = 5;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listing: ListingSettings,
    pub feed: FeedSettings,
    pub logging: LoggingSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub page_size: NonZeroUsize,
    pub error_label: String,
    pub known_topics: Vec<String>,
}

impl From<&ListingSettings> for ListingConfig {
    fn from(settings: &ListingSettings) -> Self {
        ListingConfig {
            page_size: settings.page_size,
            error_label: settings.error_label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub location: FeedLocation,
    /// `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct PreviewSettings {
    pub static_cards: usize,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_cli_overrides(cli);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    listing: RawListingSettings,
    feed: RawFeedSettings,
    logging: RawLoggingSettings,
    preview: RawPreviewSettings,
}

impl RawSettings {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(level) = cli.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = cli.log_json {
            self.logging.json = Some(json);
        }

        match &cli.command {
            Command::Check(args) => self.apply_feed_override(&args.feed),
            Command::Preview(args) => self.apply_preview_overrides(args),
        }
    }

    fn apply_feed_override(&mut self, overrides: &FeedOverride) {
        if let Some(location) = overrides.location.as_ref() {
            self.feed.location = Some(location.clone());
        }
    }

    fn apply_preview_overrides(&mut self, args: &PreviewArgs) {
        self.apply_feed_override(&args.feed);
        if let Some(count) = args.static_cards {
            self.preview.static_cards = Some(count);
        }
        if let Some(size) = args.page_size {
            self.listing.page_size = Some(size);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            listing,
            feed,
            logging,
            preview,
        } = raw;

        let listing = build_listing_settings(listing)?;
        let feed = build_feed_settings(feed)?;
        let logging = build_logging_settings(logging)?;
        let preview = build_preview_settings(preview)?;

        Ok(Self {
            listing,
            feed,
            logging,
            preview,
        })
    }
}

fn build_listing_settings(listing: RawListingSettings) -> Result<ListingSettings, LoadError> {
    let page_size_value = listing.page_size.unwrap_or(DEFAULT_PAGE_SIZE as u64);
    let page_size = usize::try_from(page_size_value)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| LoadError::invalid("listing.page_size", "must be greater than zero"))?;

    let error_label = listing
        .error_label
        .map(|label| label.trim().to_string())
        .unwrap_or_else(|| DEFAULT_ERROR_LABEL.to_string());
    if error_label.is_empty() {
        return Err(LoadError::invalid(
            "listing.error_label",
            "label must not be empty",
        ));
    }

    let known_topics = listing
        .known_topics
        .unwrap_or_default()
        .into_iter()
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty())
        .collect();

    Ok(ListingSettings {
        page_size,
        error_label,
        known_topics,
    })
}

fn build_feed_settings(feed: RawFeedSettings) -> Result<FeedSettings, LoadError> {
    let raw_location = feed
        .location
        .unwrap_or_else(|| DEFAULT_FEED_LOCATION.to_string());
    let location = FeedLocation::parse(&raw_location)
        .map_err(|err| LoadError::invalid("feed.location", err.to_string()))?;

    let timeout = match feed.timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "feed.timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(FeedSettings { location, timeout })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_preview_settings(preview: RawPreviewSettings) -> Result<PreviewSettings, LoadError> {
    let static_cards = match preview.static_cards {
        Some(value) => usize::try_from(value).map_err(|_| {
            LoadError::invalid(
                "preview.static_cards",
                "value exceeds supported range for usize",
            )
        })?,
        None => DEFAULT_STATIC_CARDS,
    };

    Ok(PreviewSettings { static_cards })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawListingSettings {
    page_size: Option<u64>,
    error_label: Option<String>,
    known_topics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFeedSettings {
    location: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPreviewSettings {
    static_cards: Option<u64>,
}

/// Parse the command line and load settings for it.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

#[cfg(test)]
mod tests;
