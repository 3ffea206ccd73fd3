use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the postlist binary.
#[derive(Debug, Parser)]
#[command(
    name = "postlist",
    version,
    about = "Lint post feeds and preview listing sessions"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "POSTLIST_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fetch the post feed and report problems with its records.
    Check(CheckArgs),
    /// Replay a listing session in memory and print the resulting markup.
    Preview(PreviewArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct FeedOverride {
    /// Feed location: an http(s) URL or a file path.
    #[arg(long = "feed", value_name = "LOCATION")]
    pub location: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub feed: FeedOverride,

    /// Exit with an error when the report has any findings.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub strict: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub feed: FeedOverride,

    /// Number of leading posts treated as static markup.
    #[arg(long = "static-cards", value_name = "COUNT")]
    pub static_cards: Option<u64>,

    /// Override the number of posts appended per load-more activation.
    #[arg(long = "page-size", value_name = "COUNT")]
    pub page_size: Option<u64>,

    /// Topic to filter by before loading more.
    #[arg(long, value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Search query applied last.
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// How many times to activate load-more.
    #[arg(long = "load-more", value_name = "COUNT", default_value_t = 0)]
    pub load_more: usize,

    /// Print one line per card instead of markup.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub outline: bool,
}
