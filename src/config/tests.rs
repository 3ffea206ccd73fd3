use std::io::Write;
use std::path::PathBuf;

use super::*;

fn preview_cli(args: PreviewArgs) -> CliArgs {
    CliArgs {
        config_file: None,
        log_level: None,
        log_json: None,
        command: Command::Preview(args),
    }
}

#[test]
fn defaults_match_published_listing() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.listing.page_size.get(), 2);
    assert_eq!(settings.listing.error_label, "Error loading posts");
    assert!(settings.listing.known_topics.is_empty());
    assert_eq!(
        settings.feed.location,
        FeedLocation::Path(PathBuf::from("assets/data/posts.json"))
    );
    assert!(settings.feed.timeout.is_none());
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(settings.preview.static_cards, 5);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.listing.page_size = Some(6);
    raw.feed.location = Some("feeds/old.json".to_string());
    raw.logging.level = Some("info".to_string());

    let cli = CliArgs {
        log_level: Some("debug".to_string()),
        ..preview_cli(PreviewArgs {
            feed: FeedOverride {
                location: Some("https://blog.example/assets/data/posts.json".to_string()),
            },
            page_size: Some(3),
            static_cards: Some(1),
            ..Default::default()
        })
    };

    raw.apply_cli_overrides(&cli);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.listing.page_size.get(), 3);
    assert_eq!(settings.preview.static_cards, 1);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(matches!(settings.feed.location, FeedLocation::Url(_)));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let cli = CliArgs {
        log_json: Some(true),
        ..preview_cli(PreviewArgs::default())
    };

    raw.apply_cli_overrides(&cli);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_page_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.listing.page_size = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero page size");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "listing.page_size",
            ..
        }
    ));
}

#[test]
fn zero_timeout_is_rejected() {
    let mut raw = RawSettings::default();
    raw.feed.timeout_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero timeout");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "feed.timeout_seconds",
            ..
        }
    ));
}

#[test]
fn blank_error_label_is_rejected() {
    let mut raw = RawSettings::default();
    raw.listing.error_label = Some("   ".to_string());

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn unparsable_feed_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.feed.location = Some("http://".to_string());

    let err = Settings::from_raw(raw).expect_err("bad url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "feed.location",
            ..
        }
    ));
}

#[test]
fn known_topics_are_trimmed() {
    let mut raw = RawSettings::default();
    raw.listing.known_topics = Some(vec![" sql ".to_string(), "".to_string(), "rust".to_string()]);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.listing.known_topics, vec!["sql", "rust"]);
}

#[test]
fn listing_settings_convert_to_controller_config() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    let config = ListingConfig::from(&settings.listing);

    assert_eq!(config.page_size.get(), 2);
    assert_eq!(config.error_label, DEFAULT_ERROR_LABEL);
}

#[test]
fn config_file_is_layered_under_cli() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    writeln!(
        file,
        "[listing]\npage_size = 4\nerror_label = \"Feed down\"\nknown_topics = [\"sql\"]\n\n[feed]\ntimeout_seconds = 9\n\n[preview]\nstatic_cards = 2"
    )
    .expect("write config");

    let cli = CliArgs {
        config_file: Some(file.path().to_path_buf()),
        ..preview_cli(PreviewArgs {
            static_cards: Some(0),
            ..Default::default()
        })
    };

    let settings = load(&cli).expect("settings load");
    assert_eq!(settings.listing.page_size.get(), 4);
    assert_eq!(settings.listing.error_label, "Feed down");
    assert_eq!(settings.listing.known_topics, vec!["sql"]);
    assert_eq!(settings.feed.timeout, Some(Duration::from_secs(9)));
    assert_eq!(settings.preview.static_cards, 0);
}

#[test]
fn missing_config_file_fails_to_build() {
    let cli = CliArgs {
        config_file: Some(PathBuf::from("/nonexistent/postlist.toml")),
        ..preview_cli(PreviewArgs::default())
    };

    assert!(matches!(load(&cli), Err(LoadError::Build(_))));
}

#[test]
fn parse_check_arguments() {
    let args = CliArgs::parse_from([
        "postlist",
        "check",
        "--feed",
        "https://blog.example/posts.json",
        "--strict",
    ]);

    match args.command {
        Command::Check(check) => {
            assert!(check.strict);
            assert_eq!(
                check.feed.location.as_deref(),
                Some("https://blog.example/posts.json")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_preview_arguments() {
    let args = CliArgs::parse_from([
        "postlist",
        "--log-json=true",
        "preview",
        "--static-cards",
        "3",
        "--topic",
        "sql",
        "--search",
        "Joins",
        "--load-more",
        "2",
        "--outline",
    ]);

    assert_eq!(args.log_json, Some(true));
    match args.command {
        Command::Preview(preview) => {
            assert_eq!(preview.static_cards, Some(3));
            assert_eq!(preview.topic.as_deref(), Some("sql"));
            assert_eq!(preview.search.as_deref(), Some("Joins"));
            assert_eq!(preview.load_more, 2);
            assert!(preview.outline);
            assert!(preview.page_size.is_none());
        }
        _ => panic!("wrong command parsed"),
    }
}
