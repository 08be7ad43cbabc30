use std::ffi::OsString;

use clap::Parser;
use taskgrid_core::cli::{GlobalCli, KeyVal, OutputFormat, preprocess_args};
use taskgrid_core::config::Config;
use taskgrid_core::sort::SortOrder;
use taskgrid_core::table::IconGlyphs;

#[test]
fn rc_file_comments_includes_and_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("taskgridrc");
    let extra = dir.path().join("extra.rc");

    std::fs::write(
        &base,
        "# task table settings\napi.url = http://example.test/api/tasks/uncompleted/\ninclude extra.rc\n",
    )
    .expect("write base rc");
    std::fs::write(&extra, "icon.ascending = ^ # plain ascii\nrequest.timeout = 0\n")
        .expect("write extra rc");

    let mut cfg = Config::load(Some(&base)).expect("load config");

    assert_eq!(
        cfg.get("api.url").as_deref(),
        Some("http://example.test/api/tasks/uncompleted/")
    );
    assert_eq!(cfg.get("icon.ascending").as_deref(), Some("^"));
    assert_eq!(cfg.get("request.timeout").as_deref(), Some("0"));
    // untouched defaults survive the file load
    assert_eq!(cfg.get("icon.descending").as_deref(), Some("\u{25bc}"));
    assert_eq!(
        cfg.get("table.completed.id").as_deref(),
        Some("completed-tasks-table")
    );
    assert_eq!(cfg.loaded_files.len(), 2);

    cfg.apply_overrides([("rc.color".to_string(), "off".to_string())]);
    assert_eq!(cfg.get_bool("color"), Some(false));
}

#[test]
fn missing_rc_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.rc");
    assert!(Config::load(Some(&missing)).is_err());
}

#[test]
fn positional_rc_overrides_are_captured() {
    let raw: Vec<OsString> = ["taskgrid", "rc.color=off", "title", "rc.icon.ascending:+"]
        .iter()
        .map(OsString::from)
        .collect();

    let pre = preprocess_args(&raw).expect("preprocess");

    assert_eq!(pre.cleaned_args, vec![OsString::from("taskgrid"), OsString::from("title")]);
    assert_eq!(
        pre.rc_overrides,
        vec![
            ("rc.color".to_string(), "off".to_string()),
            ("rc.icon.ascending".to_string(), "+".to_string()),
        ]
    );
}

#[test]
fn cli_collects_clicks_in_order() {
    let cli = GlobalCli::parse_from([
        "taskgrid",
        "--api-url",
        "http://example.test/api/",
        "--format",
        "text",
        "-vv",
        "title",
        "title",
        "date_added",
    ]);

    assert_eq!(cli.api_url.as_deref(), Some("http://example.test/api/"));
    assert_eq!(cli.format, OutputFormat::Text);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.table, "uncompleted-tasks-table");
    assert_eq!(cli.clicks, vec!["title", "title", "date_added"]);
}

#[test]
fn key_val_requires_an_equals_sign() {
    assert!("color".parse::<KeyVal>().is_err());

    let kv = "icon.descending = v".parse::<KeyVal>().expect("parse key=value");
    assert_eq!(kv.key, "icon.descending");
    assert_eq!(kv.value, "v");
}

#[test]
fn icon_glyphs_follow_configuration() {
    let dir = tempfile::tempdir().expect("tempdir");
    let rc = dir.path().join("taskgridrc");
    std::fs::write(&rc, "icon.ascending = ^\nicon.descending = v\n").expect("write rc");

    let cfg = Config::load(Some(&rc)).expect("load config");
    let glyphs = IconGlyphs::from_config(&cfg);

    assert_eq!(glyphs.for_order(SortOrder::Asc), "^");
    assert_eq!(glyphs.for_order(SortOrder::Desc), "v");
}
