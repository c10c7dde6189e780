// DaocLog - tests/e2e_parse.rs
//
// End-to-end tests for the parse pipeline.
//
// These tests exercise the real filesystem, real template loading,
// real regex matching and real chrono timestamp parsing, from a raw log
// file on disk to rendered output.

use chrono::NaiveTime;
use daoclog::app::run::run;
use daoclog::app::template_mgr::load_all_templates;
use daoclog::core::classifier::Classifier;
use daoclog::core::export::OutputFormat;
use daoclog::core::stream::collect_events;
use daoclog::platform::fs::open_log;
use daoclog::util::error::{DaocLogError, ParseError};
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

// =============================================================================
// Fixture parsing
// =============================================================================

/// The sample session contains four damage-dealt lines the grammar accepts.
#[test]
fn e2e_fixture_yields_only_damage_dealt_lines() {
    let path = fixture("combat_sample.log");
    let reader = open_log(&path).unwrap();
    let (events, err) = collect_events(reader, &Classifier::builtin(), &path);

    assert!(err.is_none(), "unexpected error: {err:?}");
    let damage: Vec<_> = events.iter().map(|e| e.as_damage().unwrap()).collect();
    assert_eq!(damage.len(), 4, "got {damage:#?}");

    assert_eq!(damage[0].timestamp, hms(20, 14, 11));
    assert_eq!(damage[0].target, "forest giant");
    assert_eq!(damage[0].damage_amount, 87);
    assert_eq!(damage[0].damage_type, "slash");

    assert_eq!(damage[1].target, "forest giant");
    assert_eq!(damage[1].damage_amount, 0);
    assert_eq!(damage[1].damage_type, "Unknown");

    assert_eq!(damage[2].target, "a hill troll");
    assert_eq!(damage[2].damage_type, "thrust");

    // The [99:14:19] line is skipped; the unterminated heat line is not.
    assert_eq!(damage[3].timestamp, hms(20, 14, 20));
    assert_eq!(damage[3].damage_type, "heat");

    assert!(damage.iter().all(|d| d.source == "You"));
}

/// Running the full pipeline twice over the same file gives identical output.
#[test]
fn e2e_run_is_repeatable() {
    let path = fixture("combat_sample.log");
    let classifier = Classifier::builtin();

    let mut first = Vec::new();
    let mut second = Vec::new();
    run(&path, &classifier, OutputFormat::Text, &mut first).unwrap();
    run(&path, &classifier, OutputFormat::Text, &mut second).unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert_eq!(
        text.lines().next().unwrap(),
        "[20:14:11] You hit forest giant for 87 slash damage"
    );
}

/// JSON output is one parseable object per event, in file order.
#[test]
fn e2e_json_output() {
    let path = fixture("combat_sample.log");
    let mut out = Vec::new();
    let summary = run(&path, &Classifier::builtin(), OutputFormat::Json, &mut out).unwrap();

    assert_eq!(summary.events_written, 4);
    assert_eq!(summary.stream.lines_read, 16);

    let amounts: Vec<u64> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["damage_amount"].as_u64().unwrap()
        })
        .collect();
    assert_eq!(amounts, vec![87, 0, 112, 31]);
}

// =============================================================================
// Error paths
// =============================================================================

/// A missing log produces no events and an error naming the path.
#[test]
fn e2e_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_chat.log");

    let mut out = Vec::new();
    let err = run(&path, &Classifier::builtin(), OutputFormat::Text, &mut out).unwrap_err();

    match &err {
        DaocLogError::Parse(ParseError::FileNotFound { path: reported }) => {
            assert_eq!(reported, &path)
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }
    assert!(err.to_string().contains("no_such_chat.log"));
    assert!(out.is_empty());
}

/// A file with no recognisable lines is a successful, empty run.
#[test]
fn e2e_file_without_combat_is_empty_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat.log");
    fs::write(&path, "You sneeze.\n[10:00:00] You miss!\n\n").unwrap();

    let mut out = Vec::new();
    let summary = run(&path, &Classifier::builtin(), OutputFormat::Text, &mut out).unwrap();
    assert_eq!(summary.events_written, 0);
    assert_eq!(summary.stream.skipped, 3);
    assert!(out.is_empty());
}

// =============================================================================
// User templates
// =============================================================================

/// A template dropped into the user directory extends the grammar to other
/// actors without touching the built-in one.
#[test]
fn e2e_user_template_extends_grammar() {
    let dir = tempfile::tempdir().unwrap();
    let templates_dir = dir.path().join("templates");
    fs::create_dir(&templates_dir).unwrap();
    fs::write(
        templates_dir.join("incoming.toml"),
        r#"
[template]
id = "daoc-damage-taken"
name = "Damage taken"

[grammar]
pattern = '\[(?P<timestamp>[0-9]{2}:[0-9]{2}:[0-9]{2})\]\s+(?:The )?(?P<source>.+?) hits (?P<target>you) for (?P<amount>[0-9]+) points of(?P<damage_type> \w+)? damage[!.]?'
"#,
    )
    .unwrap();

    let (templates, errors) = load_all_templates(Some(&templates_dir));
    assert!(errors.is_empty(), "{errors:?}");
    let classifier = Classifier::new(templates);

    let path = fixture("combat_sample.log");
    let (events, err) = collect_events(open_log(&path).unwrap(), &classifier, &path);
    assert!(err.is_none());
    assert_eq!(events.len(), 5);

    let incoming = events
        .iter()
        .find(|e| e.source() == "forest giant")
        .expect("incoming damage line should now match");
    let incoming = incoming.as_damage().unwrap();
    assert_eq!(incoming.target, "you");
    assert_eq!(incoming.damage_amount, 42);
    assert_eq!(incoming.damage_type, "crush");
}
