//! Integration tests for the XQuery analyzer using fixture files.
//!
//! Every fixture in `tests/fixtures` is analyzed together in one run, so
//! library fixtures are visible to the units that import them.
//!
//! Expected issues are declared in notation fixtures using comment annotations:
//! ```text
//! ; @issue EffectiveBoolean 6
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use xquery_analyzer::{Analyzer, LintConfig, UnitReport};
use xquery_lint::{format_human, load_unit, load_units};

/// Get the fixtures directory path.
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("parent")
        .parent()
        .expect("parent")
        .join("tests/fixtures")
}

fn fixture_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .expect("Failed to read fixtures directory")
        .map(|entry| entry.expect("Failed to read fixture entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xqt" || ext == "json"))
        .collect();
    paths.sort();
    paths
}

fn analyze_fixtures(config: LintConfig) -> Vec<UnitReport> {
    let paths = fixture_paths();
    let units = load_units(paths.as_slice());
    assert_eq!(units.len(), paths.len(), "every fixture should load");
    Analyzer::new(config).expect("should build analyzer").analyze(&units)
}

fn report<'a>(reports: &'a [UnitReport], file_name: &str) -> &'a UnitReport {
    reports
        .iter()
        .find(|r| r.unit.ends_with(file_name))
        .unwrap_or_else(|| panic!("no report for {file_name}"))
}

/// Parse expected issues from comment annotations in a file.
///
/// Format: `; @issue <RuleKey> <line>`
fn parse_expected_issues(content: &str) -> Vec<(String, u32)> {
    let mut expected: Vec<(String, u32)> = content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("; @issue "))
        .filter_map(|annotation| {
            let (rule, line) = annotation.trim().split_once(' ')?;
            Some((rule.to_string(), line.trim().parse().ok()?))
        })
        .collect();
    expected.sort();
    expected
}

fn actual_issues(report: &UnitReport) -> Vec<(String, u32)> {
    let mut actual: Vec<(String, u32)> = report.issues.iter().map(|i| (i.rule.clone(), i.line)).collect();
    actual.sort();
    actual
}

// =============================================================================
// Annotated fixtures
// =============================================================================

#[test]
fn test_annotated_fixtures_match() {
    let reports = analyze_fixtures(LintConfig::default());

    for report in reports.iter().filter(|r| r.unit.ends_with(".xqt")) {
        let content = fs::read_to_string(&report.unit).expect("Failed to read fixture file");
        let expected = parse_expected_issues(&content);
        let actual = actual_issues(report);
        assert!(!report.failed, "{} should not fail", report.unit);
        assert_eq!(
            actual, expected,
            "\n{}\n\nActual issues:\n{}",
            report.unit,
            format_human(std::slice::from_ref(report), &xquery_analyzer::CheckRegistry::new())
        );
    }
}

#[test]
fn test_library_fixture_is_clean() {
    let reports = analyze_fixtures(LintConfig::default());
    let library = report(&reports, "lib_status.xqt");
    assert!(library.issues.is_empty(), "unexpected issues: {:?}", library.issues);
}

#[test]
fn test_boolean_conditions_need_the_library() {
    let path = fixtures_dir().join("main_boolean.xqt");
    let unit = load_unit(&path).expect("should load");
    let reports = Analyzer::new(LintConfig::default())
        .expect("should build analyzer")
        .analyze(std::slice::from_ref(&unit));

    // Without the library neither imported declaration resolves
    let lines: Vec<u32> = reports[0]
        .issues
        .iter()
        .filter(|i| i.rule == "EffectiveBoolean")
        .map(|i| i.line)
        .collect();
    assert_eq!(lines, vec![4, 5, 6]);
}

#[test]
fn test_opt_in_rule() {
    let mut config = LintConfig::default();
    config.rules.enable.push("LogCheck".to_string());
    let reports = analyze_fixtures(config);

    let rules = report(&reports, "main_rules.xqt");
    let log: Vec<u32> = rules.issues.iter().filter(|i| i.rule == "LogCheck").map(|i| i.line).collect();
    assert_eq!(log, vec![11]);
}

#[test]
fn test_disabled_rule() {
    let config = LintConfig::load_from_str(
        r#"
[rules]
disable = ["XQueryVersion", "OrderByRange"]
"#,
    )
    .expect("should parse config");
    let reports = analyze_fixtures(config);

    for report in &reports {
        assert!(report
            .issues
            .iter()
            .all(|i| i.rule != "XQueryVersion" && i.rule != "OrderByRange"));
    }
}

// =============================================================================
// Unit documents
// =============================================================================

#[test]
fn test_parse_problems_become_issues() {
    let reports = analyze_fixtures(LintConfig::default());
    let problems = report(&reports, "parse_problems.xqy");
    assert_eq!(actual_issues(problems), vec![("ParseError".to_string(), 3)]);
    assert_eq!(problems.issues[0].message, "extraneous input ')' expecting ';'");
}

#[test]
fn test_allowed_parse_messages_from_config() {
    let config = LintConfig::load_from_str(
        r#"
[parse_error]
allowed_messages = ["extraneous input"]
"#,
    )
    .expect("should parse config");
    let reports = analyze_fixtures(config);
    let problems = report(&reports, "parse_problems.xqy");
    assert_eq!(actual_issues(problems), vec![("ParseError".to_string(), 5)]);
}

#[test]
fn test_reports_are_deterministic() {
    let first = analyze_fixtures(LintConfig::default());
    let second = analyze_fixtures(LintConfig::default());
    assert_eq!(first, second);
}
