use clap::Parser;
use locator_engine::cli::commands::{
    AnalyzeSource, cmd_analyze, cmd_inspect, inspect_all, render_analysis,
};
use locator_engine::cli::config::{
    AppConfig, Cli, Commands, FetchConfig, load_config, try_load_config,
};
use locator_engine::cli::logging::level_for_verbosity;
use locator_engine::error::EngineError;
use locator_engine::history::history::LocatorHistory;
use locator_engine::markup::document::Document;
use locator_engine::markup::extractor::ExtractOptions;
use locator_engine::markup::fetch::DEFAULT_USER_AGENT;
use locator_engine::{AnalysisResult, analyze_markup};

const LOGIN_PAGE: &str = r#"
<form>
  <input id="user" name="username" placeholder="Username">
  <input id="pass" type="password" name="password">
  <button type="submit">Login</button>
</form>
"#;

fn write_page(dir: &tempfile::TempDir, markup: &str) -> String {
    let path = dir.path().join("page.html");
    std::fs::write(&path, markup).unwrap();
    path.to_string_lossy().into_owned()
}

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_analyze_url() {
    let cli = Cli::parse_from(["locator-engine", "analyze", "--url", "https://example.com"]);
    match cli.command {
        Commands::Analyze {
            url,
            file,
            page_url,
            format,
            include_hidden,
            output,
        } => {
            assert_eq!(url.as_deref(), Some("https://example.com"));
            assert!(file.is_none());
            assert!(page_url.is_none());
            assert!(format.is_none());
            assert!(!include_hidden);
            assert!(output.is_none());
        }
        _ => panic!("Expected Analyze command"),
    }
}

#[test]
fn cli_parse_analyze_file_all_args() {
    let cli = Cli::parse_from([
        "locator-engine",
        "analyze",
        "--file",
        "page.html",
        "--page-url",
        "https://example.com/login",
        "--format",
        "gherkin",
        "--include-hidden",
        "-o",
        "out.feature",
    ]);
    match cli.command {
        Commands::Analyze {
            url,
            file,
            page_url,
            format,
            include_hidden,
            output,
        } => {
            assert!(url.is_none());
            assert_eq!(file.as_deref(), Some("page.html"));
            assert_eq!(page_url.as_deref(), Some("https://example.com/login"));
            assert_eq!(format.as_deref(), Some("gherkin"));
            assert!(include_hidden);
            assert_eq!(output.as_deref(), Some("out.feature"));
        }
        _ => panic!("Expected Analyze command"),
    }
}

#[test]
fn cli_analyze_requires_exactly_one_source() {
    assert!(Cli::try_parse_from(["locator-engine", "analyze"]).is_err());
    assert!(
        Cli::try_parse_from([
            "locator-engine",
            "analyze",
            "--url",
            "https://example.com",
            "--file",
            "page.html"
        ])
        .is_err()
    );
}

#[test]
fn cli_page_url_requires_file() {
    let result = Cli::try_parse_from([
        "locator-engine",
        "analyze",
        "--url",
        "https://example.com",
        "--page-url",
        "https://other.com",
    ]);
    assert!(result.is_err());
}

#[test]
fn cli_parse_inspect_multiple_selectors() {
    let cli = Cli::parse_from([
        "locator-engine",
        "inspect",
        "--file",
        "page.html",
        "--selector",
        "#user",
        "--selector",
        "button",
        "--framework",
        "cypress",
        "--export",
        "history.json",
    ]);
    match cli.command {
        Commands::Inspect {
            file,
            selectors,
            framework,
            export,
        } => {
            assert_eq!(file, "page.html");
            assert_eq!(selectors, vec!["#user", "button"]);
            assert_eq!(framework.as_deref(), Some("cypress"));
            assert_eq!(export.as_deref(), Some("history.json"));
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn cli_inspect_requires_selector() {
    assert!(Cli::try_parse_from(["locator-engine", "inspect", "--file", "page.html"]).is_err());
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from([
        "locator-engine",
        "analyze",
        "--url",
        "https://example.com",
        "-vv",
        "--config",
        "custom.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
}

#[test]
fn verbosity_levels() {
    assert_eq!(level_for_verbosity(0), "warn");
    assert_eq!(level_for_verbosity(1), "info");
    assert_eq!(level_for_verbosity(2), "debug");
    assert_eq!(level_for_verbosity(7), "trace");
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_load_missing_file() {
    let config = load_config(Some("nonexistent_file_that_does_not_exist.yaml"));
    assert_eq!(config.analyze.format, "json");
    assert_eq!(config.inspect.framework, "playwright");
}

#[test]
fn config_default_values() {
    let config = AppConfig::default();
    assert_eq!(config.analyze.format, "json");
    assert!(!config.analyze.include_hidden);
    assert_eq!(config.inspect.framework, "playwright");
    assert_eq!(config.inspect.history_capacity, 20);
    assert!(config.inspect.export.is_none());
    assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(config.fetch.timeout_secs, 30);
}

#[test]
fn config_yaml_roundtrip() {
    let config = AppConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.analyze.format, config.analyze.format);
    assert_eq!(parsed.inspect.history_capacity, config.inspect.history_capacity);
    assert_eq!(parsed.fetch.timeout_secs, config.fetch.timeout_secs);
}

#[test]
fn config_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locator-engine.yaml");
    std::fs::write(
        &path,
        "inspect:\n  framework: selenium\n  history_capacity: 5\nfetch:\n  timeout_secs: 5\n",
    )
    .unwrap();

    let config = load_config(Some(path.to_str().unwrap()));
    assert_eq!(config.inspect.framework, "selenium");
    assert_eq!(config.inspect.history_capacity, 5);
    assert_eq!(config.fetch.timeout_secs, 5);
    // Untouched sections and fields keep defaults
    assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(config.analyze.format, "json");
}

#[test]
fn config_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "analyze: [not, a, map").unwrap();

    let config = load_config(Some(path.to_str().unwrap()));
    assert_eq!(config.analyze.format, "json");

    assert!(matches!(
        try_load_config(&path),
        Err(EngineError::ConfigParse { .. })
    ));
}

#[test]
fn try_load_config_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = try_load_config(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(EngineError::Io { .. })));
}

// ============================================================================
// analyze subcommand
// ============================================================================

#[test]
fn analyze_source_defaults_page_url_for_files() {
    assert_eq!(
        AnalyzeSource::from_args(None, Some("page.html"), None),
        Some(AnalyzeSource::File {
            path: "page.html".into(),
            page_url: "file://page.html".into(),
        })
    );
    assert_eq!(
        AnalyzeSource::from_args(Some("https://a.com"), None, None),
        Some(AnalyzeSource::Url("https://a.com".into()))
    );
    assert_eq!(AnalyzeSource::from_args(None, None, None), None);
}

#[test]
fn render_analysis_formats() {
    let result = analyze_markup("https://example.com", LOGIN_PAGE, &ExtractOptions::default());

    let json = render_analysis(&result, "json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["flows"][0]["title"], "User Login Flow");

    let gherkin = render_analysis(&result, "GHERKIN").unwrap();
    assert!(gherkin.starts_with("Feature: Website Testing for https://example.com\n"));

    let code = render_analysis(&result, "playwright").unwrap();
    assert!(code.contains("await page.fill('#user', 'test@example.com');"));

    let unsupported = render_analysis(&result, "puppeteer").unwrap();
    assert_eq!(unsupported, r#"// Framework "puppeteer" not supported"#);
}

#[test]
fn render_analysis_error_in_each_format() {
    let result = AnalysisResult::failed("https://example.com", "failed to fetch");

    let json = render_analysis(&result, "json").unwrap();
    assert!(json.contains("\"error\": \"failed to fetch\""));
    assert_eq!(render_analysis(&result, "gherkin").unwrap(), "# Error: failed to fetch\n");
    assert_eq!(render_analysis(&result, "cypress").unwrap(), "// Error: failed to fetch\n");
}

#[test]
fn cmd_analyze_file_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(&dir, LOGIN_PAGE);
    let out = dir.path().join("login.spec.ts");

    let source = AnalyzeSource::File {
        path: page,
        page_url: "https://example.com/login".into(),
    };
    let ok = cmd_analyze(
        &source,
        "playwright",
        false,
        Some(out.to_str().unwrap()),
        &FetchConfig::default(),
    )
    .unwrap();

    assert!(ok);
    let code = std::fs::read_to_string(&out).unwrap();
    assert!(code.starts_with("import { test, expect } from '@playwright/test';"));
    assert!(code.contains("await page.goto('https://example.com/login');"));
}

#[test]
fn cmd_analyze_missing_file_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("result.json");
    let source = AnalyzeSource::File {
        path: dir.path().join("absent.html").to_string_lossy().into_owned(),
        page_url: "https://example.com".into(),
    };

    let ok = cmd_analyze(&source, "json", false, Some(out.to_str().unwrap()), &FetchConfig::default())
        .unwrap();
    assert!(!ok);

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["elements"], serde_json::json!([]));
    assert!(value["error"].as_str().unwrap().contains("absent.html"));
}

// ============================================================================
// inspect subcommand
// ============================================================================

#[test]
fn inspect_all_records_history() {
    let doc = Document::parse(LOGIN_PAGE);
    let mut history = LocatorHistory::new(20);
    let selectors = vec!["#pass".to_string(), "#missing".to_string(), "button".to_string()];

    let (results, all_found) = inspect_all(&doc, &selectors, "playwright", &mut history);

    assert!(!all_found);
    assert_eq!(results.len(), 2);
    assert_eq!(history.len(), 2);
    assert_eq!(history.latest().unwrap().locator.css_selector, r#"button[type="submit"]"#);
    assert_eq!(history.latest().unwrap().framework, "playwright");
}

#[test]
fn cmd_inspect_exports_history() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(&dir, LOGIN_PAGE);
    let export = dir.path().join("history.json");

    let ok = cmd_inspect(
        &page,
        &["#user".to_string(), "#pass".to_string()],
        "selenium",
        Some(export.to_str().unwrap()),
        1,
    )
    .unwrap();
    assert!(ok);

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["cssSelector"], "#pass");
    assert_eq!(records[0]["framework"], "selenium");
}

#[test]
fn cmd_inspect_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.html");
    let result = cmd_inspect(missing.to_str().unwrap(), &["#x".to_string()], "playwright", None, 20);
    assert!(matches!(result, Err(EngineError::Io { .. })));
}
