use std::collections::HashMap;
use std::time::Duration;

use locator_engine::error::EngineError;
use locator_engine::flow::flow_detector::LOGIN_FLOW_TITLE;
use locator_engine::locator::locator_model::Grade;
use locator_engine::markup::document::Document;
use locator_engine::markup::extractor::ExtractOptions;
use locator_engine::markup::fetch::{DEFAULT_USER_AGENT, HttpFetcher, MarkupSource};
use locator_engine::{AnalysisResult, analyze_markup, analyze_url, inspect};

// ============================================================================
// Helper builders
// ============================================================================

/// In-memory markup source; unknown URLs answer 404.
struct StaticSource {
    pages: HashMap<String, String>,
}

impl StaticSource {
    fn with(url: &str, markup: &str) -> Self {
        let mut pages = HashMap::new();
        pages.insert(url.to_string(), markup.to_string());
        Self { pages }
    }
}

impl MarkupSource for StaticSource {
    fn fetch(&self, url: &str) -> Result<String, EngineError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| EngineError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

const URL: &str = "https://example.com/login";

const LOGIN_PAGE: &str = r#"
<html>
  <body>
    <h1>Welcome back</h1>
    <form>
      <input id="user" name="username" placeholder="Username">
      <input id="pass" type="password" name="password">
      <input type="hidden" name="csrf" value="t0k3n">
      <button type="submit">Login</button>
    </form>
    <div class="banner" data-testid="promo">Spring sale</div>
  </body>
</html>
"#;

// ============================================================================
// analyze_url / analyze_markup
// ============================================================================

#[test]
fn analyze_url_extracts_and_infers() {
    let source = StaticSource::with(URL, LOGIN_PAGE);
    let result = analyze_url(&source, URL, &ExtractOptions::default());

    assert!(!result.is_error());
    assert_eq!(result.url, URL);
    assert_eq!(result.elements.len(), 3);
    assert_eq!(result.flows.len(), 1);
    assert_eq!(result.flows[0].title, LOGIN_FLOW_TITLE);
    assert_eq!(result.flows[0].steps[1].locator, "#user");
}

#[test]
fn fetch_failure_yields_error_result() {
    let source = StaticSource::with(URL, LOGIN_PAGE);
    let result = analyze_url(&source, "https://example.com/missing", &ExtractOptions::default());

    assert!(result.is_error());
    assert!(result.elements.is_empty());
    assert!(result.flows.is_empty());
    assert_eq!(
        result.error.as_deref(),
        Some("failed to fetch https://example.com/missing: HTTP 404")
    );
}

#[test]
fn error_result_serializes_with_empty_collections() {
    let result = AnalysisResult::failed(URL, "boom");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["url"], URL);
    assert_eq!(json["elements"], serde_json::json!([]));
    assert_eq!(json["flows"], serde_json::json!([]));
    assert_eq!(json["error"], "boom");
}

#[test]
fn success_result_has_no_error_field() {
    let result = analyze_markup(URL, LOGIN_PAGE, &ExtractOptions::default());
    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("error").is_none());
    assert_eq!(json["elements"][0]["displayName"], "Username");
    assert_eq!(json["flows"][0]["steps"][0]["locator"], URL);
}

#[test]
fn analyze_markup_matches_analyze_url() {
    let source = StaticSource::with(URL, LOGIN_PAGE);
    let fetched = analyze_url(&source, URL, &ExtractOptions::default());
    let direct = analyze_markup(URL, LOGIN_PAGE, &ExtractOptions::default());

    assert_eq!(fetched.elements, direct.elements);
    assert_eq!(fetched.flows, direct.flows);
}

#[test]
fn include_hidden_reaches_extractor() {
    let options = ExtractOptions { include_hidden: true };
    let result = analyze_markup(URL, LOGIN_PAGE, &options);
    assert_eq!(result.elements.len(), 4);
}

#[test]
fn empty_page_is_not_an_error() {
    let result = analyze_markup(URL, "", &ExtractOptions::default());
    assert!(!result.is_error());
    assert!(result.elements.is_empty());
    assert!(result.flows.is_empty());
}

// ============================================================================
// Locator Inspector
// ============================================================================

#[test]
fn inspect_returns_locators_and_snippet() {
    let doc = Document::parse(LOGIN_PAGE);
    let result = inspect(&doc, "input[name=username]", "playwright").unwrap();

    assert_eq!(result.css_selector, "#user");
    assert_eq!(result.xpath, r#"//*[@id="user"]"#);
    assert_eq!(result.quality.grade, Grade::Excellent);
    assert!(result.framework_code.contains("await page.locator('#user').click();"));
}

#[test]
fn inspect_accepts_any_tag() {
    let doc = Document::parse(LOGIN_PAGE);
    let result = inspect(&doc, "div.banner", "cypress").unwrap();

    assert_eq!(result.css_selector, r#"[data-testid="promo"]"#);
    assert_eq!(result.xpath, r#"//div[normalize-space()="Spring sale"]"#);
    assert_eq!(result.element.tag(), "div");
}

#[test]
fn inspect_unsupported_framework_is_not_an_error() {
    let doc = Document::parse(LOGIN_PAGE);
    let result = inspect(&doc, "#pass", "puppeteer").unwrap();
    assert_eq!(result.framework_code, r#"// Framework "puppeteer" not supported"#);
}

#[test]
fn inspect_missing_element() {
    let doc = Document::parse(LOGIN_PAGE);
    match inspect(&doc, "#nope", "playwright") {
        Err(EngineError::SelectorNotFound { selector }) => assert_eq!(selector, "#nope"),
        other => panic!("Expected SelectorNotFound, got {:?}", other.map(|r| r.css_selector)),
    }
}

#[test]
fn inspect_invalid_selector() {
    let doc = Document::parse(LOGIN_PAGE);
    assert!(matches!(
        inspect(&doc, "input[", "playwright"),
        Err(EngineError::InvalidSelector { .. })
    ));
}

#[test]
fn inspector_result_serializes_three_fields() {
    let doc = Document::parse(LOGIN_PAGE);
    let result = inspect(&doc, "#pass", "selenium").unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["cssSelector", "frameworkCode", "xpath"]);
    assert_eq!(json["cssSelector"], "#pass");
}

// ============================================================================
// HTTP fetcher
// ============================================================================

#[test]
fn http_fetcher_builds_client_once() {
    assert!(HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).is_ok());
}

#[test]
fn http_fetcher_rejects_invalid_user_agent() {
    let result = HttpFetcher::new("bad\nagent", Duration::from_secs(5));
    assert!(matches!(result, Err(EngineError::HttpClient { .. })));
}
