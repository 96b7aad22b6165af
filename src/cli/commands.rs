use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::cli::config::FetchConfig;
use crate::emit::code::emit_code;
use crate::emit::gherkin::emit_gherkin;
use crate::error::EngineError;
use crate::history::history::{HistoryEntry, LocatorHistory};
use crate::locator::locator_model::Locator;
use crate::markup::document::Document;
use crate::markup::extractor::ExtractOptions;
use crate::markup::fetch::HttpFetcher;
use crate::{AnalysisResult, InspectorResult, analyze_markup, analyze_url, inspect};

/// Where `analyze` reads its markup from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeSource {
    Url(String),
    /// Local file, with the URL to record for it
    File { path: String, page_url: String },
}

impl AnalyzeSource {
    /// `--page-url` defaults to a `file://` URL for the path.
    pub fn from_args(url: Option<&str>, file: Option<&str>, page_url: Option<&str>) -> Option<Self> {
        match (url, file) {
            (Some(url), _) => Some(AnalyzeSource::Url(url.to_string())),
            (None, Some(path)) => Some(AnalyzeSource::File {
                path: path.to_string(),
                page_url: page_url
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("file://{}", path)),
            }),
            (None, None) => None,
        }
    }
}

// ============================================================================
// analyze subcommand
// ============================================================================

/// Run analysis and write it in `format`. Returns whether analysis succeeded.
pub fn cmd_analyze(
    source: &AnalyzeSource,
    format: &str,
    include_hidden: bool,
    output: Option<&str>,
    fetch: &FetchConfig,
) -> Result<bool, EngineError> {
    let options = ExtractOptions { include_hidden };

    let result = match source {
        AnalyzeSource::Url(url) => {
            let fetcher =
                HttpFetcher::new(&fetch.user_agent, Duration::from_secs(fetch.timeout_secs))?;
            analyze_url(&fetcher, url, &options)
        }
        AnalyzeSource::File { path, page_url } => match std::fs::read_to_string(path) {
            Ok(markup) => analyze_markup(page_url, &markup, &options),
            Err(e) => {
                let err = EngineError::io(format!("reading {}", path), e);
                warn!(error = %err, "analysis aborted");
                AnalysisResult::failed(page_url, err.to_string())
            }
        },
    };

    let rendered = render_analysis(&result, format)?;
    write_output(output, &rendered)?;

    if let Some(error) = &result.error {
        eprintln!("Analysis failed: {}", error);
    }
    Ok(!result.is_error())
}

/// Render an analysis result as JSON, Gherkin, or framework code.
pub fn render_analysis(result: &AnalysisResult, format: &str) -> Result<String, EngineError> {
    match format.to_ascii_lowercase().as_str() {
        "json" => serde_json::to_string_pretty(result).map_err(|source| {
            EngineError::JsonSerialize {
                context: "analysis result".to_string(),
                source,
            }
        }),
        "gherkin" => Ok(match &result.error {
            Some(error) => format!("# Error: {}\n", error),
            None => emit_gherkin(&result.url, &result.flows),
        }),
        framework => Ok(match &result.error {
            Some(error) => format!("// Error: {}\n", error),
            None => emit_code(&result.url, &result.flows, framework),
        }),
    }
}

// ============================================================================
// inspect subcommand
// ============================================================================

/// Inspect each selector in `file`, print the results as a JSON array and
/// record them into a session history. Returns whether every selector
/// resolved.
pub fn cmd_inspect(
    file: &str,
    selectors: &[String],
    framework: &str,
    export: Option<&str>,
    history_capacity: usize,
) -> Result<bool, EngineError> {
    let markup = std::fs::read_to_string(file)
        .map_err(|e| EngineError::io(format!("reading {}", file), e))?;
    let document = Document::parse(&markup);

    let mut history = LocatorHistory::new(history_capacity);
    let (results, all_found) = inspect_all(&document, selectors, framework, &mut history);

    let json = serde_json::to_string_pretty(&results).map_err(|source| {
        EngineError::JsonSerialize {
            context: "inspector results".to_string(),
            source,
        }
    })?;
    println!("{}", json);

    if let Some(path) = export {
        history.export(Path::new(path))?;
    }

    Ok(all_found)
}

/// Inspect selectors in order, recording each hit into `history`.
///
/// Selectors that do not resolve are reported on stderr and skipped.
pub fn inspect_all(
    document: &Document,
    selectors: &[String],
    framework: &str,
    history: &mut LocatorHistory,
) -> (Vec<InspectorResult>, bool) {
    let mut results = Vec::new();
    let mut all_found = true;

    for selector in selectors {
        match inspect(document, selector, framework) {
            Ok(result) => {
                let locator = Locator {
                    css_selector: result.css_selector.clone(),
                    xpath: result.xpath.clone(),
                    quality: result.quality,
                };
                history.record(HistoryEntry::new(
                    result.element.clone(),
                    locator,
                    framework,
                    result.framework_code.clone(),
                    Utc::now(),
                ));
                info!(selector = %selector, css = %result.css_selector, quality = %result.quality, "inspected");
                results.push(result);
            }
            Err(e) => {
                eprintln!("Skipping {}: {}", selector, e);
                all_found = false;
            }
        }
    }

    (results, all_found)
}

fn write_output(output: Option<&str>, content: &str) -> Result<(), EngineError> {
    match output {
        Some(path) => std::fs::write(path, content)
            .map_err(|e| EngineError::io(format!("writing {}", path), e)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
