use serde::Serialize;
use tracing::{info, warn};

use crate::{
    element::element_model::Element,
    emit::code::emit_locator,
    error::EngineError,
    flow::{flow_detector::infer_flows, flow_model::Flow},
    locator::{locator_model::Quality, synthesizer::synthesize},
    markup::{
        document::Document,
        extractor::{ExtractOptions, extract_from_document, snapshot_element},
        fetch::MarkupSource,
    },
};

pub mod cli;
pub mod element;
pub mod emit;
pub mod error;
pub mod flow;
pub mod history;
pub mod locator;
pub mod markup;

/// Outcome of analyzing one page.
///
/// On failure `elements` and `flows` are empty and `error` carries the
/// message; the collections are always present.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub url: String,
    pub elements: Vec<Element>,
    pub flows: Vec<Flow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn failed(url: &str, message: impl Into<String>) -> Self {
        AnalysisResult {
            url: url.to_string(),
            elements: Vec::new(),
            flows: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Extract elements and infer flows from a parsed document.
pub fn analyze_document(url: &str, document: &Document, options: &ExtractOptions) -> AnalysisResult {
    let elements = extract_from_document(document, options);
    let flows = infer_flows(&elements, url, Some(document));

    info!(
        url,
        elements = elements.len(),
        flows = flows.len(),
        "analysis complete"
    );

    AnalysisResult {
        url: url.to_string(),
        elements,
        flows,
        error: None,
    }
}

/// Analyze already-retrieved markup for `url`.
pub fn analyze_markup(url: &str, markup: &str, options: &ExtractOptions) -> AnalysisResult {
    analyze_document(url, &Document::parse(markup), options)
}

/// Fetch `url` through `source` and analyze it.
///
/// A fetch failure stops processing before extraction and comes back as an
/// error result, never as an `Err`.
pub fn analyze_url(source: &dyn MarkupSource, url: &str, options: &ExtractOptions) -> AnalysisResult {
    match source.fetch(url) {
        Ok(markup) => analyze_markup(url, &markup, options),
        Err(e) => {
            warn!(url, error = %e, "analysis aborted");
            AnalysisResult::failed(url, e.to_string())
        }
    }
}

// =========================================================================
// Locator Inspector
// =========================================================================

/// Inspector output for a single element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorResult {
    pub css_selector: String,
    pub xpath: String,
    pub framework_code: String,
    #[serde(skip)]
    pub quality: Quality,
    #[serde(skip)]
    pub element: Element,
}

/// Synthesize a locator for the first element matching `selector`, with a
/// code snippet for `framework`.
///
/// Works on any tag, not only the extracted families. An unsupported
/// framework name is not an error; the snippet explains it instead.
pub fn inspect(document: &Document, selector: &str, framework: &str) -> Result<InspectorResult, EngineError> {
    let node = document.select_first(selector)?;
    let element = snapshot_element(node);
    let locator = synthesize(&element, Some(document));
    let framework_code = emit_locator(&locator, framework);

    Ok(InspectorResult {
        css_selector: locator.css_selector,
        xpath: locator.xpath,
        framework_code,
        quality: locator.quality,
        element,
    })
}
