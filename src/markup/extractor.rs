use scraper::ElementRef;
use thiserror::Error;
use tracing::{debug, warn};

use crate::element::classifier::{classify_kind, is_extracted_tag};
use crate::element::element_model::{Attributes, Element, ElementKind};

use super::document::{Document, element_path, element_text};

/// Tags whose content is parsed but never rendered.
const INERT_CONTAINERS: [&str; 1] = ["template"];

/// Options controlling which elements the extractor reports.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Keep hidden inputs and elements hidden via attributes or inline style
    pub include_hidden: bool,
}

/// Why a single element fragment was skipped. Never aborts the scan.
#[derive(Debug, Error, PartialEq)]
pub enum FragmentError {
    #[error("<{tag}> is not an extracted tag")]
    UnsupportedTag { tag: String },

    #[error("<{tag}> sits inside inert <{container}> content")]
    InertAncestor { tag: String, container: String },
}

/// Parse `markup` and extract its testable elements in document order.
pub fn extract_elements(markup: &str, options: &ExtractOptions) -> Vec<Element> {
    extract_from_document(&Document::parse(markup), options)
}

/// Extract testable elements from an already-parsed document.
///
/// Each node is visited once, so no element appears twice. Fragments that
/// fail extraction are logged and skipped.
pub fn extract_from_document(document: &Document, options: &ExtractOptions) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();

    for node in document.elements() {
        if !is_extracted_tag(node.value().name()) {
            continue;
        }

        if !options.include_hidden && is_hidden(node) {
            debug!(tag = node.value().name(), "skipping hidden element");
            continue;
        }

        match extract_one(node) {
            Ok(element) => {
                let position = elements.len() + 1;
                elements.push(element.with_fallback_name(position));
            }
            Err(e) => warn!(error = %e, "skipping element fragment"),
        }
    }

    debug!(count = elements.len(), "extraction complete");
    elements
}

/// Extract a single node from one of the five tag families.
pub fn extract_one(node: ElementRef<'_>) -> Result<Element, FragmentError> {
    let tag = node.value().name();
    if !is_extracted_tag(tag) {
        return Err(FragmentError::UnsupportedTag {
            tag: tag.to_string(),
        });
    }

    if let Some(container) = node
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(|a| a.value().name())
        .find(|name| INERT_CONTAINERS.contains(name))
    {
        return Err(FragmentError::InertAncestor {
            tag: tag.to_string(),
            container: container.to_string(),
        });
    }

    Ok(snapshot_element(node))
}

/// Snapshot any element, whatever its tag, for the inspector.
pub fn snapshot_element(node: ElementRef<'_>) -> Element {
    let tag = node.value().name();
    let attributes = Attributes::from_pairs(node.value().attrs());

    let text = match tag {
        // Option labels are not the dropdown's own label
        "select" => String::new(),
        "input" => {
            if classify_kind(tag, attributes.get("type")) == ElementKind::Button {
                node.value().attr("value").unwrap_or("").to_string()
            } else {
                String::new()
            }
        }
        _ => element_text(node),
    };

    Element::new(tag, attributes, &text).with_path(element_path(node))
}

/// Hidden by its own markup or by an ancestor's.
pub fn is_hidden(node: ElementRef<'_>) -> bool {
    if node.value().name() == "input"
        && node
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"))
    {
        return true;
    }

    std::iter::once(node)
        .chain(node.ancestors().filter_map(ElementRef::wrap))
        .any(hides_subtree)
}

fn hides_subtree(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    if value
        .attr("aria-hidden")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    {
        return true;
    }
    match value.attr("style") {
        Some(style) => {
            let compact: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            compact.contains("display:none") || compact.contains("visibility:hidden")
        }
        None => false,
    }
}
