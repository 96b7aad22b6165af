use tracing::debug;

use crate::element::element_model::Element;
use crate::markup::document::{Document, element_path};

use super::css::{CSS_CASCADE, Candidate, CssRule, Probe};
use super::locator_model::{Locator, Quality, QualityReason};
use super::xpath::synthesize_xpath;

/// Outcome of probing a candidate against the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    Unique,
    /// Matched this many nodes (0 when the selector does not compile)
    Ambiguous(usize),
    /// Matched exactly one node, but not the element being synthesized
    Elsewhere,
    /// No document to probe against
    Unknown,
}

/// Synthesize a locator for `element`.
///
/// With a document, the CSS cascade returns the first candidate that matches
/// exactly one node, falling back to the last candidate computed (the
/// structural path). Without one, uniqueness is unknown and the first
/// candidate is accepted. Deterministic for the same element and document.
pub fn synthesize(element: &Element, document: Option<&Document>) -> Locator {
    let css = synthesize_css(element, document);
    let xpath = synthesize_xpath(element);

    Locator {
        css_selector: css.selector,
        xpath,
        quality: Quality::from(css.reason),
    }
}

/// Synthesize locators for a batch of elements against one document.
pub fn synthesize_all(elements: &[Element], document: Option<&Document>) -> Vec<Locator> {
    elements.iter().map(|el| synthesize(el, document)).collect()
}

/// Run the CSS cascade and return the accepted candidate.
pub fn synthesize_css(element: &Element, document: Option<&Document>) -> Candidate {
    let mut last: Option<Candidate> = None;

    for rule in CSS_CASCADE {
        let Some(candidate) = rule.candidate(element) else {
            continue;
        };

        match probe(element, &candidate, document) {
            Uniqueness::Unique | Uniqueness::Unknown => return candidate,
            Uniqueness::Elsewhere => {
                debug!(
                    rule = ?candidate.rule,
                    selector = %candidate.selector,
                    "rejecting candidate that matches another element"
                );
            }
            Uniqueness::Ambiguous(count) => {
                debug!(
                    rule = ?candidate.rule,
                    selector = %candidate.selector,
                    count,
                    "rejecting non-unique candidate"
                );
                last = Some(candidate);
            }
        }
    }

    last.unwrap_or_else(|| fallback(element))
}

/// Check how many nodes `candidate` matches in `document`.
///
/// A single match only counts as unique when it is `element` itself. Detached
/// elements have no position to compare, so any single match is accepted.
pub fn probe(element: &Element, candidate: &Candidate, document: Option<&Document>) -> Uniqueness {
    let Some(document) = document else {
        return Uniqueness::Unknown;
    };

    let hits = match &candidate.probe {
        Probe::Css => document.select_all(&candidate.selector).unwrap_or_default(),
        Probe::HasText { tag, text } => document.select_with_text(tag, text),
    };

    match hits.as_slice() {
        [hit] if element.is_detached() || element_path(*hit) == element.path() => {
            Uniqueness::Unique
        }
        [_] => Uniqueness::Elsewhere,
        _ => Uniqueness::Ambiguous(hits.len()),
    }
}

fn fallback(element: &Element) -> Candidate {
    // Structural always produces a candidate; the bare tag covers the impossible case
    CssRule::Structural
        .candidate(element)
        .unwrap_or_else(|| Candidate {
            rule: CssRule::Structural,
            selector: element.tag().to_string(),
            reason: QualityReason::Structural,
            probe: Probe::Css,
        })
}
