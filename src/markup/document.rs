use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::element::classifier::normalize_text;
use crate::element::element_model::PathSegment;
use crate::error::EngineError;

/// A parsed markup document.
///
/// This is the "live document" the synthesizer probes for selector
/// uniqueness. Parsing never fails; html5ever recovers from malformed input
/// and the recovered errors are only logged.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        if !html.errors.is_empty() {
            debug!(count = html.errors.len(), "markup parsed with recovered errors");
        }
        Self { html }
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Nodes matched by `selector`, or `None` if it does not compile.
    pub fn select_all(&self, selector: &str) -> Option<Vec<ElementRef<'_>>> {
        let compiled = Selector::parse(selector).ok()?;
        Some(self.html.select(&compiled).collect())
    }

    /// Number of nodes matched by `selector`, or `None` if it does not compile.
    pub fn count(&self, selector: &str) -> Option<usize> {
        self.select_all(selector).map(|hits| hits.len())
    }

    /// `tag` elements whose collapsed text contains `needle`, ignoring case.
    ///
    /// Only `tag` elements are visited; their text is collected once each.
    pub fn select_with_text(&self, tag: &str, needle: &str) -> Vec<ElementRef<'_>> {
        let Ok(by_tag) = Selector::parse(tag) else {
            return Vec::new();
        };
        let needle = needle.to_lowercase();
        self.html
            .select(&by_tag)
            .filter(|el| element_text(*el).to_lowercase().contains(&needle))
            .collect()
    }

    pub fn count_with_text(&self, tag: &str, needle: &str) -> usize {
        self.select_with_text(tag, needle).len()
    }

    /// First element matched by a CSS selector.
    pub fn select_first(&self, selector: &str) -> Result<ElementRef<'_>, EngineError> {
        let compiled = Selector::parse(selector).map_err(|_| EngineError::InvalidSelector {
            selector: selector.to_string(),
        })?;
        self.html
            .select(&compiled)
            .next()
            .ok_or_else(|| EngineError::SelectorNotFound {
                selector: selector.to_string(),
            })
    }
}

/// Visible text of an element with whitespace collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<String>())
}

/// Walk from the document root down to `el`, recording sibling positions.
pub fn element_path(el: ElementRef<'_>) -> Vec<PathSegment> {
    let mut path = vec![path_segment(el)];
    let mut current = el.parent().and_then(ElementRef::wrap);
    while let Some(node) = current {
        path.push(path_segment(node));
        current = node.parent().and_then(ElementRef::wrap);
    }
    path.reverse();
    path
}

fn path_segment(el: ElementRef<'_>) -> PathSegment {
    let tag = el.value().name();
    let Some(parent) = el.parent() else {
        return PathSegment::only_child(tag);
    };

    let mut segment = PathSegment::only_child(tag);
    segment.type_count = 0;
    for (position, sibling) in parent.children().filter_map(ElementRef::wrap).enumerate() {
        let is_self = sibling.id() == el.id();
        if sibling.value().name() == tag {
            segment.type_count += 1;
            if is_self {
                segment.type_index = segment.type_count;
            }
        }
        if is_self {
            segment.child_index = position + 1;
        }
    }
    segment
}
