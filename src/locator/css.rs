use crate::element::element_model::Element;

use super::escape::{css_ident, css_string};
use super::locator_model::QualityReason;

/// Class names treated as semantically meaningful (compared case-insensitively).
pub const SEMANTIC_CLASSES: [&str; 13] = [
    "submit",
    "cancel",
    "primary",
    "secondary",
    "login",
    "register",
    "search",
    "filter",
    "sort",
    "edit",
    "delete",
    "save",
    "close",
];

/// Text predicates are only generated for text shorter than this, in chars.
pub const MAX_TEXT_PREDICATE_LEN: usize = 50;

const TEXT_PREDICATE_TAGS: [&str; 3] = ["button", "a", "span"];

// ============================================================================
// Cascade
// ============================================================================

/// One rule of the CSS selector cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CssRule {
    Id,
    Name,
    TestId,
    Placeholder,
    Class,
    TypeRole,
    AriaLabel,
    Href,
    TextPredicate,
    Structural,
}

/// Evaluation order of the CSS cascade. `Structural` is last and always
/// yields a candidate.
pub const CSS_CASCADE: [CssRule; 10] = [
    CssRule::Id,
    CssRule::Name,
    CssRule::TestId,
    CssRule::Placeholder,
    CssRule::Class,
    CssRule::TypeRole,
    CssRule::AriaLabel,
    CssRule::Href,
    CssRule::TextPredicate,
    CssRule::Structural,
];

/// How a candidate's uniqueness is checked against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Compile the selector and count matches
    Css,
    /// `:has-text()` is not standard CSS; count `tag` elements containing `text`
    HasText { tag: String, text: String },
}

/// A selector proposed by one cascade rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub rule: CssRule,
    pub selector: String,
    pub reason: QualityReason,
    pub probe: Probe,
}

impl Candidate {
    fn css(rule: CssRule, selector: String, reason: QualityReason) -> Self {
        Candidate {
            rule,
            selector,
            reason,
            probe: Probe::Css,
        }
    }
}

impl CssRule {
    /// The candidate this rule proposes for `element`, if the rule applies.
    pub fn candidate(&self, element: &Element) -> Option<Candidate> {
        match self {
            CssRule::Id => element
                .raw_attr("id")
                .map(|id| Candidate::css(*self, format!("#{}", css_ident(id)), QualityReason::Id)),

            CssRule::Name => element.raw_attr("name").map(|name| {
                Candidate::css(
                    *self,
                    format!("[name=\"{}\"]", css_string(name)),
                    QualityReason::Name,
                )
            }),

            // Quote the attribute actually present so the selector matches
            CssRule::TestId => ["data-testid", "data-test"]
                .into_iter()
                .find_map(|key| element.raw_attr(key).map(|value| (key, value)))
                .map(|(key, test_id)| {
                    Candidate::css(
                        *self,
                        format!("[{}=\"{}\"]", key, css_string(test_id)),
                        QualityReason::TestId,
                    )
                }),

            CssRule::Placeholder => {
                if !matches!(element.tag(), "input" | "textarea") {
                    return None;
                }
                element.raw_attr("placeholder").map(|placeholder| {
                    Candidate::css(
                        *self,
                        format!("[placeholder=\"{}\"]", css_string(placeholder)),
                        QualityReason::Placeholder,
                    )
                })
            }

            CssRule::Class => pick_class(element).map(|class| {
                Candidate::css(
                    *self,
                    format!(".{}", css_ident(class)),
                    QualityReason::UniqueClass,
                )
            }),

            CssRule::TypeRole => {
                let input_type = element.raw_attr("type");
                let role = element.raw_attr("role");
                if input_type.is_none() && role.is_none() {
                    return None;
                }

                let mut selector = element.tag().to_string();
                if let Some(t) = input_type {
                    selector.push_str(&format!("[type=\"{}\"]", css_string(t)));
                }
                if let Some(r) = role {
                    selector.push_str(&format!("[role=\"{}\"]", css_string(r)));
                }
                let reason = if role.is_some() {
                    QualityReason::Role
                } else {
                    QualityReason::TypeAttribute
                };
                Some(Candidate::css(*self, selector, reason))
            }

            CssRule::AriaLabel => element.raw_attr("aria-label").map(|label| {
                Candidate::css(
                    *self,
                    format!("[aria-label=\"{}\"]", css_string(label)),
                    QualityReason::AriaLabel,
                )
            }),

            CssRule::Href => {
                if element.tag() != "a" {
                    return None;
                }
                element
                    .raw_attr("href")
                    .filter(|href| !href.trim_start().to_ascii_lowercase().starts_with("javascript:"))
                    .map(|href| {
                        Candidate::css(
                            *self,
                            format!("a[href=\"{}\"]", css_string(href)),
                            QualityReason::Href,
                        )
                    })
            }

            CssRule::TextPredicate => {
                let text = element.text_content();
                if !TEXT_PREDICATE_TAGS.contains(&element.tag())
                    || text.is_empty()
                    || text.chars().count() >= MAX_TEXT_PREDICATE_LEN
                {
                    return None;
                }
                Some(Candidate {
                    rule: *self,
                    selector: format!("{}:has-text(\"{}\")", element.tag(), css_string(text)),
                    reason: QualityReason::TextContent,
                    probe: Probe::HasText {
                        tag: element.tag().to_string(),
                        text: text.to_string(),
                    },
                })
            }

            CssRule::Structural => Some(Candidate::css(
                *self,
                structural_selector(element),
                QualityReason::Structural,
            )),
        }
    }
}

/// First class matching a semantic keyword, else the first listed class.
pub fn pick_class(element: &Element) -> Option<&str> {
    let classes: Vec<&str> = element.attributes().classes().collect();
    classes
        .iter()
        .find(|class| {
            SEMANTIC_CLASSES
                .iter()
                .any(|keyword| class.eq_ignore_ascii_case(keyword))
        })
        .or_else(|| classes.first())
        .copied()
}

/// Root-to-element path joined with child combinators.
///
/// A level gets `:nth-child(k)` only when it has same-tag siblings; `k`
/// counts all element siblings so the selector matches this exact node.
/// Detached elements fall back to their bare tag.
pub fn structural_selector(element: &Element) -> String {
    if element.is_detached() {
        return element.tag().to_string();
    }

    element
        .path()
        .iter()
        .map(|segment| {
            if segment.has_same_tag_siblings() {
                format!("{}:nth-child({})", segment.tag, segment.child_index)
            } else {
                segment.tag.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}
