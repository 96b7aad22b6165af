use crate::element::element_model::Element;

use super::css::MAX_TEXT_PREDICATE_LEN;
use super::escape::xpath_literal;

const TEXT_PREDICATE_TAGS: [&str; 4] = ["button", "a", "span", "div"];

/// One rule of the XPath cascade. Unlike CSS there is no uniqueness probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XPathRule {
    TextPredicate,
    Id,
    Name,
    TestId,
    Structural,
}

pub const XPATH_CASCADE: [XPathRule; 5] = [
    XPathRule::TextPredicate,
    XPathRule::Id,
    XPathRule::Name,
    XPathRule::TestId,
    XPathRule::Structural,
];

impl XPathRule {
    pub fn candidate(&self, element: &Element) -> Option<String> {
        match self {
            XPathRule::TextPredicate => {
                let text = element.text_content();
                if !TEXT_PREDICATE_TAGS.contains(&element.tag())
                    || text.is_empty()
                    || text.chars().count() >= MAX_TEXT_PREDICATE_LEN
                {
                    return None;
                }
                Some(format!(
                    "//{}[normalize-space()={}]",
                    element.tag(),
                    xpath_literal(text)
                ))
            }
            XPathRule::Id => attribute_predicate(element, "id"),
            XPathRule::Name => attribute_predicate(element, "name"),
            XPathRule::TestId => attribute_predicate(element, "data-testid"),
            XPathRule::Structural => Some(structural_xpath(element)),
        }
    }
}

/// First XPath the cascade produces. Never empty.
pub fn synthesize_xpath(element: &Element) -> String {
    XPATH_CASCADE
        .iter()
        .find_map(|rule| rule.candidate(element))
        .unwrap_or_else(|| structural_xpath(element))
}

fn attribute_predicate(element: &Element, key: &str) -> Option<String> {
    element
        .raw_attr(key)
        .map(|value| format!("//*[@{}={}]", key, xpath_literal(value)))
}

/// Absolute path from the root, e.g. `/html/body/div[2]/input`.
///
/// XPath positions count same-tag siblings only, so the index is added just
/// where such siblings exist.
pub fn structural_xpath(element: &Element) -> String {
    if element.is_detached() {
        return format!("//{}", element.tag());
    }

    let steps: Vec<String> = element
        .path()
        .iter()
        .map(|segment| {
            if segment.has_same_tag_siblings() {
                format!("{}[{}]", segment.tag, segment.type_index)
            } else {
                segment.tag.clone()
            }
        })
        .collect();
    format!("/{}", steps.join("/"))
}
