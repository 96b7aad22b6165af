use tracing::debug;

use crate::element::element_model::{Element, ElementKind};
use crate::locator::synthesizer::synthesize;
use crate::markup::document::Document;

use super::flow_model::{Flow, Step};

pub const LOGIN_FLOW_TITLE: &str = "User Login Flow";
pub const FORM_FLOW_TITLE: &str = "Form Submission Flow";
pub const NAVIGATION_FLOW_TITLE: &str = "Navigation Flow";

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "password123";
pub const TEST_VALUE: &str = "Test Value";

const LOGIN_KEYWORDS: [&str; 4] = ["login", "username", "email", "password"];
const USERNAME_KEYWORDS: [&str; 2] = ["username", "email"];
const PASSWORD_KEYWORDS: [&str; 1] = ["password"];
const LOGIN_BUTTON_KEYWORDS: [&str; 2] = ["login", "sign in"];
const SUBMIT_KEYWORDS: [&str; 3] = ["submit", "send", "save"];

const LOGIN_EXPECTATION: &str = "dashboard|welcome|home";
const SUBMIT_EXPECTATION: &str = "success|thank|confirm";

const MAX_FORM_FIELDS: usize = 3;
const MAX_NAVIGATION_LINKS: usize = 3;

/// Group extracted elements into candidate user flows.
///
/// The login, form-submission and navigation heuristics run independently
/// and in that order; each contributes at most one flow. Step locators come
/// from the synthesizer, probed against `document` when one is given.
pub fn infer_flows(elements: &[Element], page_url: &str, document: Option<&Document>) -> Vec<Flow> {
    let locate = |el: &Element| synthesize(el, document).css_selector;

    let flows: Vec<Flow> = [
        detect_login_flow(elements, page_url, &locate),
        detect_form_flow(elements, page_url, &locate),
        detect_navigation_flow(elements, page_url, &locate),
    ]
    .into_iter()
    .flatten()
    .collect();

    debug!(count = flows.len(), page_url, "flow inference complete");
    flows
}

/// navigate → fill username → fill password → click login (if any) → assert.
pub fn detect_login_flow(
    elements: &[Element],
    page_url: &str,
    locate: &dyn Fn(&Element) -> String,
) -> Option<Flow> {
    let candidates: Vec<&Element> = elements
        .iter()
        .filter(|el| mentions(el, &LOGIN_KEYWORDS))
        .collect();
    if candidates.len() < 2 {
        return None;
    }

    let password = candidates
        .iter()
        .find(|el| el.kind().is_fillable() && mentions(el, &PASSWORD_KEYWORDS))?;
    let username = candidates.iter().find(|el| {
        el.kind().is_fillable()
            && mentions(el, &USERNAME_KEYWORDS)
            && !std::ptr::eq(**el, *password)
    })?;
    let login_button = elements
        .iter()
        .find(|el| el.kind() == ElementKind::Button && name_contains(el, &LOGIN_BUTTON_KEYWORDS));

    let mut steps = vec![
        Step::navigate(page_url),
        Step::fill(&locate(username), TEST_EMAIL),
        Step::fill(&locate(password), TEST_PASSWORD),
    ];
    if let Some(button) = login_button {
        steps.push(Step::click(&locate(button)));
    }
    steps.push(Step::assert_contains("body", LOGIN_EXPECTATION));

    Some(Flow {
        title: LOGIN_FLOW_TITLE.to_string(),
        steps,
    })
}

/// navigate → fill up to three fields → click submit → assert.
pub fn detect_form_flow(
    elements: &[Element],
    page_url: &str,
    locate: &dyn Fn(&Element) -> String,
) -> Option<Flow> {
    let submit = elements
        .iter()
        .find(|el| el.kind() == ElementKind::Button && name_contains(el, &SUBMIT_KEYWORDS))?;

    let fields: Vec<&Element> = elements
        .iter()
        .filter(|el| el.kind().is_fillable())
        .take(MAX_FORM_FIELDS)
        .collect();
    if fields.is_empty() {
        return None;
    }

    let mut steps = vec![Step::navigate(page_url)];
    for field in fields {
        let value = if is_email_field(field) { TEST_EMAIL } else { TEST_VALUE };
        steps.push(Step::fill(&locate(field), value));
    }
    steps.push(Step::click(&locate(submit)));
    steps.push(Step::assert_contains("body", SUBMIT_EXPECTATION));

    Some(Flow {
        title: FORM_FLOW_TITLE.to_string(),
        steps,
    })
}

/// navigate → click each of up to three real navigation links.
pub fn detect_navigation_flow(
    elements: &[Element],
    page_url: &str,
    locate: &dyn Fn(&Element) -> String,
) -> Option<Flow> {
    let links: Vec<&Element> = elements
        .iter()
        .filter(|el| is_navigation_link(el))
        .take(MAX_NAVIGATION_LINKS)
        .collect();
    if links.is_empty() {
        return None;
    }

    let mut steps = vec![Step::navigate(page_url)];
    steps.extend(links.into_iter().map(|link| Step::click(&locate(link))));

    Some(Flow {
        title: NAVIGATION_FLOW_TITLE.to_string(),
        steps,
    })
}

// ============================================================================
// Matching helpers
// ============================================================================

/// Display name or any tracked attribute value contains a keyword, ignoring case.
fn mentions(el: &Element, keywords: &[&str]) -> bool {
    name_contains(el, keywords)
        || el.attributes().iter().any(|(_, value)| {
            let lower = value.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
}

fn name_contains(el: &Element, keywords: &[&str]) -> bool {
    let lower = el.display_name().to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn is_email_field(el: &Element) -> bool {
    name_contains(el, &["email"])
        || el
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("email"))
}

/// A link with a real href: not `javascript:` and not an in-page fragment.
pub fn is_navigation_link(el: &Element) -> bool {
    if el.kind() != ElementKind::Link {
        return false;
    }
    match el.attr("href") {
        Some(href) => {
            !href.to_ascii_lowercase().starts_with("javascript:") && !href.starts_with('#')
        }
        None => false,
    }
}
