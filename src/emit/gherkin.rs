use std::fmt;

use crate::flow::flow_model::{Flow, Step, StepAction};

pub const NO_FLOWS_MESSAGE: &str = "No flows detected for this website.";

/// Gherkin step keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Given,
    When,
    And,
    Then,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Keyword::Given => "Given",
            Keyword::When => "When",
            Keyword::And => "And",
            Keyword::Then => "Then",
        };
        f.write_str(s)
    }
}

/// Keyword for each step of a flow, in order.
///
/// `navigate` is always Given and `assert` always Then. Of the remaining
/// actions the first is When and the rest And.
pub fn keywords(steps: &[Step]) -> Vec<Keyword> {
    let mut seen_action = false;
    steps
        .iter()
        .map(|step| match step.action {
            StepAction::Navigate => Keyword::Given,
            StepAction::Assert => Keyword::Then,
            StepAction::Fill | StepAction::Click | StepAction::Select | StepAction::Check => {
                if seen_action {
                    Keyword::And
                } else {
                    seen_action = true;
                    Keyword::When
                }
            }
        })
        .collect()
}

/// Step text after the keyword, templated from the step's fields verbatim.
pub fn step_text(step: &Step) -> String {
    let value = step.value.as_deref().unwrap_or_default();
    match step.action {
        StepAction::Navigate => format!("the user navigates to \"{}\"", step.locator),
        StepAction::Fill => format!("the user fills \"{}\" with \"{}\"", step.locator, value),
        StepAction::Click => format!("the user clicks \"{}\"", step.locator),
        StepAction::Select => format!("the user selects \"{}\" from \"{}\"", value, step.locator),
        StepAction::Check => format!("the user checks \"{}\"", step.locator),
        StepAction::Assert => format!(
            "the user should see \"{}\" in \"{}\"",
            step.expected.as_deref().unwrap_or_default(),
            step.locator
        ),
    }
}

/// Render one `Scenario:` block.
pub fn scenario(flow: &Flow) -> String {
    let mut out = format!("  Scenario: {}\n", flow.title);
    for (keyword, step) in keywords(&flow.steps).into_iter().zip(&flow.steps) {
        out.push_str(&format!("    {} {}\n", keyword, step_text(step)));
    }
    out
}

/// Render a feature file for all flows found on `url`.
pub fn emit_gherkin(url: &str, flows: &[Flow]) -> String {
    let header = format!("Feature: Website Testing for {}\n\n", url);
    if flows.is_empty() {
        return header + NO_FLOWS_MESSAGE;
    }

    let scenarios: Vec<String> = flows.iter().map(scenario).collect();
    header + &scenarios.join("\n")
}
