use serde::{Deserialize, Serialize};

/// Kind of action a flow step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    Navigate,
    Fill,
    Click,
    Select,
    Check,
    Assert,
}

/// A single action within a `Flow`.
///
/// `locator` is a CSS selector, or the target URL for `Navigate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub action: StepAction,
    pub locator: String,

    /// Input value for fill/select
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Substring, or `|`-separated alternatives, for assert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Step {
    fn bare(action: StepAction, locator: &str) -> Self {
        Step {
            action,
            locator: locator.to_string(),
            value: None,
            expected: None,
        }
    }

    pub fn navigate(url: &str) -> Self {
        Step::bare(StepAction::Navigate, url)
    }

    pub fn fill(locator: &str, value: &str) -> Self {
        Step {
            value: Some(value.to_string()),
            ..Step::bare(StepAction::Fill, locator)
        }
    }

    pub fn click(locator: &str) -> Self {
        Step::bare(StepAction::Click, locator)
    }

    pub fn select(locator: &str, value: &str) -> Self {
        Step {
            value: Some(value.to_string()),
            ..Step::bare(StepAction::Select, locator)
        }
    }

    pub fn check(locator: &str) -> Self {
        Step::bare(StepAction::Check, locator)
    }

    pub fn assert_contains(locator: &str, expected: &str) -> Self {
        Step {
            expected: Some(expected.to_string()),
            ..Step::bare(StepAction::Assert, locator)
        }
    }
}

/// An ordered, named user journey inferred from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub title: String,
    pub steps: Vec<Step>,
}
