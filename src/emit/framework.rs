use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported test-automation targets for framework code mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Playwright,
    Selenium,
    Cypress,
    #[serde(rename = "webdriverio")]
    WebdriverIo,
    #[serde(rename = "testcafe")]
    TestCafe,
}

impl Framework {
    pub const ALL: [Framework; 5] = [
        Framework::Playwright,
        Framework::Selenium,
        Framework::Cypress,
        Framework::WebdriverIo,
        Framework::TestCafe,
    ];

    /// Lowercase identifier used on the command line and in history exports.
    pub fn name(self) -> &'static str {
        match self {
            Framework::Playwright => "playwright",
            Framework::Selenium => "selenium",
            Framework::Cypress => "cypress",
            Framework::WebdriverIo => "webdriverio",
            Framework::TestCafe => "testcafe",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Framework::Playwright => "Playwright",
            Framework::Selenium => "Selenium WebDriver (Java)",
            Framework::Cypress => "Cypress",
            Framework::WebdriverIo => "WebdriverIO",
            Framework::TestCafe => "TestCafe",
        }
    }

    /// Case-insensitive lookup; `None` for unsupported names.
    pub fn from_name(name: &str) -> Option<Framework> {
        let wanted = name.trim();
        Framework::ALL
            .into_iter()
            .find(|fw| fw.name().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comment returned in place of code for an unknown target name.
pub fn unsupported(name: &str) -> String {
    format!("// Framework \"{}\" not supported", name)
}
