use std::fmt;

use serde::{Serialize, Serializer};

// ============================================================================
// Quality rating
// ============================================================================

/// Expected robustness of a locator against markup changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
}

/// Which cascade rule produced the accepted CSS selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityReason {
    Id,
    TestId,
    Placeholder,
    Name,
    AriaLabel,
    Role,
    UniqueClass,
    Href,
    TextContent,
    TypeAttribute,
    Structural,
}

impl QualityReason {
    pub fn label(&self) -> &'static str {
        match self {
            QualityReason::Id => "ID",
            QualityReason::TestId => "Test ID",
            QualityReason::Placeholder => "Placeholder",
            QualityReason::Name => "Name",
            QualityReason::AriaLabel => "Aria Label",
            QualityReason::Role => "Role",
            QualityReason::UniqueClass => "Unique Class",
            QualityReason::Href => "Href",
            QualityReason::TextContent => "Text Content",
            QualityReason::TypeAttribute => "Type Attribute",
            QualityReason::Structural => "Generic",
        }
    }

    pub fn grade(&self) -> Grade {
        match self {
            QualityReason::Id | QualityReason::TestId | QualityReason::Placeholder => {
                Grade::Excellent
            }
            QualityReason::Name
            | QualityReason::AriaLabel
            | QualityReason::Role
            | QualityReason::UniqueClass
            | QualityReason::Href
            | QualityReason::TextContent => Grade::Good,
            QualityReason::TypeAttribute | QualityReason::Structural => Grade::Fair,
        }
    }
}

/// Informational rating attached to a `Locator`, e.g. "Excellent (ID)".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality {
    pub grade: Grade,
    pub reason: QualityReason,
}

impl From<QualityReason> for Quality {
    fn from(reason: QualityReason) -> Self {
        Quality {
            grade: reason.grade(),
            reason,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.grade, self.reason.label())
    }
}

impl Serialize for Quality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Locator
// ============================================================================

/// Synthesis result for one element.
///
/// `css_selector` and `xpath` come from independent cascades; neither is
/// ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locator {
    pub css_selector: String,
    pub xpath: String,
    pub quality: Quality,
}
