use super::element_model::{Attributes, ElementKind};

/// Tag families the extractor scans for.
pub const EXTRACTED_TAGS: [&str; 5] = ["button", "input", "a", "select", "textarea"];

/// Attribute fallbacks for the display name, after visible text.
const NAME_SOURCES: [&str; 4] = ["placeholder", "aria-label", "name", "id"];

pub fn is_extracted_tag(tag: &str) -> bool {
    EXTRACTED_TAGS.contains(&tag)
}

/// Derive the interaction kind from a tag name and its `type` attribute.
pub fn classify_kind(tag: &str, input_type: Option<&str>) -> ElementKind {
    match tag {
        "button" => ElementKind::Button,
        "a" => ElementKind::Link,
        "select" => ElementKind::Dropdown,
        "textarea" => ElementKind::Textarea,
        "input" => {
            let input_type = input_type.map(|t| t.trim().to_ascii_lowercase());
            match input_type.as_deref() {
                Some("checkbox") => ElementKind::Checkbox,
                Some("radio") => ElementKind::Radio,
                Some("submit") | Some("button") | Some("reset") | Some("image") => {
                    ElementKind::Button
                }
                _ => ElementKind::Input,
            }
        }
        _ => ElementKind::Generic,
    }
}

/// Best-effort label: visible text, then placeholder, aria-label, name, id.
pub fn resolve_display_name(text: &str, attributes: &Attributes) -> String {
    if !text.is_empty() {
        return text.to_string();
    }

    NAME_SOURCES
        .iter()
        .find_map(|key| attributes.non_empty(key))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
