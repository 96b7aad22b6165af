use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::classifier::{classify_kind, normalize_text, resolve_display_name};

/// Attribute keys carried on an `Element`. Anything else is dropped at construction.
pub const TRACKED_ATTRIBUTES: [&str; 10] = [
    "id",
    "name",
    "class",
    "type",
    "placeholder",
    "role",
    "href",
    "data-testid",
    "data-test",
    "aria-label",
];

const VOID_TAGS: [&str; 6] = ["input", "img", "br", "hr", "meta", "link"];

// ============================================================================
// Element kind
// ============================================================================

/// Interaction type of a discovered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Button,
    Input,
    Link,
    Dropdown,
    Checkbox,
    Radio,
    Textarea,
    Generic,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Button => "button",
            ElementKind::Input => "input",
            ElementKind::Link => "link",
            ElementKind::Dropdown => "dropdown",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Radio => "radio",
            ElementKind::Textarea => "textarea",
            ElementKind::Generic => "generic",
        }
    }

    /// Kinds a flow can `fill`.
    pub fn is_fillable(&self) -> bool {
        matches!(self, ElementKind::Input | ElementKind::Textarea)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// Ordered attribute map restricted to `TRACKED_ATTRIBUTES`.
///
/// Keys are lowercased; the first occurrence of a key wins, matching how
/// browsers treat duplicated attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut kept: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            let key = key.as_ref().to_ascii_lowercase();
            if !TRACKED_ATTRIBUTES.contains(&key.as_str()) {
                continue;
            }
            if kept.iter().any(|(k, _)| *k == key) {
                continue;
            }
            kept.push((key, value.as_ref().to_string()));
        }
        Attributes(kept)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value with surrounding whitespace removed, `None` when blank.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Attribute value exactly as written, `None` when blank.
    ///
    /// Selectors compare attribute values verbatim, so anything interpolated
    /// into one must come from here rather than `non_empty`.
    pub fn present(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Class tokens in source order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get("class").unwrap_or("").split_whitespace()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Attributes, A::Error> {
                let mut pairs = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    pairs.push((key, value));
                }
                Ok(Attributes::from_pairs(pairs))
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

// ============================================================================
// Document position
// ============================================================================

/// One level of the walk from the document root down to an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    pub tag: String,

    /// 1-based position among all element siblings
    pub child_index: usize,

    /// 1-based position among siblings with the same tag
    pub type_index: usize,

    /// Number of siblings with the same tag, this one included
    pub type_count: usize,
}

impl PathSegment {
    /// A segment with no siblings, used for detached elements.
    pub fn only_child(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            child_index: 1,
            type_index: 1,
            type_count: 1,
        }
    }

    pub fn has_same_tag_siblings(&self) -> bool {
        self.type_count > 1
    }
}

// ============================================================================
// Element
// ============================================================================

/// One discovered UI element.
///
/// `kind` is derived from the tag and `type` attribute in [`Element::new`]
/// and has no setter. Deserialization goes through the same constructor, so
/// a serialized `kind` is never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementRecord", into = "ElementRecord")]
pub struct Element {
    tag: String,
    kind: ElementKind,
    display_name: String,
    attributes: Attributes,
    text_content: String,
    path: Vec<PathSegment>,
}

impl Element {
    pub fn new(tag: &str, attributes: Attributes, text_content: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let text_content = normalize_text(text_content);
        let kind = classify_kind(&tag, attributes.get("type"));
        let display_name = resolve_display_name(&text_content, &attributes);
        Self {
            tag,
            kind,
            display_name,
            attributes,
            text_content,
            path: Vec::new(),
        }
    }

    /// Attach the root-to-element path recorded during extraction.
    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// Fill an empty display name with `<kind>_<position>`.
    pub fn with_fallback_name(mut self, position: usize) -> Self {
        if self.display_name.is_empty() {
            self.display_name = format!("{}_{}", self.kind, position);
        }
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Trimmed attribute value, for classification and matching.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.non_empty(key)
    }

    /// Untrimmed attribute value, for building selectors.
    pub fn raw_attr(&self, key: &str) -> Option<&str> {
        self.attributes.present(key)
    }

    pub fn text_content(&self) -> &str {
        &self.text_content
    }

    /// Root-to-element path. Empty for detached elements.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn is_detached(&self) -> bool {
        self.path.is_empty()
    }

    /// Render the element back to a markup snippet with its tracked attributes.
    pub fn to_markup(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (key, value) in self.attributes.iter() {
            out.push_str(&format!(" {}=\"{}\"", key, escape_markup(value, true)));
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return out;
        }
        out.push_str(&escape_markup(&self.text_content, false));
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

fn escape_markup(raw: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wire shape of an `Element`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementRecord {
    tag: String,
    #[serde(default)]
    kind: Option<ElementKind>,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    text_content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    path: Vec<PathSegment>,
}

impl From<ElementRecord> for Element {
    fn from(record: ElementRecord) -> Self {
        let mut element =
            Element::new(&record.tag, record.attributes, &record.text_content).with_path(record.path);
        if element.display_name.is_empty() && !record.display_name.is_empty() {
            element.display_name = record.display_name;
        }
        element
    }
}

impl From<Element> for ElementRecord {
    fn from(element: Element) -> Self {
        ElementRecord {
            tag: element.tag,
            kind: Some(element.kind),
            display_name: element.display_name,
            attributes: element.attributes,
            text_content: element.text_content,
            path: element.path,
        }
    }
}
