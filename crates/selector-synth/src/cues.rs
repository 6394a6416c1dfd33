//! Cue extraction.
//!
//! A cue is one typed, filtered candidate identifying property of an
//! element. Extraction walks the enabled cue types in fixed priority order
//! and drops everything the dynamic-token classifier marks as build noise;
//! a cue whose value is entirely noise is discarded rather than kept
//! half-empty. An element offering nothing else still yields the tag+role
//! fallback cue.

use serde::{Deserialize, Serialize};

use context_adapter::{Document, NodeId};

use crate::config::{AttributePattern, SelectorConfig};
use crate::dynamic::is_dynamic;
use crate::engine::get_element_text;

/// Cue type, in priority order: explicit test attributes beat ids, ids beat
/// accessibility attributes, and the tag+role fallback comes last.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum CueKind {
    TestAttribute { attribute: String },
    Id,
    AriaLabel,
    Name,
    Placeholder,
    Class,
    Text,
    TagRole { role: Option<String> },
}

/// A (type, value, stability) triple extracted from an element.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub kind: CueKind,
    pub value: String,
    /// No token of the value was classified dynamic.
    pub stable: bool,
}

impl Cue {
    /// Lower sorts earlier; mirrors the extraction order.
    pub fn priority(&self) -> u8 {
        match self.kind {
            CueKind::TestAttribute { .. } => 0,
            CueKind::Id => 1,
            CueKind::AriaLabel => 2,
            CueKind::Name => 3,
            CueKind::Placeholder => 4,
            CueKind::Class => 5,
            CueKind::Text => 6,
            CueKind::TagRole { .. } => 7,
        }
    }

    /// Whether this cue renders as a text fragment rather than a CSS one.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, CueKind::Text)
    }

    /// Rendering position within a level: the tag leads a CSS compound,
    /// everything else follows. Distinct from selection priority.
    pub fn render_rank(&self) -> u8 {
        match self.kind {
            CueKind::TagRole { .. } => 0,
            CueKind::TestAttribute { .. } => 1,
            CueKind::Id => 2,
            CueKind::AriaLabel => 3,
            CueKind::Name => 4,
            CueKind::Placeholder => 5,
            CueKind::Class => 6,
            CueKind::Text => 7,
        }
    }

    /// Canonical rendered fragment for this cue.
    pub fn fragment(&self) -> String {
        match &self.kind {
            CueKind::TestAttribute { attribute } => {
                format!("[{}=\"{}\"]", attribute, escape_value(&self.value))
            }
            CueKind::Id => {
                if is_css_ident(&self.value) {
                    format!("#{}", self.value)
                } else {
                    format!("[id=\"{}\"]", escape_value(&self.value))
                }
            }
            CueKind::AriaLabel => format!("[aria-label=\"{}\"]", escape_value(&self.value)),
            CueKind::Name => format!("[name=\"{}\"]", escape_value(&self.value)),
            CueKind::Placeholder => format!("[placeholder=\"{}\"]", escape_value(&self.value)),
            CueKind::Class => {
                let mut classes: Vec<&str> = self.value.split_whitespace().collect();
                classes.sort_unstable();
                classes
                    .into_iter()
                    .map(|class| format!(".{class}"))
                    .collect()
            }
            CueKind::Text => format!("text=\"{}\"", escape_value(&self.value)),
            CueKind::TagRole { role } => match role {
                Some(role) => format!("{}[role=\"{}\"]", self.value, escape_value(role)),
                None => self.value.clone(),
            },
        }
    }
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn is_css_ident(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Extract the ordered surviving cues for an element.
///
/// Detached or non-element targets yield an empty list; the selector builder
/// is responsible for the tag-only fallback in that case.
pub fn build_cues(doc: &Document, node: NodeId, config: &SelectorConfig) -> Vec<Cue> {
    if !doc.contains(node) || !doc.is_element(node) {
        return Vec::new();
    }
    let mut cues = Vec::new();

    if let Some((attribute, value)) = test_attribute(doc, node, &config.test_attributes) {
        let stable = !is_dynamic(&value);
        cues.push(Cue {
            kind: CueKind::TestAttribute { attribute },
            value,
            stable,
        });
    }

    if let Some(id) = doc.attribute(node, "id").filter(|id| !id.is_empty()) {
        // an id-shaped value is all-or-nothing: machine noise discards it
        if !is_dynamic(id) {
            cues.push(Cue {
                kind: CueKind::Id,
                value: id.to_string(),
                stable: true,
            });
        }
    }

    for (attribute, kind) in [
        ("aria-label", CueKind::AriaLabel),
        ("name", CueKind::Name),
        ("placeholder", CueKind::Placeholder),
    ] {
        if let Some(value) = doc.attribute(node, attribute).filter(|v| !v.is_empty()) {
            cues.push(Cue {
                kind,
                value: value.to_string(),
                stable: !is_dynamic(value),
            });
        }
    }

    let surviving: Vec<&str> = doc
        .classes(node)
        .into_iter()
        .filter(|class| is_css_ident(class) && !is_dynamic(class))
        .collect();
    if !surviving.is_empty() {
        cues.push(Cue {
            kind: CueKind::Class,
            value: surviving.join(" "),
            stable: true,
        });
    }

    let text = build_cue_value_for_tag(doc, node);
    if !text.is_empty() && text.chars().count() <= config.text_cue_limit && !is_dynamic(&text) {
        cues.push(Cue {
            kind: CueKind::Text,
            value: text,
            stable: true,
        });
    }

    cues.push(fallback_cue(doc, node));
    cues
}

/// The tag+role fallback cue. Works even for a detached node, since the
/// arena still knows its tag.
pub fn fallback_cue(doc: &Document, node: NodeId) -> Cue {
    let tag = doc.tag(node).unwrap_or("*").to_string();
    let role = doc
        .attribute(node, "role")
        .filter(|r| !r.is_empty())
        .map(|r| r.to_string());
    Cue {
        kind: CueKind::TagRole { role },
        value: tag,
        stable: true,
    }
}

/// Tag-specific text value: inputs prefer their accessible naming over raw
/// text content.
pub fn build_cue_value_for_tag(doc: &Document, node: NodeId) -> String {
    match doc.tag(node) {
        Some("input" | "textarea" | "select") => doc
            .attribute(node, "name")
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .or_else(|| {
                doc.attribute(node, "placeholder")
                    .filter(|v| !v.is_empty())
                    .map(|v| v.to_string())
            })
            .or_else(|| label_text(doc, node))
            .unwrap_or_default(),
        Some(_) => get_element_text(doc, node),
        None => String::new(),
    }
}

/// Text of the label associated with an input: `<label for=...>` first,
/// wrapping `<label>` second.
fn label_text(doc: &Document, node: NodeId) -> Option<String> {
    if let Some(id) = doc.attribute(node, "id").filter(|id| !id.is_empty()) {
        for element in doc.elements() {
            if doc.tag(element) == Some("label") && doc.attribute(element, "for") == Some(id) {
                let text = get_element_text(doc, element);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    for ancestor in doc.ancestors(node) {
        if doc.tag(ancestor) == Some("label") {
            let text = get_element_text(doc, ancestor);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn test_attribute(
    doc: &Document,
    node: NodeId,
    patterns: &[AttributePattern],
) -> Option<(String, String)> {
    for pattern in patterns {
        match pattern {
            AttributePattern::Exact(name) => {
                if let Some(value) = doc.attribute(node, name).filter(|v| !v.is_empty()) {
                    return Some((name.clone(), value.to_string()));
                }
            }
            AttributePattern::Pattern(_) => {
                for name in doc.attribute_names(node) {
                    if pattern.matches(name) {
                        if let Some(value) = doc.attribute(node, name).filter(|v| !v.is_empty()) {
                            return Some((name.to_string(), value.to_string()));
                        }
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SelectorConfig {
        SelectorConfig::default()
    }

    #[test]
    fn cue_priority_order_is_fixed() {
        let mut doc = Document::new();
        let button = doc.append_element(
            doc.root(),
            "button",
            &[
                ("data-qa", "submit"),
                ("id", "go"),
                ("aria-label", "Submit"),
                ("class", "btn primary"),
            ],
        );
        doc.append_text(button, "Go");

        let cues = build_cues(&doc, button, &config());
        let kinds: Vec<u8> = cues.iter().map(|c| c.priority()).collect();
        let mut sorted = kinds.clone();
        sorted.sort_unstable();
        assert_eq!(kinds, sorted);
        assert!(matches!(cues[0].kind, CueKind::TestAttribute { .. }));
        assert!(matches!(cues.last().unwrap().kind, CueKind::TagRole { .. }));
    }

    #[test]
    fn dynamic_id_and_classes_are_dropped() {
        let mut doc = Document::new();
        let div = doc.append_element(
            doc.root(),
            "div",
            &[
                ("id", "__BVID__71"),
                ("class", "btn StyledBox-sc-13pk1d4-0 primary"),
            ],
        );

        let cues = build_cues(&doc, div, &config());
        assert!(!cues.iter().any(|c| c.kind == CueKind::Id));
        let class = cues.iter().find(|c| c.kind == CueKind::Class).unwrap();
        assert_eq!(class.value, "btn primary");
    }

    #[test]
    fn all_noise_classes_discard_the_cue_entirely() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[("class", "gLFyf haSfzA")]);

        let cues = build_cues(&doc, div, &config());
        assert!(!cues.iter().any(|c| c.kind == CueKind::Class));
        // the fallback is still present
        assert!(matches!(cues.last().unwrap().kind, CueKind::TagRole { .. }));
    }

    #[test]
    fn cueless_element_yields_only_the_fallback() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[]);
        let cues = build_cues(&doc, div, &config());
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].fragment(), "div");
    }

    #[test]
    fn detached_element_yields_no_cues() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[("id", "gone")]);
        doc.detach(div);
        assert!(build_cues(&doc, div, &config()).is_empty());
    }

    #[test]
    fn inputs_prefer_name_placeholder_and_label_over_text() {
        let mut doc = Document::new();
        let named = doc.append_element(doc.root(), "input", &[("name", "email")]);
        let placeheld = doc.append_element(doc.root(), "input", &[("placeholder", "Search")]);
        let label = doc.append_element(doc.root(), "label", &[("for", "pwd")]);
        doc.append_text(label, "Password");
        let labelled = doc.append_element(doc.root(), "input", &[("id", "pwd")]);

        assert_eq!(build_cue_value_for_tag(&doc, named), "email");
        assert_eq!(build_cue_value_for_tag(&doc, placeheld), "Search");
        assert_eq!(build_cue_value_for_tag(&doc, labelled), "Password");
    }

    #[test]
    fn regex_test_attribute_entries_match_by_name() {
        let mut doc = Document::new();
        let button = doc.append_element(doc.root(), "button", &[("data-test-submit", "1")]);
        let config = SelectorConfig::from_attribute_csv("/^data-test.*/");

        let cues = build_cues(&doc, button, &config);
        match &cues[0].kind {
            CueKind::TestAttribute { attribute } => assert_eq!(attribute, "data-test-submit"),
            other => panic!("unexpected cue: {other:?}"),
        }
    }

    #[test]
    fn fragments_render_canonically() {
        let cue = Cue {
            kind: CueKind::Class,
            value: "primary btn".to_string(),
            stable: true,
        };
        assert_eq!(cue.fragment(), ".btn.primary");

        let odd_id = Cue {
            kind: CueKind::Id,
            value: "my:account".to_string(),
            stable: true,
        };
        assert_eq!(odd_id.fragment(), "[id=\"my:account\"]");

        let text = Cue {
            kind: CueKind::Text,
            value: "Say \"hi\"".to_string(),
            stable: true,
        };
        assert_eq!(text.fragment(), "text=\"Say \\\"hi\\\"\"");
    }
}
