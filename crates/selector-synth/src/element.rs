//! Element inspection helpers shared by cue extraction and the chooser.

use context_adapter::{Document, NodeId};

const NON_RENDERING_TAGS: &[&str] = &["script", "style", "head", "meta", "title", "noscript"];

const CLICKABLE_TAGS: &[&str] = &["a", "button", "label", "option", "select", "summary"];

const CLICKABLE_ROLES: &[&str] = &[
    "button", "checkbox", "link", "menuitem", "option", "radio", "switch", "tab",
];

const CLICKABLE_INPUT_TYPES: &[&str] = &["button", "checkbox", "image", "radio", "reset", "submit"];

const NON_TEXT_INPUT_TYPES: &[&str] = &[
    "button", "checkbox", "file", "hidden", "image", "radio", "range", "reset", "submit",
];

/// Whether this node, considered on its own, does not render.
pub(crate) fn locally_hidden(doc: &Document, node: NodeId) -> bool {
    if doc.hidden_flag(node) {
        return true;
    }
    if let Some(tag) = doc.tag(node) {
        if NON_RENDERING_TAGS.contains(&tag) {
            return true;
        }
        if doc.attribute(node, "hidden").is_some() {
            return true;
        }
        if let Some(style) = doc.attribute(node, "style") {
            let style = style.to_ascii_lowercase();
            if style.contains("display:none")
                || style.contains("display: none")
                || style.contains("visibility:hidden")
                || style.contains("visibility: hidden")
            {
                return true;
            }
        }
    }
    false
}

/// Whether the node renders at all: attached, not hidden (itself or through
/// an ancestor), and not a non-rendering tag.
pub fn is_visible(doc: &Document, node: NodeId) -> bool {
    if !doc.contains(node) {
        return false;
    }
    let mut current = Some(node);
    while let Some(id) = current {
        if locally_hidden(doc, id) {
            return false;
        }
        current = doc.parent(id);
    }
    true
}

/// Whether the element reacts to a click on its own.
pub fn is_clickable(doc: &Document, node: NodeId) -> bool {
    let Some(tag) = doc.tag(node) else {
        return false;
    };
    if CLICKABLE_TAGS.contains(&tag) {
        return true;
    }
    if tag == "input" {
        let input_type = doc.attribute(node, "type").unwrap_or("text");
        return CLICKABLE_INPUT_TYPES.contains(&input_type);
    }
    if let Some(role) = doc.attribute(node, "role") {
        if CLICKABLE_ROLES.contains(&role) {
            return true;
        }
    }
    doc.attribute(node, "onclick").is_some()
}

/// Whether the element accepts direct text input.
pub fn is_fillable(doc: &Document, node: NodeId) -> bool {
    match doc.tag(node) {
        Some("textarea") => true,
        Some("input") => {
            let input_type = doc.attribute(node, "type").unwrap_or("text");
            !NON_TEXT_INPUT_TYPES.contains(&input_type)
        }
        Some(_) => matches!(doc.attribute(node, "contenteditable"), Some("" | "true")),
        None => false,
    }
}

/// Climb from an event target to the element a user would consider clicked:
/// the highest contiguous clickable ancestor (an icon inside a button
/// resolves to the button).
pub fn get_clickable_ancestor(doc: &Document, node: NodeId) -> NodeId {
    let mut current = node;
    while let Some(parent) = doc.parent(current) {
        if doc.is_element(parent) && is_clickable(doc, parent) {
            current = parent;
        } else {
            break;
        }
    }
    current
}

/// Climb from an event target to the topmost contenteditable element, so a
/// rich-text editor is addressed as one unit.
pub fn get_topmost_editable_element(doc: &Document, node: NodeId) -> NodeId {
    let mut topmost = node;
    let mut current = doc.parent(node);
    while let Some(id) = current {
        if matches!(doc.attribute(id, "contenteditable"), Some("" | "true")) {
            topmost = id;
        }
        current = doc.parent(id);
    }
    topmost
}

/// Current value of an input-like element.
pub fn get_input_element_value(doc: &Document, node: NodeId) -> Option<String> {
    match doc.tag(node)? {
        "input" => Some(doc.attribute(node, "value").unwrap_or_default().to_string()),
        "textarea" => Some(
            doc.attribute(node, "value")
                .map(|v| v.to_string())
                .unwrap_or_else(|| crate::engine::get_element_text(doc, node)),
        ),
        _ => None,
    }
}
