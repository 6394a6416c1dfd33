//! Selector matching and querying.
//!
//! Pure read-only checks against the live document: does an element still
//! satisfy a previously built selector, and what does its visible text look
//! like. Tolerant of attribute reordering and of classes appended after the
//! selector was built; intolerant of the identifying cue values themselves
//! changing.

use context_adapter::{Document, NodeId};

use crate::cues::{build_cue_value_for_tag, Cue, CueKind};
use crate::element::locally_hidden;
use crate::errors::ResolveError;
use crate::selector::{Selector, SelectorLevel};

/// Canonical visible text: trimmed, internal whitespace collapsed, hidden
/// and non-rendering content excluded.
pub fn get_element_text(doc: &Document, node: NodeId) -> String {
    let mut pieces = Vec::new();
    collect_text(doc, node, &mut pieces);
    let joined = pieces.join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(doc: &Document, node: NodeId, pieces: &mut Vec<String>) {
    if doc.is_element(node) {
        if locally_hidden(doc, node) {
            return;
        }
        for child in doc.children(node) {
            collect_text(doc, *child, pieces);
        }
    } else if let Some(text) = doc.text(node) {
        if !text.trim().is_empty() {
            pieces.push(text.trim().to_string());
        }
    }
}

/// Whether `node` satisfies every cue of one selector level.
fn matches_level(doc: &Document, node: NodeId, level: &SelectorLevel) -> bool {
    level.cues.iter().all(|cue| matches_cue(doc, node, cue))
}

fn matches_cue(doc: &Document, node: NodeId, cue: &Cue) -> bool {
    match &cue.kind {
        CueKind::TestAttribute { attribute } => {
            doc.attribute(node, attribute) == Some(cue.value.as_str())
        }
        CueKind::Id => doc.attribute(node, "id") == Some(cue.value.as_str()),
        CueKind::AriaLabel => doc.attribute(node, "aria-label") == Some(cue.value.as_str()),
        CueKind::Name => doc.attribute(node, "name") == Some(cue.value.as_str()),
        CueKind::Placeholder => doc.attribute(node, "placeholder") == Some(cue.value.as_str()),
        CueKind::Class => {
            // subset check: classes added later do not break the match
            let classes = doc.classes(node);
            cue.value
                .split_whitespace()
                .all(|class| classes.contains(&class))
        }
        // same tag-aware extraction the cue was built from, so a text cue
        // built from an input's accessible name matches that input
        CueKind::Text => build_cue_value_for_tag(doc, node) == cue.value,
        CueKind::TagRole { role } => {
            doc.tag(node) == Some(cue.value.as_str())
                && match role {
                    Some(role) => doc.attribute(node, "role") == Some(role.as_str()),
                    None => true,
                }
        }
    }
}

/// Re-check whether a live element still satisfies a previously built
/// selector.
pub fn is_match(doc: &Document, node: NodeId, selector: &Selector) -> bool {
    if !doc.contains(node) {
        return false;
    }
    let Some(target) = selector.target_level() else {
        return false;
    };
    if !matches_level(doc, node, target) {
        return false;
    }

    // remaining levels must be satisfied by ancestors, in order, walking up
    let mut ancestor_levels = selector.levels[..selector.levels.len() - 1].iter().rev();
    let mut current = doc.parent(node);
    let mut pending = ancestor_levels.next();
    while let Some(level) = pending {
        let Some(ancestor) = current else {
            return false;
        };
        if doc.is_element(ancestor) && matches_level(doc, ancestor, level) {
            pending = ancestor_levels.next();
        }
        current = doc.parent(ancestor);
    }
    true
}

/// All attached elements matching the selector, in document order.
pub fn query(doc: &Document, selector: &Selector) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|node| is_match(doc, *node, selector))
        .collect()
}

/// Resolve a selector to exactly one element. Not-found and ambiguous are
/// distinguishable outcomes; the first of several matches is never silently
/// chosen.
pub fn resolve(doc: &Document, selector: &Selector) -> Result<NodeId, ResolveError> {
    let matches = query(doc, selector);
    match matches.as_slice() {
        [] => Err(ResolveError::NotFound {
            selector: selector.render(),
        }),
        [only] => Ok(*only),
        _ => Err(ResolveError::Ambiguous {
            selector: selector.render(),
            matches: matches.len(),
        }),
    }
}
