//! Selector construction.
//!
//! A selector is an ordered list of levels, outermost scope first, each
//! level holding the cues one element must satisfy. The builder starts from
//! the single highest-priority cue of the target, probes uniqueness against
//! the current document, and only then spends more: first additional target
//! cues, then ancestor-qualifying levels up to a bounded depth. A selector
//! that never becomes unique is still returned, tagged as such.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use context_adapter::{Document, NodeId};

use crate::cache::SelectorCache;
use crate::config::SelectorConfig;
use crate::cues::{build_cues, fallback_cue, Cue};
use crate::engine::{is_match, query};

/// The cues one element level must satisfy.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SelectorLevel {
    pub cues: Vec<Cue>,
}

impl SelectorLevel {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self { cues }
    }

    /// Canonical rendering of one level: the tag leads the CSS compound,
    /// the text fragment (if any) chains last.
    pub fn render(&self) -> String {
        let mut cues: Vec<&Cue> = self.cues.iter().collect();
        cues.sort_by_key(|cue| cue.render_rank());

        let mut css = String::new();
        let mut text = None;
        for cue in cues {
            if cue.is_text() {
                text = Some(cue.fragment());
            } else {
                css.push_str(&cue.fragment());
            }
        }
        match (css.is_empty(), text) {
            (false, Some(text)) => format!("{css} >> {text}"),
            (true, Some(text)) => text,
            (false, None) => css,
            (true, None) => String::new(),
        }
    }
}

/// A canonical locator built from one or more cues, optionally scoped by
/// ancestor levels. `unique` reflects best-effort uniqueness at build time
/// only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    /// Levels outermost-first; the last level describes the target.
    pub levels: Vec<SelectorLevel>,
    pub unique: bool,
}

impl Selector {
    pub fn render(&self) -> String {
        to_selector(&self.levels)
    }

    /// The level describing the target element.
    pub fn target_level(&self) -> Option<&SelectorLevel> {
        self.levels.last()
    }
}

/// Render a canonical, deterministic string for a level list. Identical cue
/// lists always render identically; caching and downstream diffing depend
/// on that.
pub fn to_selector(levels: &[SelectorLevel]) -> String {
    levels
        .iter()
        .map(SelectorLevel::render)
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the minimal uniquely-resolving selector for `target`.
///
/// Cached results are revalidated against the live document before reuse;
/// rebuilding after a cache clear is content-equal for a still-present
/// element.
pub fn build_selector(
    doc: &Document,
    target: NodeId,
    config: &SelectorConfig,
    cache: &SelectorCache,
) -> Selector {
    if let Some(hit) = cache.get(doc, target) {
        if still_valid(doc, target, &hit) {
            return hit;
        }
        debug!(selector = %hit.render(), "cached selector stale, rebuilding");
    }

    let selector = build_uncached(doc, target, config);
    cache.insert(doc, target, &selector);
    selector
}

fn still_valid(doc: &Document, target: NodeId, selector: &Selector) -> bool {
    if !is_match(doc, target, selector) {
        return false;
    }
    !selector.unique || query(doc, selector).len() == 1
}

fn build_uncached(doc: &Document, target: NodeId, config: &SelectorConfig) -> Selector {
    let cues = build_cues(doc, target, config);
    if cues.is_empty() {
        // detached target: tag-only fallback, uniqueness unknowable
        return Selector {
            levels: vec![SelectorLevel::new(vec![fallback_cue(doc, target)])],
            unique: false,
        };
    }

    // grow the target level one cue at a time
    let mut selected: Vec<Cue> = Vec::new();
    for cue in &cues {
        selected.push(cue.clone());
        let candidate = Selector {
            levels: vec![SelectorLevel::new(selected.clone())],
            unique: false,
        };
        if query(doc, &candidate).len() == 1 {
            return Selector {
                unique: true,
                ..candidate
            };
        }
    }

    // widen scope with ancestor-qualifying levels, nearest ancestor first
    let mut levels = vec![SelectorLevel::new(selected)];
    for ancestor in doc
        .ancestors(target)
        .into_iter()
        .take(config.max_ancestor_levels)
    {
        let Some(cue) = ancestor_cue(doc, ancestor, config) else {
            continue;
        };
        levels.insert(0, SelectorLevel::new(vec![cue]));
        let candidate = Selector {
            levels: levels.clone(),
            unique: false,
        };
        if query(doc, &candidate).len() == 1 {
            return Selector {
                unique: true,
                ..candidate
            };
        }
    }

    // ambiguity within the depth bound: surface it, never pick a match
    let selector = Selector {
        levels,
        unique: false,
    };
    warn!(selector = %selector.render(), "no unique cue combination found");
    selector
}

/// Best single qualifying cue for an ancestor level: the highest-priority
/// stable cue, skipping text (ancestor text is too volatile to scope by).
fn ancestor_cue(doc: &Document, ancestor: NodeId, config: &SelectorConfig) -> Option<Cue> {
    build_cues(doc, ancestor, config)
        .into_iter()
        .filter(|cue| !cue.is_text() && cue.stable)
        .min_by_key(|cue| cue.priority())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, SelectorConfig, SelectorCache) {
        (Document::new(), SelectorConfig::default(), SelectorCache::new())
    }

    #[test]
    fn single_high_priority_cue_wins_when_unique() {
        let (mut doc, config, cache) = setup();
        let button = doc.append_element(doc.root(), "button", &[("data-qa", "submit"), ("id", "go")]);

        let selector = build_selector(&doc, button, &config, &cache);
        assert!(selector.unique);
        assert_eq!(selector.render(), "[data-qa=\"submit\"]");
    }

    #[test]
    fn cues_accumulate_until_unique() {
        let (mut doc, config, cache) = setup();
        // two buttons share a class; only one carries the extra class
        doc.append_element(doc.root(), "button", &[("class", "btn")]);
        let target = doc.append_element(doc.root(), "button", &[("class", "btn primary")]);

        let selector = build_selector(&doc, target, &config, &cache);
        assert!(selector.unique);
        assert_eq!(selector.render(), ".btn.primary");
    }

    #[test]
    fn ancestors_widen_scope_when_target_cues_are_exhausted() {
        let (mut doc, config, cache) = setup();
        let header = doc.append_element(doc.root(), "header", &[("id", "top")]);
        let footer = doc.append_element(doc.root(), "footer", &[]);
        let target = doc.append_element(header, "button", &[("class", "icon")]);
        doc.append_element(footer, "button", &[("class", "icon")]);

        let selector = build_selector(&doc, target, &config, &cache);
        assert!(selector.unique);
        assert_eq!(selector.render(), "#top button.icon");
    }

    #[test]
    fn ambiguous_selectors_are_returned_tagged_not_rejected() {
        let (mut doc, config, cache) = setup();
        let list = doc.append_element(doc.root(), "ul", &[]);
        let target = doc.append_element(list, "li", &[]);
        doc.append_element(list, "li", &[]);

        let selector = build_selector(&doc, target, &config, &cache);
        assert!(!selector.unique);
        assert!(!selector.render().is_empty());
    }

    #[test]
    fn detached_target_falls_back_to_tag_only() {
        let (mut doc, config, cache) = setup();
        let button = doc.append_element(doc.root(), "button", &[("id", "go")]);
        doc.detach(button);

        let selector = build_selector(&doc, button, &config, &cache);
        assert!(!selector.unique);
        assert_eq!(selector.render(), "button");
    }

    #[test]
    fn rendering_is_deterministic_for_identical_cue_lists() {
        let (mut doc, config, cache) = setup();
        let button = doc.append_element(
            doc.root(),
            "button",
            &[("class", "primary btn"), ("id", "go")],
        );
        let selector = build_selector(&doc, button, &config, &cache);
        let rebuilt = build_uncached(&doc, button, &config);
        assert_eq!(selector.render(), rebuilt.render());
    }

    #[test]
    fn text_fragment_chains_after_css() {
        let (mut doc, config, cache) = setup();
        let nav = doc.append_element(doc.root(), "nav", &[]);
        let a1 = doc.append_element(nav, "a", &[("class", "nav-link")]);
        doc.append_text(a1, "Home");
        let a2 = doc.append_element(nav, "a", &[("class", "nav-link")]);
        doc.append_text(a2, "About");

        let selector = build_selector(&doc, a2, &config, &cache);
        assert!(selector.unique);
        assert_eq!(selector.render(), ".nav-link >> text=\"About\"");
    }
}
