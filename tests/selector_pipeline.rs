//! Cross-crate selector pipeline: cues through cache invalidation.

use std::sync::Arc;

use webscribe::{
    build_cues, build_selector, is_match, resolve, BrowsingContext, CacheInvalidator, Document,
    ResolveError, SelectorCache, SelectorConfig,
};

#[test]
fn stable_attributes_survive_and_noise_is_filtered() {
    let mut doc = Document::new();
    let button = doc.append_element(
        doc.root(),
        "button",
        &[
            ("id", "login-button"),
            ("class", "btn gLFyf form-control"),
        ],
    );

    let config = SelectorConfig::default();
    let cues = build_cues(&doc, button, &config);

    let id = cues.iter().find(|c| c.fragment().starts_with('#')).unwrap();
    assert_eq!(id.value, "login-button");
    let class = cues.iter().find(|c| c.fragment().starts_with('.')).unwrap();
    assert_eq!(class.fragment(), ".btn.form-control");
}

#[test]
fn build_then_match_holds_for_stable_elements() {
    let mut doc = Document::new();
    let form = doc.append_element(doc.root(), "form", &[("id", "signup")]);
    let input = doc.append_element(form, "input", &[("name", "email"), ("class", "u_0_b")]);

    let config = SelectorConfig::default();
    let cache = SelectorCache::new();
    let selector = build_selector(&doc, input, &config, &cache);

    assert!(selector.unique);
    assert!(is_match(&doc, input, &selector));
    assert_eq!(resolve(&doc, &selector), Ok(input));
}

#[test]
fn ambiguity_is_surfaced_not_swallowed() {
    let mut doc = Document::new();
    let grid = doc.append_element(doc.root(), "div", &[("class", "grid")]);
    let first = doc.append_element(grid, "span", &[("class", "cell")]);
    doc.append_element(grid, "span", &[("class", "cell")]);

    let config = SelectorConfig::default();
    let cache = SelectorCache::new();
    let selector = build_selector(&doc, first, &config, &cache);

    assert!(!selector.unique);
    match resolve(&doc, &selector) {
        Err(ResolveError::Ambiguous { matches, .. }) => assert_eq!(matches, 2),
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[tokio::test]
async fn navigation_invalidates_and_rebuild_is_content_equal() -> anyhow::Result<()> {
    let ctx = BrowsingContext::new();
    let button =
        ctx.with_document_mut(|doc| doc.append_element(doc.root(), "button", &[("id", "go")]));

    let config = SelectorConfig::default();
    let cache = Arc::new(SelectorCache::new());
    let mut invalidator = CacheInvalidator::new(Arc::clone(&cache));
    invalidator.start(&ctx);

    let before = build_selector(&ctx.document(), button, &config, &cache);
    assert_eq!(cache.len(), 1);

    // same markup after navigation: the cache is gone but the selector for
    // the equivalent element is content-equal
    let mut next = Document::new();
    let next_button = next.append_element(next.root(), "button", &[("id", "go")]);
    ctx.navigate(next)?;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(cache.is_empty());

    let after = build_selector(&ctx.document(), next_button, &config, &cache);
    assert_eq!(before.render(), after.render());

    invalidator.stop().await;
    Ok(())
}
