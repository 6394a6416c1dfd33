//! Regression corpus for the dynamic-token classifier.
//!
//! These identifier lists were collected from real pages (Bootstrap, BEM,
//! styled-components, CSS modules, Google/Facebook/Intercom widgets) and are
//! the authority on what the classifier must call generated versus semantic.
//! Threshold or signal-table changes must keep every case green.

use selector_synth::{get_tokens, is_dynamic};

const DYNAMIC: &[&str] = &[
    "__BVID__71",
    "item_iv2wgb-o_O-hover_yhuzbt",
    "gb_C",
    "ggWlfB2BMlWvNeAo2F0uqw",
    "gLFyf",
    "haSfzA",
    "input-bu32879fDi",
    "intercom-123v9c3",
    "StyledBox-sc-13pk1d4-0",
    "StyledLayer-rmtehz-0",
    "StyledRadioButton__StyledRadioButtonContainer-g1f6ld-0",
    "TSPr2b",
    "u_0_b",
];

const NOT_DYNAMIC: &[&str] = &[
    "1-code",
    "app",
    "b-content__page-input",
    "btn",
    "btn-playr-primary",
    "central-textlogo__image",
    "col-sm-12",
    "contestSearchInput-839",
    "cvc",
    "desktop-grid-3",
    "destroy",
    "email",
    "fa-search",
    "footer",
    "footer-sidebar-icon",
    "form-control",
    "glide__bullet",
    "icon",
    "inputtext",
    "intercom-container-body",
    "js-lang-list-button",
    "learn-bar",
    "login-button",
    "mat",
    "my:account",
    "MyAccount__label",
    "MyCart__itemCount__label",
    "nav-link",
    "nav-sprite",
    "new-todo",
    "nytslm-li-link",
    "SearchBox__cover",
    "searchInput",
    "slider",
    "special:id",
    "svg",
    "toggle",
    "tnt__zipInput",
];

#[test]
fn generated_identifiers_are_dynamic() {
    for example in DYNAMIC {
        assert!(
            is_dynamic(example),
            "expected dynamic: {example:?} (tokens: {:?})",
            get_tokens(example)
        );
    }
}

#[test]
fn semantic_identifiers_are_not_dynamic() {
    for example in NOT_DYNAMIC {
        assert!(
            !is_dynamic(example),
            "expected not dynamic: {example:?} (tokens: {:?})",
            get_tokens(example)
        );
    }
}

#[test]
fn every_token_of_the_semantic_corpus_stays_below_threshold() {
    for example in NOT_DYNAMIC {
        for token in get_tokens(example) {
            assert!(
                selector_synth::token_score(&token) < 1.0,
                "token {token:?} of {example:?} scored dynamic"
            );
        }
    }
}
