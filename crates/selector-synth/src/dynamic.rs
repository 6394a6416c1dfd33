//! Dynamic-token classification.
//!
//! Build tooling (CSS modules, styled-components, ad/analytics injectors)
//! decorates the DOM with machine-generated identifiers that change between
//! deploys. A selector built on such a value is dead on arrival, so cue
//! extraction filters every token that looks generated.
//!
//! The classifier is a pipeline of small scoring signals combined by a final
//! threshold rather than one large pattern match, so each signal stays
//! auditable against the regression corpus. The corpus is the authority;
//! tuning happens by adjusting a signal table, not by rewriting the rules.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::tokens::get_tokens;

/// Score at which a token is judged machine-generated.
const DYNAMIC_THRESHOLD: f32 = 1.0;

const DECISIVE: f32 = 1.0;
const WEAK: f32 = 0.5;

/// Letter pairs that effectively never occur inside semantic identifiers.
/// Hash alphabets produced by style tooling hit these constantly; human
/// vocabulary (including abbreviations like `btn`, `svg`, `cvc`) does not.
static RARE_LETTER_PAIRS: Lazy<HashSet<[u8; 2]>> = Lazy::new(|| {
    const PAIRS: &[&str] = &[
        "bv", "bx", "bz", "cb", "cj", "cx", "dx", "fq", "fv", "fx", "fz", "gx", "hx", "hz", "jb",
        "jf", "jg", "jk", "jq", "jx", "jz", "kq", "kx", "kz", "lx", "mx", "pq", "px", "qg", "qk",
        "qx", "qz", "sx", "tq", "vb", "vf", "vj", "vk", "vm", "vp", "vq", "vw", "vx", "wq", "wx",
        "xj", "xz", "yf", "yq", "zb", "zf", "zj", "zm", "zq", "zx",
    ];
    PAIRS
        .iter()
        .map(|pair| {
            let bytes = pair.as_bytes();
            [bytes[0], bytes[1]]
        })
        .collect()
});

/// Judge whether an identifier-like string is machine-generated.
///
/// Total and pure: no input panics, empty input is not dynamic.
pub fn is_dynamic(identifier: &str) -> bool {
    let tokens = get_tokens(identifier);
    if tokens.is_empty() {
        return false;
    }
    if opaque_short_run(&tokens) {
        return true;
    }
    tokens.iter().any(|token| token_score(token) >= DYNAMIC_THRESHOLD)
}

/// Summed signal score for a single token.
pub fn token_score(token: &str) -> f32 {
    let mut score = 0.0;
    if digit_interleave(token) {
        score += DECISIVE;
    }
    if rare_letter_pair(token) {
        score += DECISIVE;
    }
    if vowel_starved(token) {
        score += WEAK;
    }
    score
}

/// Letters and digits interleaved: digits remain after stripping one leading
/// and one trailing digit run. Numeric prefixes/suffixes on real words
/// (`col-sm-12`, `3di`) do not fire; hash shapes (`13pk1d4`, `g1f6ld`,
/// `tspr2b`) do.
pub fn digit_interleave(token: &str) -> bool {
    let has_letter = token.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return false;
    }
    let core = token
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_end_matches(|c: char| c.is_ascii_digit());
    core.chars().any(|c| c.is_ascii_digit())
}

/// A letters-only token of length >= 3 containing a letter pair from the
/// rare-pair table.
pub fn rare_letter_pair(token: &str) -> bool {
    if token.len() < 3 || !token.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }
    token
        .as_bytes()
        .windows(2)
        .any(|pair| RARE_LETTER_PAIRS.contains(&[pair[0], pair[1]]))
}

/// A letters-only token of length >= 4 without any of `aeiou`. Alone this is
/// never sufficient (`nytslm` stays semantic); it only tips tokens another
/// signal already suspects.
pub fn vowel_starved(token: &str) -> bool {
    token.len() >= 4
        && token.bytes().all(|b| b.is_ascii_lowercase())
        && !token.bytes().any(|b| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u'))
}

/// String-level signal: every token is at most two characters (`gb_C`,
/// `u_0_b`). Fires only when there is at least one token.
pub fn opaque_short_run(tokens: &[String]) -> bool {
    !tokens.is_empty() && tokens.iter().all(|token| token.chars().count() <= 2)
}
