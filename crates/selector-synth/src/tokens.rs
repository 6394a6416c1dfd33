//! Identifier tokenization.
//!
//! Identifier-like strings (ids, class names, attribute values) decompose
//! into an ordered sequence of lowercase tokens. The splitter is deliberately
//! conservative around digits and capitalized initialisms: `input-3Di` keeps
//! `3di` whole, and `Secure CVC input frame` keeps `cvc` whole.

/// Split an identifier-like string into lowercase tokens.
///
/// Rules:
/// - separator characters are space, dash, underscore, and colon;
/// - a chunk containing any digit is never camel-split;
/// - digit-free chunks split only at a lowercase-to-uppercase boundary,
///   which leaves runs of capitals (initialisms) intact.
///
/// Total over all inputs; empty input yields an empty list.
pub fn get_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in input.split(is_separator) {
        if chunk.is_empty() {
            continue;
        }
        if chunk.chars().any(|c| c.is_ascii_digit()) {
            tokens.push(chunk.to_lowercase());
        } else {
            split_camel(chunk, &mut tokens);
        }
    }
    tokens
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c == ':' || c.is_whitespace()
}

fn split_camel(chunk: &str, tokens: &mut Vec<String>) {
    let mut word = String::new();
    let mut prev_lower = false;
    for c in chunk.chars() {
        if c.is_uppercase() && prev_lower && !word.is_empty() {
            tokens.push(word.to_lowercase());
            word = String::new();
        }
        prev_lower = c.is_lowercase();
        word.push(c);
    }
    if !word.is_empty() {
        tokens.push(word.to_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        get_tokens(input)
    }

    #[test]
    fn splits_space_dash_underscore_colon() {
        assert_eq!(
            tokens("hi there-how_are:you"),
            vec!["hi", "there", "how", "are", "you"]
        );
    }

    #[test]
    fn splits_camel_case_without_numbers() {
        assert_eq!(tokens("hiThere"), vec!["hi", "there"]);
        assert_eq!(tokens("contestSearchInput"), vec!["contest", "search", "input"]);
    }

    #[test]
    fn does_not_split_camel_case_with_numbers() {
        assert_eq!(tokens("input-3Di"), vec!["input", "3di"]);
        assert_eq!(tokens("input-Di3"), vec!["input", "di3"]);
    }

    #[test]
    fn does_not_split_capitalized_initialisms() {
        assert_eq!(
            tokens("Secure CVC input frame"),
            vec!["secure", "cvc", "input", "frame"]
        );
        assert_eq!(tokens("__BVID__71"), vec!["bvid", "71"]);
    }

    #[test]
    fn total_over_degenerate_inputs() {
        assert!(tokens("").is_empty());
        assert!(tokens("---___:::   ").is_empty());
        assert_eq!(tokens("MyAccount__label"), vec!["my", "account", "label"]);
    }
}
