// file: src/vectorizer/tokenize.rs
// description: shared tokenization rule for corpus fitting and query transforms
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // Word tokens of two or more word characters, matched on lowercased text
    pub static ref TERM_PATTERN: Regex =
        Regex::new(r"\b\w\w+\b").expect("TERM_PATTERN regex is valid");

    static ref STOP_WORDS: HashSet<&'static str> = STOP_WORD_LIST.iter().copied().collect();
}

// Fixed English stop-word list, compiled in so fitting is reproducible
// across environments.
const STOP_WORD_LIST: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Tokenize text the same way for corpus fitting and query transforms:
/// lowercase, word tokens of two or more characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    TERM_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !STOP_WORDS.contains(token))
        .map(|token| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits() {
        let tokens = tokenize("Reduce COST with Reserved Instances");
        assert_eq!(tokens, vec!["reduce", "cost", "reserved", "instances"]);
    }

    #[test]
    fn test_stop_words_removed() {
        let tokens = tokenize("the cost of the system");
        assert_eq!(tokens, vec!["cost", "system"]);
    }

    #[test]
    fn test_single_character_tokens_dropped() {
        let tokens = tokenize("a b c density");
        assert_eq!(tokens, vec!["density"]);
    }

    #[test]
    fn test_punctuation_ignored() {
        let tokens = tokenize("cost-optimization, right? yes: savings!");
        assert_eq!(
            tokens,
            vec!["cost", "optimization", "right", "yes", "savings"]
        );
    }

    #[test]
    fn test_all_stop_words_yields_nothing() {
        assert!(tokenize("the of and to").is_empty());
    }
}
