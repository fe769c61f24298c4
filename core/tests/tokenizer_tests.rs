use rankdex_core::tokenizer::{tokenize, Tokenizer};
use rankdex_core::TokenizerConfig;

#[test]
fn it_lowercases_and_splits_on_punctuation() {
    let words = Tokenizer::default().words("Headache, NAUSEA; dizziness!");
    assert_eq!(words, vec!["headache", "nausea", "dizziness"]);
}

#[test]
fn it_keeps_stopwords() {
    let terms = tokenize("The quick brown fox and the lazy dog");
    assert!(terms.contains(&"the".to_string()));
    assert!(terms.contains(&"and".to_string()));
    assert!(terms.contains(&"fox and the".to_string()));
}

#[test]
fn it_is_deterministic() {
    let text = "The patient reported nausea and dizziness caused by the medication.";
    assert_eq!(tokenize(text), tokenize(text));
}

#[test]
fn short_input_emits_only_available_ngrams() {
    assert_eq!(tokenize("one two"), vec!["one", "two", "one two"]);
}

#[test]
fn custom_range_restricts_ngrams() {
    let tok = Tokenizer::new(TokenizerConfig { min_ngram: 2, max_ngram: 2, ..Default::default() }).unwrap();
    assert_eq!(tok.tokenize("a b c"), vec!["a b", "b c"]);
    assert!(Tokenizer::new(TokenizerConfig { min_ngram: 0, ..Default::default() }).is_err());
}
