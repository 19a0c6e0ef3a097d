use unicode_segmentation::UnicodeSegmentation;

/// Splits `text` into an ordered sequence of word tokens.
///
/// Deliberately does no case folding, stemming, or stop-word removal —
/// that belongs to the compression pipeline, so build-time and
/// query-time tokenization stay symmetric.
pub fn word_tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_unicode_word_boundaries() {
        let tokens = word_tokenize("The cat sat, quietly.");
        assert_eq!(tokens, vec!["The", "cat", "sat", "quietly"]);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(word_tokenize("").is_empty());
        assert!(word_tokenize("   ...  ").is_empty());
    }
}
