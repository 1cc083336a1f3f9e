use regex::Regex;

/// Text normalization for the inverted text index and for query strings.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    non_word: Regex,
    pub min_token_len: usize,
}

impl Tokenizer {
    pub fn new(min_token_len: usize) -> Self {
        Tokenizer {
            non_word: Regex::new(r"\W+").unwrap(),
            min_token_len,
        }
    }

    /// Index-side tokenization: lowercase, strip non-word characters,
    /// split on whitespace, drop short tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let stripped = self.non_word.replace_all(&lowered, " ");
        stripped
            .split_whitespace()
            .filter(|t| t.len() > self.min_token_len)
            .map(|t| t.to_string())
            .collect()
    }

    /// Query-side term split: whitespace only, lowercased, same length
    /// cutoff as the index side.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .filter(|t| t.len() > self.min_token_len)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new(2)
    }
}
