use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Reduces free text to a space-joined sequence of base-form content words
pub struct TextNormalizer {
    stemmer: Stemmer,
    stop_words: HashSet<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Creates an English normalizer
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            stop_words: stop_words::get(stop_words::LANGUAGE::English)
                .into_iter()
                .collect(),
        }
    }

    /// Normalizes `text`: lowercase, split on word boundaries, detach possessive
    /// `'s`, drop stopwords and anything not purely alphabetic, reduce the rest
    /// to base form.
    ///
    /// Base forms are Snowball stems, not dictionary lemmas: "running" becomes
    /// "run" but irregular forms such as "ran" or "mice" are left as they are.
    /// Input with no surviving words yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        lowered
            .unicode_words()
            .map(strip_possessive)
            .filter(|word| word.chars().all(char::is_alphabetic))
            .filter(|word| !self.stop_words.contains(*word))
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect::<Vec<String>>()
            .join(" ")
    }

    #[cfg(test)]
    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

/// "batman's" -> "batman"; other apostrophe forms are left intact
fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("\u{2019}s"))
        .unwrap_or(word)
}
