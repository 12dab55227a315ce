//! Text normalization, tokenization and chunking

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    url_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let url_regex = Regex::new(r"https?://[^\s]+").expect("Invalid URL regex");
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            url_regex,
            whitespace_regex,
        }
    }

    /// Strip URLs, fold typographic punctuation and collapse whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let without_urls = self.url_regex.replace_all(text, " ");
        let folded = Self::fold_punctuation(&without_urls);
        self.whitespace_regex
            .replace_all(&folded, " ")
            .trim()
            .to_string()
    }

    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Greedy sentence packing into chunks of at most `max_chars` characters.
    ///
    /// A single sentence longer than `max_chars` is split on character
    /// boundaries.
    pub fn chunk(&self, text: &str, max_chars: usize) -> Vec<String> {
        let max_chars = max_chars.max(1);
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in self.split_sentences(text) {
            let sentence_len = sentence.chars().count();
            let current_len = current.chars().count();

            if current_len > 0 && current_len + 1 + sentence_len <= max_chars {
                current.push(' ');
                current.push_str(&sentence);
                continue;
            }

            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }

            if sentence_len <= max_chars {
                current = sentence;
            } else {
                let chars: Vec<char> = sentence.chars().collect();
                for piece in chars.chunks(max_chars) {
                    chunks.push(piece.iter().collect());
                }
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    fn fold_punctuation(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2022}' => ' ',
                _ => c,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let tp = TextProcessor::new();
        let out = tp.normalize("Portfolio: https://example.com/me\n\n\u{2022} Creative\t\u{201C}lead\u{201D}");
        assert_eq!(out, "Portfolio: Creative \"lead\"");
    }

    #[test]
    fn test_chunk_respects_limit() {
        let tp = TextProcessor::new();
        let text = "First sentence here. Second one follows. Third closes it.";
        let chunks = tp.chunk(text, 40);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 40));
        assert_eq!(chunks[0], "First sentence here. Second one follows.");
    }

    #[test]
    fn test_chunk_splits_long_sentence() {
        let tp = TextProcessor::new();
        let text = "a".repeat(25);
        let chunks = tp.chunk(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 5);
    }

    #[test]
    fn test_chunk_empty() {
        let tp = TextProcessor::new();
        assert!(tp.chunk("   ", 512).is_empty());
    }
}
