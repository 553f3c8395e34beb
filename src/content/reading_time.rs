//! Reading time estimation

use super::Section;

/// Words per minute used when nothing else is configured
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Estimates reading minutes from word counts
#[derive(Debug, Clone, Copy)]
pub struct ReadingTimeEstimator {
    words_per_minute: usize,
}

impl Default for ReadingTimeEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_MINUTE)
    }
}

impl ReadingTimeEstimator {
    pub fn new(words_per_minute: usize) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
        }
    }

    pub fn words_per_minute(&self) -> usize {
        self.words_per_minute
    }

    /// Count whitespace-separated words in headings and block text
    pub fn count_words(content: &[Section]) -> usize {
        content
            .iter()
            .map(|section| {
                let heading = section.heading.split_whitespace().count();
                let body: usize = section
                    .body
                    .iter()
                    .filter_map(|block| block.text())
                    .map(|text| text.split_whitespace().count())
                    .sum();
                heading + body
            })
            .sum()
    }

    /// Estimated minutes, rounded up
    pub fn estimate(&self, content: &[Section]) -> usize {
        Self::count_words(content).div_ceil(self.words_per_minute)
    }
}
