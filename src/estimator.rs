use std::fmt;

use clap::ValueEnum;

/// Strategy used to turn a body of text into a word count
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WordCounter {
    /// split on any whitespace and drop empty tokens
    #[default]
    Whitespace,
    /// split on the ASCII space only, counting every segment (empty text counts as one word)
    Naive,
}

impl WordCounter {
    pub fn count(&self, text: &str) -> u64 {
        match self {
            WordCounter::Whitespace => text.split_whitespace().count() as u64,
            WordCounter::Naive => text.split(' ').count() as u64,
        }
    }
}

/// A reading-time estimate, truncated to whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTime {
    pub minutes: u64,
    pub seconds: u64,
}

impl ReadTime {
    /// Estimate for `words` at `wpm`. Returns `None` when `wpm` is zero.
    ///
    /// `floor(words / wpm)` minutes and `floor(frac(words / wpm) * 60)` seconds in `f64`,
    /// so fractions that land just under a whole second round down (156 words at 130 is 1m 11s).
    pub fn from_words(words: u64, wpm: u32) -> Option<Self> {
        if wpm == 0 {
            return None;
        }
        let minutes = words as f64 / f64::from(wpm);
        let whole = minutes.floor();
        let seconds = ((minutes - whole) * 60.0).floor();
        Some(Self {
            minutes: whole as u64,
            seconds: seconds as u64,
        })
    }
}

impl fmt::Display for ReadTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}s read time", self.minutes, self.seconds)
    }
}

/// Estimate the reading time of `text` and format it for the status bar
pub fn estimate(text: &str, wpm: u32, counter: WordCounter) -> Option<String> {
    ReadTime::from_words(counter.count(text), wpm).map(|rt| rt.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_empty_text_reads_instantly() {
        assert_eq!(
            estimate("", 130, WordCounter::Whitespace).as_deref(),
            Some("0m 0s read time")
        );
        assert_eq!(
            estimate("", 130, WordCounter::Naive).as_deref(),
            Some("0m 0s read time")
        );
    }

    #[test]
    fn test_empty_text_word_counts() {
        assert_eq!(WordCounter::Whitespace.count(""), 0);
        assert_eq!(WordCounter::Naive.count(""), 1);
    }

    #[test]
    fn test_five_words() {
        assert_eq!(
            estimate("one two three four five", 130, WordCounter::Whitespace).as_deref(),
            Some("0m 2s read time")
        );
    }

    #[test]
    fn test_exact_minutes() {
        assert_eq!(
            estimate(&words(260), 130, WordCounter::Whitespace).as_deref(),
            Some("2m 0s read time")
        );
        assert_eq!(
            estimate(&words(260), 130, WordCounter::Naive).as_deref(),
            Some("2m 0s read time")
        );
    }

    #[test]
    fn test_fractional_seconds_round_down() {
        let cases = [
            (156, 130, "1m 11s read time"),
            (182, 130, "1m 23s read time"),
            (247, 130, "1m 53s read time"),
            (299, 130, "2m 17s read time"),
            (131, 130, "1m 0s read time"),
            (9, 7, "1m 17s read time"),
            (80, 160, "0m 30s read time"),
        ];
        for (n, wpm, want) in cases {
            assert_eq!(
                estimate(&words(n), wpm, WordCounter::Whitespace).as_deref(),
                Some(want),
                "n={n} wpm={wpm}"
            );
        }
    }

    #[test]
    fn test_zero_wpm_has_no_estimate() {
        assert_eq!(ReadTime::from_words(100, 0), None);
        assert_eq!(estimate("a b c", 0, WordCounter::Naive), None);
    }

    #[test]
    fn test_naive_counter_inflates_on_double_spaces() {
        assert_eq!(WordCounter::Naive.count("a  b"), 3);
        assert_eq!(WordCounter::Whitespace.count("a  b"), 2);
    }

    #[test]
    fn test_naive_counter_ignores_newlines() {
        assert_eq!(WordCounter::Naive.count("a\nb c"), 2);
        assert_eq!(WordCounter::Whitespace.count("a\nb\tc"), 3);
    }

    #[test]
    fn test_huge_word_counts_do_not_overflow() {
        let rt = ReadTime::from_words(u64::MAX, 1).unwrap();
        assert!(rt.minutes > 0);
    }

    #[test]
    fn test_counter_display() {
        assert_eq!(WordCounter::Whitespace.to_string(), "whitespace");
        assert_eq!(WordCounter::Naive.to_string(), "naive");
    }
}
