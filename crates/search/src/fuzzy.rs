//! Approximate string matching.
//!
//! Scores are in `[0, 1]`, lower is better, `0` for an exact substring.

use nutrilog_core::config::IndexConfig;
use unicode_segmentation::UnicodeSegmentation;

/// Per-field matching options derived from [`IndexConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Fragments shorter than this never match
    pub min_match_char_length: usize,
    /// Field matches scoring above this are rejected
    pub threshold: f64,
    /// Ignore where in the field the match occurs
    pub ignore_location: bool,
    /// Expected match position when location is scored
    pub location: usize,
    /// Distance over which location costs a full score point
    pub distance: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::from(&IndexConfig::default())
    }
}

impl From<&IndexConfig> for MatchOptions {
    fn from(config: &IndexConfig) -> Self {
        Self {
            min_match_char_length: config.min_match_char_length,
            threshold: config.match_threshold,
            ignore_location: config.ignore_location,
            location: config.location,
            distance: config.distance,
        }
    }
}

/// A lowercased query, split into chars once per search.
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    chars: Vec<char>,
}

impl Pattern {
    pub fn new(query: &str) -> Self {
        let text = query.to_lowercase();
        let chars = text.chars().collect();
        Self { text, chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Edit distance from `pattern` to its closest substring of `text`, per end position.
///
/// Two-row Levenshtein, except that the first row is all zeros, so the match
/// may start anywhere in `text` for free. Entry `j` of the result is the
/// fewest edits for a match ending before char `j`.
fn substring_distances(pattern: &[char], text: &[char]) -> Vec<usize> {
    let n = text.len();

    let mut prev = vec![0; n + 1];
    let mut curr = vec![0; n + 1];

    for (i, &p) in pattern.iter().enumerate() {
        curr[0] = i + 1;
        for j in 1..=n {
            let cost = if p == text[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev
}

fn location_penalty(start: usize, options: &MatchOptions) -> f64 {
    if options.ignore_location {
        return 0.0;
    }
    let proximity = start.abs_diff(options.location);
    if options.distance == 0 {
        return if proximity == 0 { 0.0 } else { 1.0 };
    }
    proximity as f64 / options.distance as f64
}

/// Score `text` against `pattern`. `text` must already be lowercased.
///
/// Returns `None` when the field does not match.
pub fn score_field(pattern: &Pattern, text: &str, text_chars: &[char], options: &MatchOptions) -> Option<f64> {
    let m = pattern.len();
    if m == 0 || m < options.min_match_char_length {
        return None;
    }

    if let Some(byte_pos) = text.find(&pattern.text) {
        let start = text[..byte_pos].chars().count();
        let score = location_penalty(start, options);
        return (score <= options.threshold).then_some(score);
    }

    let distances = substring_distances(&pattern.chars, text_chars);

    let mut best: Option<(f64, usize)> = None;
    for (end, &errors) in distances.iter().enumerate().skip(1) {
        if errors >= m {
            continue;
        }
        let start = end.saturating_sub(m - errors);
        let score = errors as f64 / m as f64 + location_penalty(start, options);
        if best.is_none_or(|(b, _)| score < b) {
            best = Some((score, errors));
        }
    }

    let (score, errors) = best?;
    if m - errors < options.min_match_char_length || score > options.threshold {
        return None;
    }
    Some(score.min(1.0))
}

/// Field-length normalisation: `1 / sqrt(words)`, rounded to 3 decimals.
pub fn field_norm(text: &str) -> f64 {
    let words = text.unicode_words().count().max(1);
    ((1.0 / (words as f64).sqrt()) * 1000.0).round() / 1000.0
}
