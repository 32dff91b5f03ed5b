use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How many "words" a stretch of typed text is worth.
///
/// `Tokens` counts whitespace-delimited tokens of the typed text, which is what
/// most screens report. `CorrectCharsOverFive` uses the classic five characters
/// per word over correctly typed characters only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WordCounting {
    #[default]
    Tokens,
    CorrectCharsOverFive,
}

/// Derived statistics for one typed attempt at a target text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TypingMetrics {
    pub typed_chars: usize,
    pub correct_chars: usize,
    pub errors: usize,
    pub words: f64,
    pub wpm: u32,
    pub cpm: u32,
    /// whole percent, 0..=100
    pub accuracy: u32,
}

/// Compute metrics for `typed` against `target` after `elapsed_secs`.
///
/// Input past the end of the target is ignored, so `typed` is always treated as
/// a prefix-length attempt at the target.
pub fn compute(
    target: &str,
    typed: &str,
    elapsed_secs: f64,
    counting: WordCounting,
) -> TypingMetrics {
    let typed = truncate_to(target, typed);
    let typed_chars = typed.chars().count();
    let errors = mismatches(target, typed).count();
    let correct_chars = typed_chars - errors;

    let words = match counting {
        WordCounting::Tokens => typed.split_whitespace().count() as f64,
        WordCounting::CorrectCharsOverFive => correct_chars as f64 / 5.0,
    };

    TypingMetrics {
        typed_chars,
        correct_chars,
        errors,
        words,
        wpm: per_minute(words, elapsed_secs),
        cpm: per_minute(typed_chars as f64, elapsed_secs),
        accuracy: accuracy(correct_chars, typed_chars),
    }
}

/// Whole-percent accuracy; an empty attempt is 100% accurate
pub fn accuracy(correct_chars: usize, typed_chars: usize) -> u32 {
    if typed_chars == 0 {
        return 100;
    }
    (100.0 * correct_chars as f64 / typed_chars as f64).round() as u32
}

/// Rate of `count` per minute over `elapsed_secs`, rounded; 0 when no time has passed
pub fn per_minute(count: f64, elapsed_secs: f64) -> u32 {
    if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return 0;
    }
    (count / (elapsed_secs / 60.0)).round().max(0.0) as u32
}

/// Positions where the typed char differs from the target, paired with the
/// char that was expected there
pub fn mismatches<'a>(target: &'a str, typed: &'a str) -> impl Iterator<Item = (usize, char)> + 'a {
    typed
        .chars()
        .zip(target.chars())
        .enumerate()
        .filter(|(_, (got, expected))| got != expected)
        .map(|(idx, (_, expected))| (idx, expected))
}

pub fn is_complete(target: &str, typed: &str) -> bool {
    typed.chars().count() == target.chars().count()
}

fn truncate_to<'a>(target: &str, typed: &'a str) -> &'a str {
    let limit = target.chars().count();
    match typed.char_indices().nth(limit) {
        Some((byte_idx, _)) => &typed[..byte_idx],
        None => typed,
    }
}
