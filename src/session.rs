use crate::metrics::{self, TypingMetrics, WordCounting};
use crate::typing_policy::{self, InputPolicy};
use crate::util::std_dev;
use itertools::Itertools;
use std::time::SystemTime;

#[derive(Clone, Debug, Copy, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Input {
    pub char: char,
    pub outcome: Outcome,
    pub timestamp: SystemTime,
}

/// Cumulative speed `t` seconds into a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmPoint {
    pub t: f64,
    pub wpm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    pub metrics: TypingMetrics,
    pub elapsed_secs: f64,
    pub wpm_series: Vec<WpmPoint>,
    /// std deviation of correct chars per whole second
    pub consistency: f64,
}

/// A prompt being typed by the user
#[derive(Debug)]
pub struct TypingSession {
    pub prompt: String,
    prompt_chars: Vec<char>,
    pub input: Vec<Input>,
    pub policy: InputPolicy,
    pub started_at: Option<SystemTime>,
    pub time_limit: Option<f64>,
    pub seconds_remaining: Option<f64>,
}

impl TypingSession {
    pub fn new(prompt: impl Into<String>, time_limit: Option<f64>, policy: InputPolicy) -> Self {
        let prompt = prompt.into();
        let prompt_chars = prompt.chars().collect();
        Self {
            prompt,
            prompt_chars,
            input: Vec::new(),
            policy,
            started_at: None,
            time_limit,
            seconds_remaining: time_limit,
        }
    }

    pub fn prompt_len(&self) -> usize {
        self.prompt_chars.len()
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.prompt_chars.get(idx).copied()
    }

    pub fn cursor_pos(&self) -> usize {
        self.input.len()
    }

    pub fn start_at(&mut self, now: SystemTime) {
        self.started_at = Some(now);
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        !self.prompt_chars.is_empty() && self.input.len() >= self.prompt_chars.len()
    }

    pub fn is_time_up(&self) -> bool {
        matches!(self.seconds_remaining, Some(remaining) if remaining <= 0.0)
    }

    pub fn has_finished(&self) -> bool {
        self.is_complete() || self.is_time_up()
    }

    pub fn write(&mut self, c: char) -> bool {
        typing_policy::apply_write(self, c, SystemTime::now())
    }

    pub fn write_at(&mut self, c: char, now: SystemTime) -> bool {
        typing_policy::apply_write(self, c, now)
    }

    pub fn backspace(&mut self) -> bool {
        typing_policy::apply_backspace(self)
    }

    pub fn paste(&mut self, text: &str) -> bool {
        typing_policy::apply_paste(self, text, SystemTime::now())
    }

    pub fn on_tick(&mut self) {
        self.tick_at(SystemTime::now());
    }

    /// Refresh the countdown from the wall clock
    pub fn tick_at(&mut self, now: SystemTime) {
        if let (Some(started_at), Some(limit)) = (self.started_at, self.time_limit) {
            let elapsed = secs_between(started_at, now);
            self.seconds_remaining = Some((limit - elapsed).max(0.0));
        }
    }

    pub fn typed(&self) -> String {
        self.input.iter().map(|i| i.char).collect()
    }

    pub fn error_count(&self) -> usize {
        self.input
            .iter()
            .filter(|i| i.outcome == Outcome::Incorrect)
            .count()
    }

    /// Seconds between the first keystroke and either the last keystroke of a
    /// completed prompt or `now`, capped at the time limit
    pub fn elapsed_secs_at(&self, now: SystemTime) -> f64 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        let end = match self.input.last() {
            Some(last) if self.is_complete() => last.timestamp,
            _ => now,
        };
        let elapsed = secs_between(started_at, end);
        match self.time_limit {
            Some(limit) => elapsed.min(limit),
            None => elapsed,
        }
    }

    pub fn results(&self, counting: WordCounting) -> SessionResults {
        self.results_at(SystemTime::now(), counting)
    }

    pub fn results_at(&self, now: SystemTime, counting: WordCounting) -> SessionResults {
        let elapsed_secs = self.elapsed_secs_at(now);
        let metrics = metrics::compute(&self.prompt, &self.typed(), elapsed_secs, counting);
        let (wpm_series, consistency) = self.wpm_series(elapsed_secs);

        SessionResults {
            metrics,
            elapsed_secs,
            wpm_series,
            consistency,
        }
    }

    /// Bucket correct keystrokes into whole seconds and derive cumulative WPM
    /// (five chars per word) plus the spread of per-second counts
    fn wpm_series(&self, elapsed_secs: f64) -> (Vec<WpmPoint>, f64) {
        let Some(started_at) = self.started_at else {
            return (Vec::new(), 0.0);
        };
        let last_bucket = elapsed_secs.ceil().max(1.0) as u64;

        let per_second: Vec<(u64, usize)> = self
            .input
            .iter()
            .filter(|i| i.outcome == Outcome::Correct)
            .map(|i| {
                let secs = secs_between(started_at, i.timestamp).ceil() as u64;
                secs.clamp(1, last_bucket)
            })
            .counts()
            .into_iter()
            .sorted()
            .collect();

        let whole_seconds: Vec<f64> = per_second
            .iter()
            .take(per_second.len().saturating_sub(1))
            .map(|&(_, n)| n as f64)
            .collect();
        let consistency = std_dev(&whole_seconds).unwrap_or(0.0);

        let mut cumulative = 0usize;
        let series = per_second
            .into_iter()
            .map(|(t, n)| {
                cumulative += n;
                let t = t as f64;
                WpmPoint {
                    t,
                    wpm: (60.0 / t) * cumulative as f64 / 5.0,
                }
            })
            .collect();

        (series, consistency)
    }
}

fn secs_between(start: SystemTime, end: SystemTime) -> f64 {
    end.duration_since(start)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: SystemTime, ms: u64) -> SystemTime {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn new_session_is_idle() {
        let session = TypingSession::new("hello world", None, InputPolicy::Standard);

        assert_eq!(session.prompt, "hello world");
        assert_eq!(session.prompt_len(), 11);
        assert_eq!(session.cursor_pos(), 0);
        assert!(!session.has_started());
        assert!(!session.has_finished());
    }

    #[test]
    fn time_limit_seeds_the_countdown() {
        let session = TypingSession::new("test", Some(30.0), InputPolicy::Standard);

        assert_eq!(session.time_limit, Some(30.0));
        assert_eq!(session.seconds_remaining, Some(30.0));
    }

    #[test]
    fn first_keystroke_starts_the_clock() {
        let mut session = TypingSession::new("test", None, InputPolicy::Standard);
        let base = SystemTime::now();

        session.write_at('t', base);

        assert_eq!(session.started_at, Some(base));
        assert_eq!(session.input[0].outcome, Outcome::Correct);
    }

    #[test]
    fn wrong_char_is_recorded_and_advances() {
        let mut session = TypingSession::new("test", None, InputPolicy::Standard);

        session.write('x');

        assert_eq!(session.input[0].char, 'x');
        assert_eq!(session.input[0].outcome, Outcome::Incorrect);
        assert_eq!(session.cursor_pos(), 1);
        assert_eq!(session.error_count(), 1);
    }

    #[test]
    fn backspace_removes_last_input() {
        let mut session = TypingSession::new("test", None, InputPolicy::Standard);

        session.write('t');
        session.write('x');
        assert!(session.backspace());
        assert_eq!(session.typed(), "t");

        assert!(session.backspace());
        assert!(!session.backspace());
        assert_eq!(session.cursor_pos(), 0);
    }

    #[test]
    fn finishes_when_prompt_is_fully_typed() {
        let mut session = TypingSession::new("hi", None, InputPolicy::Standard);

        session.write('h');
        assert!(!session.has_finished());
        session.write('i');
        assert!(session.has_finished());

        assert!(!session.write('!'));
        assert_eq!(session.typed(), "hi");
    }

    #[test]
    fn finishes_when_time_runs_out() {
        let mut session = TypingSession::new("hello", Some(1.0), InputPolicy::Standard);
        let base = SystemTime::now();

        session.write_at('h', base);
        session.tick_at(at(base, 500));
        assert_eq!(session.seconds_remaining, Some(0.5));
        assert!(!session.has_finished());

        session.tick_at(at(base, 1500));
        assert_eq!(session.seconds_remaining, Some(0.0));
        assert!(session.has_finished());
        assert!(!session.write_at('e', at(base, 1600)));
    }

    #[test]
    fn tick_before_start_keeps_full_time() {
        let mut session = TypingSession::new("hello", Some(10.0), InputPolicy::Standard);
        session.tick_at(SystemTime::now());
        assert_eq!(session.seconds_remaining, Some(10.0));
    }

    #[test]
    fn elapsed_ends_at_last_keystroke_of_a_completed_prompt() {
        let mut session = TypingSession::new("ab", None, InputPolicy::Standard);
        let base = SystemTime::now();

        session.write_at('a', base);
        session.write_at('b', at(base, 2000));

        assert_eq!(session.elapsed_secs_at(at(base, 9000)), 2.0);
    }

    #[test]
    fn elapsed_is_capped_by_the_time_limit() {
        let mut session = TypingSession::new("abcdef", Some(3.0), InputPolicy::Standard);
        let base = SystemTime::now();

        session.write_at('a', base);

        assert_eq!(session.elapsed_secs_at(at(base, 5000)), 3.0);
    }

    #[test]
    fn results_follow_the_metrics_rules() {
        let mut session = TypingSession::new("the cat sat", None, InputPolicy::Standard);
        let base = SystemTime::now();

        for (i, c) in "the cat sar".chars().enumerate() {
            session.write_at(c, at(base, i as u64 * 600));
        }
        let results = session.results_at(at(base, 10_000), WordCounting::Tokens);

        assert_eq!(results.elapsed_secs, 6.0);
        assert_eq!(results.metrics.errors, 1);
        assert_eq!(results.metrics.accuracy, 91);
        assert_eq!(results.metrics.wpm, 30);
        assert_eq!(results.metrics.cpm, 110);
    }

    #[test]
    fn wpm_series_is_cumulative_per_second() {
        let mut session = TypingSession::new("abcdefghij", None, InputPolicy::Standard);
        let base = SystemTime::now();

        for (i, c) in "abcdefghij".chars().enumerate() {
            session.write_at(c, at(base, i as u64 * 400));
        }
        let results = session.results_at(base, WordCounting::Tokens);

        assert!(!results.wpm_series.is_empty());
        assert_eq!(results.wpm_series[0].t, 1.0);
        let last = results.wpm_series.last().unwrap();
        assert_eq!(last.t, 4.0);
        assert_eq!(last.wpm, (60.0 / 4.0) * 10.0 / 5.0);
        assert!(results.consistency >= 0.0);
    }

    #[test]
    fn results_of_an_untouched_session_are_empty() {
        let session = TypingSession::new("abc", Some(5.0), InputPolicy::Standard);
        let results = session.results(WordCounting::Tokens);

        assert_eq!(results.elapsed_secs, 0.0);
        assert_eq!(results.metrics.wpm, 0);
        assert_eq!(results.metrics.accuracy, 100);
        assert!(results.wpm_series.is_empty());
        assert_eq!(results.consistency, 0.0);
    }

    #[test]
    fn empty_prompt_never_completes_by_typing() {
        let mut session = TypingSession::new("", None, InputPolicy::Standard);
        assert!(!session.is_complete());
        assert!(!session.write('a'));
    }
}
