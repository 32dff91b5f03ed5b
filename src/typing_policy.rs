use crate::session::{Input, Outcome, TypingSession};
use std::time::SystemTime;

/// Which editing affordances a typing session grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum InputPolicy {
    /// Backspace and paste both allowed
    #[default]
    Standard,
    /// Sport Mode: no backspace, no paste
    Proctored,
}

impl InputPolicy {
    pub fn allows_backspace(&self) -> bool {
        matches!(self, InputPolicy::Standard)
    }

    pub fn allows_paste(&self) -> bool {
        matches!(self, InputPolicy::Standard)
    }
}

fn prepare_input(session: &mut TypingSession, c: char, now: SystemTime) -> Option<Input> {
    let idx = session.input.len();
    let expected = session.expected_char(idx)?;

    if idx == 0 && session.started_at.is_none() {
        session.start_at(now);
    }

    let outcome = if c == expected {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    };

    Some(Input {
        char: c,
        outcome,
        timestamp: now,
    })
}

/// Append a keystroke to the session. Returns false when the keystroke was
/// dropped because the session is over or the prompt is already fully typed.
pub fn apply_write(session: &mut TypingSession, c: char, now: SystemTime) -> bool {
    // keystrokes stamped past the time limit must not land
    session.tick_at(now);
    if session.has_finished() {
        return false;
    }
    match prepare_input(session, c, now) {
        Some(input) => {
            session.input.push(input);
            true
        }
        None => false,
    }
}

/// Remove the last keystroke when the policy permits it
pub fn apply_backspace(session: &mut TypingSession) -> bool {
    if !session.policy.allows_backspace() || session.has_finished() {
        return false;
    }
    session.input.pop().is_some()
}

/// Feed pasted text through as individual keystrokes when the policy permits it
pub fn apply_paste(session: &mut TypingSession, text: &str, now: SystemTime) -> bool {
    if !session.policy.allows_paste() {
        return false;
    }
    let mut any = false;
    for c in text.chars().filter(|c| !c.is_control()) {
        any |= apply_write(session, c, now);
    }
    any
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::WordCounting;
    use std::time::Duration;

    #[test]
    fn standard_allows_editing() {
        assert!(InputPolicy::Standard.allows_backspace());
        assert!(InputPolicy::Standard.allows_paste());
    }

    #[test]
    fn proctored_blocks_editing() {
        assert!(!InputPolicy::Proctored.allows_backspace());
        assert!(!InputPolicy::Proctored.allows_paste());
    }

    #[test]
    fn proctored_session_ignores_backspace_and_paste() {
        let mut session = TypingSession::new("abc", None, InputPolicy::Proctored);
        let now = SystemTime::now();

        assert!(apply_write(&mut session, 'x', now));
        assert!(!apply_backspace(&mut session));
        assert!(!apply_paste(&mut session, "bc", now));
        assert_eq!(session.typed(), "x");
    }

    #[test]
    fn writes_after_the_time_limit_are_dropped() {
        let mut session = TypingSession::new("hello world", Some(1.0), InputPolicy::Standard);
        let start = SystemTime::now();

        assert!(apply_write(&mut session, 'h', start));
        assert!(!apply_write(&mut session, 'e', start + Duration::from_secs(5)));
        assert!(!apply_paste(&mut session, "llo", start + Duration::from_secs(6)));

        assert_eq!(session.typed(), "h");
        assert!(session.has_finished());
        let results = session.results_at(start + Duration::from_secs(6), WordCounting::Tokens);
        assert_eq!(results.metrics.typed_chars, 1);
        assert_eq!(results.metrics.cpm, 60);
    }

    #[test]
    fn paste_skips_control_chars() {
        let mut session = TypingSession::new("ab", None, InputPolicy::Standard);

        assert!(apply_paste(&mut session, "a\nb", SystemTime::now()));
        assert_eq!(session.typed(), "ab");
        assert!(session.has_finished());
    }
}
