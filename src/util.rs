use chrono::{DateTime, Local};
use time_humanize::{Accuracy, HumanTime, Tense};

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Millisecond-timestamp id that stays strictly above every id already in use
pub fn next_id(now: DateTime<Local>, existing: impl IntoIterator<Item = u64>) -> u64 {
    let candidate = now.timestamp_millis().max(0) as u64;
    match existing.into_iter().max() {
        Some(max) if max >= candidate => max + 1,
        _ => candidate,
    }
}

/// Human-facing label for a key
pub fn key_label(c: char) -> String {
    match c {
        ' ' => "SPACE".to_string(),
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

/// Rough "how long ago", e.g. "2 hours ago"
pub fn time_ago(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = (now - then).to_std().unwrap_or_default();
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}
