use crate::error::Result;
use crate::progress::TestRecord;
use crate::sport::CompetitionResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the activity history as CSV, oldest first
pub fn write_history<W: Write>(out: W, records: &[TestRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "date",
        "type",
        "title",
        "wpm",
        "cpm",
        "accuracy",
        "errors",
        "time_spent",
    ])?;
    for r in records {
        writer.write_record([
            r.timestamp.format(DATE_FORMAT).to_string(),
            r.kind.to_string(),
            r.title.clone(),
            r.wpm.to_string(),
            r.cpm.to_string(),
            r.accuracy.to_string(),
            r.errors.to_string(),
            r.time_spent.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a leaderboard (already in rank order) as CSV
pub fn write_leaderboard<W: Write>(out: W, board: &[CompetitionResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "rank",
        "student",
        "wpm",
        "cpm",
        "accuracy",
        "errors",
        "time_spent",
        "completed_at",
    ])?;
    for (idx, r) in board.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            r.student_name.clone(),
            r.wpm.to_string(),
            r.cpm.to_string(),
            r.accuracy.to_string(),
            r.errors.to_string(),
            r.time_spent.to_string(),
            r.completed_at.format(DATE_FORMAT).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn history_to_file<P: AsRef<Path>>(path: P, records: &[TestRecord]) -> Result<()> {
    write_history(File::create(path)?, records)
}

pub fn leaderboard_to_file<P: AsRef<Path>>(path: P, board: &[CompetitionResult]) -> Result<()> {
    write_leaderboard(File::create(path)?, board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ActivityKind;
    use chrono::{Local, TimeZone};
    use tempfile::tempdir;

    fn record(title: &str) -> TestRecord {
        TestRecord {
            id: 1,
            kind: ActivityKind::Lesson,
            wpm: 31,
            cpm: 160,
            accuracy: 94,
            errors: 3,
            time_spent: 45,
            timestamp: Local.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
            title: title.to_string(),
        }
    }

    #[test]
    fn history_has_header_and_rows() {
        let mut buf = Vec::new();
        write_history(&mut buf, &[record("Lesson: Home row")]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,type,title,wpm,cpm,accuracy,errors,time_spent");
        assert_eq!(lines[1], "2024-02-03 04:05:06,lesson,Lesson: Home row,31,160,94,3,45");
    }

    #[test]
    fn titles_with_commas_are_quoted() {
        let mut buf = Vec::new();
        write_history(&mut buf, &[record("Drill: ,.")]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"Drill: ,.\""));
    }

    #[test]
    fn history_file_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");

        history_to_file(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
