use crate::achievements::{self, Achievement, Standing};
use crate::curriculum::LESSONS;
use crate::error::Result;
use crate::metrics::TypingMetrics;
use crate::storage::{self, Storage, PROGRESS_KEY};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityKind {
    Test,
    Lesson,
    Game,
    Drill,
    Exam,
}

/// One completed activity. Appended to history and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
    pub errors: u32,
    /// whole seconds
    pub time_spent: u64,
    pub timestamp: DateTime<Local>,
    pub title: String,
}

impl TestRecord {
    pub fn new(
        id: u64,
        kind: ActivityKind,
        title: impl Into<String>,
        metrics: &TypingMetrics,
        elapsed_secs: f64,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            kind,
            wpm: metrics.wpm,
            cpm: metrics.cpm,
            accuracy: metrics.accuracy,
            errors: metrics.errors as u32,
            time_spent: elapsed_secs.max(0.0).round() as u64,
            timestamp,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonProgress {
    pub attempts: u32,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub completed: bool,
    pub last_attempt: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrillProgress {
    pub attempts: u32,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub last_attempt: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressData {
    pub tests: Vec<TestRecord>,
    pub total_tests: u32,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub achievements: Vec<String>,
    pub lesson_progress: BTreeMap<String, LessonProgress>,
    pub drill_progress: BTreeMap<String, DrillProgress>,
}

impl ProgressData {
    pub fn completed_lessons(&self) -> usize {
        self.lesson_progress.values().filter(|l| l.completed).count()
    }

    pub fn streak(&self, today: NaiveDate) -> u32 {
        achievements::streak_days(self.tests.iter().map(|t| t.timestamp.date_naive()), today)
    }

    pub fn standing(&self, today: NaiveDate) -> Standing {
        Standing {
            total_tests: self.total_tests,
            best_wpm: self.best_wpm,
            best_accuracy: self.best_accuracy,
            completed_lessons: self.completed_lessons(),
            total_lessons: LESSONS.len(),
            streak_days: self.streak(today),
        }
    }

    /// Most recent first
    pub fn recent(&self, n: usize) -> Vec<&TestRecord> {
        self.tests.iter().rev().take(n).collect()
    }

    pub fn average_wpm(&self) -> Option<f64> {
        if self.tests.is_empty() {
            return None;
        }
        let total: u64 = self.tests.iter().map(|t| t.wpm as u64).sum();
        Some(total as f64 / self.tests.len() as f64)
    }

    /// Append a finished activity and fold it into the aggregates.
    /// Returns the achievements this unlocked.
    pub fn apply(&mut self, record: TestRecord) -> Vec<Achievement> {
        let today = record.timestamp.date_naive();
        self.total_tests += 1;
        self.best_wpm = self.best_wpm.max(record.wpm);
        self.best_accuracy = self.best_accuracy.max(record.accuracy);
        self.tests.push(record);
        self.reevaluate(today)
    }

    pub fn reevaluate(&mut self, today: NaiveDate) -> Vec<Achievement> {
        let standing = self.standing(today);
        achievements::evaluate(&mut self.achievements, &standing)
    }

    /// Record a lesson attempt; returns whether this attempt met the pass mark
    pub fn apply_lesson(
        &mut self,
        lesson_id: &str,
        metrics: &TypingMetrics,
        pass_accuracy: u32,
        at: DateTime<Local>,
    ) -> bool {
        let passed = metrics.accuracy >= pass_accuracy;
        let entry = self.lesson_progress.entry(lesson_id.to_string()).or_default();
        entry.attempts += 1;
        entry.best_wpm = entry.best_wpm.max(metrics.wpm);
        entry.best_accuracy = entry.best_accuracy.max(metrics.accuracy);
        entry.completed |= passed;
        entry.last_attempt = Some(at);
        passed
    }

    pub fn apply_drill(&mut self, drill_id: &str, metrics: &TypingMetrics, at: DateTime<Local>) {
        let entry = self.drill_progress.entry(drill_id.to_string()).or_default();
        entry.attempts += 1;
        entry.best_wpm = entry.best_wpm.max(metrics.wpm);
        entry.best_accuracy = entry.best_accuracy.max(metrics.accuracy);
        entry.last_attempt = Some(at);
    }
}

/// `ProgressData` bound to its storage slot
#[derive(Debug)]
pub struct ProgressStore<S: Storage> {
    storage: S,
    data: ProgressData,
}

impl<S: Storage> ProgressStore<S> {
    pub fn load(storage: S) -> Self {
        let data = storage::load_or_default(&storage, PROGRESS_KEY);
        Self { storage, data }
    }

    pub fn data(&self) -> &ProgressData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ProgressData {
        &mut self.data
    }

    pub fn save(&self) -> Result<()> {
        storage::save(&self.storage, PROGRESS_KEY, &self.data)
    }

    pub fn record(&mut self, record: TestRecord) -> Result<Vec<Achievement>> {
        let unlocked = self.data.apply(record);
        self.save()?;
        Ok(unlocked)
    }

    /// Lesson attempts are folded in before the matching `record` call so that
    /// lesson achievements see the updated completion count
    pub fn record_lesson(
        &mut self,
        lesson_id: &str,
        metrics: &TypingMetrics,
        pass_accuracy: u32,
        at: DateTime<Local>,
    ) -> Result<bool> {
        let passed = self.data.apply_lesson(lesson_id, metrics, pass_accuracy, at);
        self.save()?;
        Ok(passed)
    }

    pub fn record_drill(
        &mut self,
        drill_id: &str,
        metrics: &TypingMetrics,
        at: DateTime<Local>,
    ) -> Result<()> {
        self.data.apply_drill(drill_id, metrics, at);
        self.save()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.data = ProgressData::default();
        self.storage.remove(PROGRESS_KEY)
    }
}
