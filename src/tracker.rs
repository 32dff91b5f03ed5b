use crate::achievements::Achievement;
use crate::curriculum::{Drill, ExamSpec, ExamVerdict, Lesson};
use crate::error::Result;
use crate::missed_keys::MissedKeysStore;
use crate::progress::{ActivityKind, ProgressStore, TestRecord};
use crate::session::{SessionResults, TypingSession};
use crate::sport::SportStore;
use crate::storage::Storage;
use crate::util::next_id;
use chrono::{DateTime, Local};

/// What the user just finished typing
#[derive(Debug, Clone)]
pub enum Activity {
    Test { time_limit: Option<u64> },
    Lesson(&'static Lesson),
    Drill(Drill),
    Exam(ExamSpec),
    Sport {
        competition_id: u64,
        student_id: u64,
        title: String,
    },
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Test { .. } | Activity::Sport { .. } => ActivityKind::Test,
            Activity::Lesson(_) => ActivityKind::Lesson,
            Activity::Drill(_) => ActivityKind::Drill,
            Activity::Exam(_) => ActivityKind::Exam,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Activity::Test {
                time_limit: Some(secs),
            } => format!("Timed test: {secs}s"),
            Activity::Test { time_limit: None } => "Word test".to_string(),
            Activity::Lesson(lesson) => format!("Lesson: {}", lesson.title),
            Activity::Drill(drill) => drill.title(),
            Activity::Exam(exam) => exam.title(),
            Activity::Sport { title, .. } => format!("Sport: {title}"),
        }
    }
}

/// Everything the results screen reports about a finished activity
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub record: TestRecord,
    pub new_achievements: Vec<Achievement>,
    pub missed: usize,
    pub lesson_passed: Option<bool>,
    pub exam: Option<ExamVerdict>,
    pub sport_rank: Option<usize>,
}

/// Routes a finished session into every store it touches
pub struct Tracker<S: Storage> {
    pub progress: ProgressStore<S>,
    pub missed_keys: MissedKeysStore<S>,
    pub sport: SportStore<S>,
    lesson_pass_accuracy: u32,
}

impl<S: Storage + Clone> Tracker<S> {
    pub fn load(storage: S, lesson_pass_accuracy: u32) -> Self {
        Self {
            progress: ProgressStore::load(storage.clone()),
            missed_keys: MissedKeysStore::load(storage.clone()),
            sport: SportStore::load(storage),
            lesson_pass_accuracy,
        }
    }
}

impl<S: Storage> Tracker<S> {
    pub fn complete(
        &mut self,
        activity: &Activity,
        session: &TypingSession,
        results: &SessionResults,
        now: DateTime<Local>,
    ) -> Result<Completion> {
        let typed = session.typed();
        let metrics = &results.metrics;

        let mut sport_rank = None;
        if let Activity::Sport {
            competition_id,
            student_id,
            ..
        } = activity
        {
            self.sport.submit_result(
                *competition_id,
                *student_id,
                metrics,
                results.elapsed_secs,
                now,
            )?;
            sport_rank = self.sport.rank(*competition_id, *student_id);
        }

        let missed = self.missed_keys.record(&session.prompt, &typed, now)?;

        let lesson_passed = match activity {
            Activity::Lesson(lesson) => Some(self.progress.record_lesson(
                lesson.id,
                metrics,
                self.lesson_pass_accuracy,
                now,
            )?),
            _ => None,
        };
        if let Activity::Drill(drill) = activity {
            self.progress.record_drill(&drill.id(), metrics, now)?;
        }
        let exam = match activity {
            Activity::Exam(spec) => Some(spec.grade(metrics)),
            _ => None,
        };

        let id = next_id(now, self.progress.data().tests.iter().map(|t| t.id));
        let record = TestRecord::new(
            id,
            activity.kind(),
            activity.title(),
            metrics,
            results.elapsed_secs,
            now,
        );
        let new_achievements = self.progress.record(record.clone())?;

        tracing::info!(
            kind = %record.kind,
            title = %record.title,
            wpm = record.wpm,
            accuracy = record.accuracy,
            errors = record.errors,
            unlocked = new_achievements.len(),
            "activity completed"
        );

        Ok(Completion {
            record,
            new_achievements,
            missed,
            lesson_passed,
            exam,
            sport_rank,
        })
    }

    /// Wipe history, missed keys and every Sport Mode collection
    pub fn reset_all(&mut self) -> Result<()> {
        self.progress.clear()?;
        self.missed_keys.clear()?;
        self.sport.clear()?;
        tracing::info!("cleared all stored progress");
        Ok(())
    }
}
