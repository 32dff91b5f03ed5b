//! Sport Mode: proctored competitions over a fixed paragraph.
//!
//! Students and competitions are registered ahead of time. Each student gets a
//! single run per competition, typed under [`InputPolicy::Proctored`], and the
//! results feed a leaderboard.
//!
//! [`InputPolicy::Proctored`]: crate::typing_policy::InputPolicy::Proctored

use crate::error::{Result, TrainerError};
use crate::metrics::TypingMetrics;
use crate::storage::{self, Storage, SPORT_COMPETITIONS_KEY, SPORT_RESULTS_KEY, SPORT_STUDENTS_KEY};
use crate::util::next_id;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub group: String,
    pub registered_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: u64,
    pub title: String,
    pub text: String,
    pub duration_secs: u64,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionResult {
    pub id: u64,
    pub competition_id: u64,
    pub student_id: u64,
    pub student_name: String,
    pub wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
    pub errors: u32,
    pub time_spent: u64,
    pub completed_at: DateTime<Local>,
}

/// Leaderboard order: faster first, then more accurate, then fewer errors
pub fn leaderboard_order(a: &CompetitionResult, b: &CompetitionResult) -> Ordering {
    b.wpm
        .cmp(&a.wpm)
        .then(b.accuracy.cmp(&a.accuracy))
        .then(a.errors.cmp(&b.errors))
}

#[derive(Debug)]
pub struct SportStore<S: Storage> {
    storage: S,
    students: Vec<Student>,
    competitions: Vec<Competition>,
    results: Vec<CompetitionResult>,
}

impl<S: Storage> SportStore<S> {
    pub fn load(storage: S) -> Self {
        let students = storage::load_or_default(&storage, SPORT_STUDENTS_KEY);
        let competitions = storage::load_or_default(&storage, SPORT_COMPETITIONS_KEY);
        let results = storage::load_or_default(&storage, SPORT_RESULTS_KEY);
        Self {
            storage,
            students,
            competitions,
            results,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn results(&self) -> &[CompetitionResult] {
        &self.results
    }

    pub fn student(&self, id: u64) -> Result<&Student> {
        self.students
            .iter()
            .find(|s| s.id == id)
            .ok_or(TrainerError::UnknownStudent(id))
    }

    pub fn competition(&self, id: u64) -> Result<&Competition> {
        self.competitions
            .iter()
            .find(|c| c.id == id)
            .ok_or(TrainerError::UnknownCompetition(id))
    }

    pub fn register_student(
        &mut self,
        name: &str,
        group: &str,
        now: DateTime<Local>,
    ) -> Result<Student> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrainerError::Other("student name is empty".to_string()));
        }
        let student = Student {
            id: next_id(now, self.students.iter().map(|s| s.id)),
            name: name.to_string(),
            group: group.trim().to_string(),
            registered_at: now,
        };
        self.students.push(student.clone());
        storage::save(&self.storage, SPORT_STUDENTS_KEY, &self.students)?;
        tracing::info!(id = student.id, name = %student.name, "registered student");
        Ok(student)
    }

    pub fn create_competition(
        &mut self,
        title: &str,
        text: &str,
        duration_secs: u64,
        now: DateTime<Local>,
    ) -> Result<Competition> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TrainerError::EmptyPrompt);
        }
        let competition = Competition {
            id: next_id(now, self.competitions.iter().map(|c| c.id)),
            title: title.trim().to_string(),
            text: text.to_string(),
            duration_secs,
            created_at: now,
        };
        self.competitions.push(competition.clone());
        storage::save(&self.storage, SPORT_COMPETITIONS_KEY, &self.competitions)?;
        tracing::info!(id = competition.id, title = %competition.title, "created competition");
        Ok(competition)
    }

    pub fn has_submitted(&self, competition_id: u64, student_id: u64) -> bool {
        self.results
            .iter()
            .any(|r| r.competition_id == competition_id && r.student_id == student_id)
    }

    /// Store a student's single run for a competition
    pub fn submit_result(
        &mut self,
        competition_id: u64,
        student_id: u64,
        metrics: &TypingMetrics,
        elapsed_secs: f64,
        now: DateTime<Local>,
    ) -> Result<CompetitionResult> {
        self.competition(competition_id)?;
        let student_name = self.student(student_id)?.name.clone();
        if self.has_submitted(competition_id, student_id) {
            return Err(TrainerError::AlreadySubmitted {
                competition_id,
                student_id,
            });
        }

        let result = CompetitionResult {
            id: next_id(now, self.results.iter().map(|r| r.id)),
            competition_id,
            student_id,
            student_name,
            wpm: metrics.wpm,
            cpm: metrics.cpm,
            accuracy: metrics.accuracy,
            errors: metrics.errors as u32,
            time_spent: elapsed_secs.max(0.0).round() as u64,
            completed_at: now,
        };
        self.results.push(result.clone());
        storage::save(&self.storage, SPORT_RESULTS_KEY, &self.results)?;
        Ok(result)
    }

    pub fn leaderboard(&self, competition_id: u64) -> Result<Vec<CompetitionResult>> {
        self.competition(competition_id)?;
        let mut board: Vec<CompetitionResult> = self
            .results
            .iter()
            .filter(|r| r.competition_id == competition_id)
            .cloned()
            .collect();
        board.sort_by(leaderboard_order);
        Ok(board)
    }

    /// 1-based leaderboard position of a student's run
    pub fn rank(&self, competition_id: u64, student_id: u64) -> Option<usize> {
        self.leaderboard(competition_id)
            .ok()?
            .iter()
            .position(|r| r.student_id == student_id)
            .map(|p| p + 1)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.students.clear();
        self.competitions.clear();
        self.results.clear();
        for key in [SPORT_STUDENTS_KEY, SPORT_COMPETITIONS_KEY, SPORT_RESULTS_KEY] {
            self.storage.remove(key)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SportPhase {
    Setup,
    Register,
    Countdown,
    Typing,
    Result,
}

/// Screen flow of a single proctored run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportFlow {
    phase: SportPhase,
    competition_id: Option<u64>,
    student_id: Option<u64>,
    countdown_remaining: u32,
}

impl Default for SportFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SportFlow {
    pub fn new() -> Self {
        Self {
            phase: SportPhase::Setup,
            competition_id: None,
            student_id: None,
            countdown_remaining: 0,
        }
    }

    pub fn phase(&self) -> SportPhase {
        self.phase
    }

    pub fn competition_id(&self) -> Option<u64> {
        self.competition_id
    }

    pub fn student_id(&self) -> Option<u64> {
        self.student_id
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    fn expect(&self, phase: SportPhase, action: &'static str) -> Result<()> {
        if self.phase != phase {
            return Err(TrainerError::InvalidTransition {
                phase: self.phase.to_string(),
                action,
            });
        }
        Ok(())
    }

    pub fn select_competition(&mut self, competition_id: u64) -> Result<()> {
        self.expect(SportPhase::Setup, "select a competition")?;
        self.competition_id = Some(competition_id);
        self.phase = SportPhase::Register;
        Ok(())
    }

    pub fn register(&mut self, student_id: u64, countdown_secs: u32) -> Result<()> {
        self.expect(SportPhase::Register, "register a student")?;
        self.student_id = Some(student_id);
        self.countdown_remaining = countdown_secs;
        self.phase = SportPhase::Countdown;
        Ok(())
    }

    /// One second of countdown. Moves to typing once it reaches zero and
    /// reports whether that happened.
    pub fn tick_countdown(&mut self) -> Result<bool> {
        self.expect(SportPhase::Countdown, "count down")?;
        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining == 0 {
            self.phase = SportPhase::Typing;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn finish(&mut self) -> Result<()> {
        self.expect(SportPhase::Typing, "finish typing")?;
        self.phase = SportPhase::Result;
        Ok(())
    }
}
