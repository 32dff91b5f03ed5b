use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Longest streak we bother counting
pub const MAX_STREAK_DAYS: u32 = 365;

/// Milestones unlocked by accumulated progress. The display form is the tag
/// persisted in `ProgressData::achievements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Achievement {
    FirstTest,
    TenTests,
    FiftyTests,
    HundredTests,
    #[strum(serialize = "speed_20")]
    Speed20,
    #[strum(serialize = "speed_40")]
    Speed40,
    #[strum(serialize = "speed_60")]
    Speed60,
    #[strum(serialize = "speed_80")]
    Speed80,
    #[strum(serialize = "speed_100")]
    Speed100,
    #[strum(serialize = "accuracy_90")]
    Accuracy90,
    #[strum(serialize = "accuracy_95")]
    Accuracy95,
    PerfectAccuracy,
    FirstLesson,
    FiveLessons,
    AllLessons,
    #[strum(serialize = "streak_3")]
    Streak3,
    #[strum(serialize = "streak_7")]
    Streak7,
    #[strum(serialize = "streak_30")]
    Streak30,
}

/// The aggregate figures thresholds are checked against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standing {
    pub total_tests: u32,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub streak_days: u32,
}

impl Achievement {
    pub const ALL: [Achievement; 18] = [
        Achievement::FirstTest,
        Achievement::TenTests,
        Achievement::FiftyTests,
        Achievement::HundredTests,
        Achievement::Speed20,
        Achievement::Speed40,
        Achievement::Speed60,
        Achievement::Speed80,
        Achievement::Speed100,
        Achievement::Accuracy90,
        Achievement::Accuracy95,
        Achievement::PerfectAccuracy,
        Achievement::FirstLesson,
        Achievement::FiveLessons,
        Achievement::AllLessons,
        Achievement::Streak3,
        Achievement::Streak7,
        Achievement::Streak30,
    ];

    pub fn tag(&self) -> String {
        self.to_string()
    }

    pub fn from_tag(tag: &str) -> Option<Achievement> {
        Self::ALL.into_iter().find(|a| a.tag() == tag)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstTest => "First steps: complete an activity",
            Achievement::TenTests => "Regular: complete 10 activities",
            Achievement::FiftyTests => "Dedicated: complete 50 activities",
            Achievement::HundredTests => "Centurion: complete 100 activities",
            Achievement::Speed20 => "Warming up: reach 20 WPM",
            Achievement::Speed40 => "Cruising: reach 40 WPM",
            Achievement::Speed60 => "Quick fingers: reach 60 WPM",
            Achievement::Speed80 => "Speedster: reach 80 WPM",
            Achievement::Speed100 => "Lightning: reach 100 WPM",
            Achievement::Accuracy90 => "Steady: reach 90% accuracy",
            Achievement::Accuracy95 => "Sharp: reach 95% accuracy",
            Achievement::PerfectAccuracy => "Flawless: reach 100% accuracy",
            Achievement::FirstLesson => "Student: complete a lesson",
            Achievement::FiveLessons => "Scholar: complete 5 lessons",
            Achievement::AllLessons => "Graduate: complete every lesson",
            Achievement::Streak3 => "On a roll: practice 3 days in a row",
            Achievement::Streak7 => "Habit: practice 7 days in a row",
            Achievement::Streak30 => "Unstoppable: practice 30 days in a row",
        }
    }

    pub fn is_met(&self, s: &Standing) -> bool {
        match self {
            Achievement::FirstTest => s.total_tests >= 1,
            Achievement::TenTests => s.total_tests >= 10,
            Achievement::FiftyTests => s.total_tests >= 50,
            Achievement::HundredTests => s.total_tests >= 100,
            Achievement::Speed20 => s.best_wpm >= 20,
            Achievement::Speed40 => s.best_wpm >= 40,
            Achievement::Speed60 => s.best_wpm >= 60,
            Achievement::Speed80 => s.best_wpm >= 80,
            Achievement::Speed100 => s.best_wpm >= 100,
            Achievement::Accuracy90 => s.best_accuracy >= 90,
            Achievement::Accuracy95 => s.best_accuracy >= 95,
            Achievement::PerfectAccuracy => s.best_accuracy >= 100,
            Achievement::FirstLesson => s.completed_lessons >= 1,
            Achievement::FiveLessons => s.completed_lessons >= 5,
            Achievement::AllLessons => {
                s.total_lessons > 0 && s.completed_lessons >= s.total_lessons
            }
            Achievement::Streak3 => s.streak_days >= 3,
            Achievement::Streak7 => s.streak_days >= 7,
            Achievement::Streak30 => s.streak_days >= 30,
        }
    }
}

/// Add every achievement whose threshold is met to `earned`, returning the ones
/// that were not there before. Tags already in `earned` are never removed, even
/// unknown ones.
pub fn evaluate(earned: &mut Vec<String>, standing: &Standing) -> Vec<Achievement> {
    let known: HashSet<String> = earned.iter().cloned().collect();
    let fresh: Vec<Achievement> = Achievement::ALL
        .into_iter()
        .filter(|a| a.is_met(standing) && !known.contains(&a.tag()))
        .collect();

    earned.extend(fresh.iter().map(Achievement::tag));
    fresh
}

/// Consecutive days with practice, counted backward from `today`
pub fn streak_days<I>(practice_days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: HashSet<NaiveDate> = practice_days.into_iter().collect();

    let mut streak = 0;
    let mut day = today;
    while streak < MAX_STREAK_DAYS && days.contains(&day) {
        streak += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}
