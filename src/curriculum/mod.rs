//! What there is to practice: the lesson catalog, key drills and exams.

pub mod drills;
pub mod exams;
pub mod lessons;

pub use drills::Drill;
pub use exams::{ExamSpec, ExamVerdict};
pub use lessons::{Lesson, LESSONS};
