use thiserror::Error;

/// Errors surfaced by the trainer's stores and flows
#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown lesson: {0}")]
    UnknownLesson(String),

    #[error("unknown competition: {0}")]
    UnknownCompetition(u64),

    #[error("unknown student: {0}")]
    UnknownStudent(u64),

    /// Sport Mode allows a single run per student and competition
    #[error("student {student_id} already has a result for competition {competition_id}")]
    AlreadySubmitted { competition_id: u64, student_id: u64 },

    #[error("cannot {action} while in the {phase} phase")]
    InvalidTransition { phase: String, action: &'static str },

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TrainerError>;

impl From<String> for TrainerError {
    fn from(s: String) -> Self {
        TrainerError::Other(s)
    }
}
