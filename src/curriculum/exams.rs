use crate::metrics::TypingMetrics;

/// A timed exam and the marks needed to pass it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSpec {
    pub duration_secs: u64,
    pub min_wpm: u32,
    pub min_accuracy: u32,
}

impl Default for ExamSpec {
    fn default() -> Self {
        Self {
            duration_secs: 300,
            min_wpm: 30,
            min_accuracy: 90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamVerdict {
    pub passed: bool,
    pub speed_ok: bool,
    pub accuracy_ok: bool,
}

impl ExamSpec {
    /// Enough sentences to keep a fast typist busy for the whole exam
    pub fn sentence_count(&self) -> usize {
        ((self.duration_secs as usize) / 6).clamp(3, 120)
    }

    pub fn title(&self) -> String {
        format!("Exam: {} min", self.duration_secs as f64 / 60.0)
    }

    pub fn grade(&self, metrics: &TypingMetrics) -> ExamVerdict {
        let speed_ok = metrics.wpm >= self.min_wpm;
        let accuracy_ok = metrics.accuracy >= self.min_accuracy;
        ExamVerdict {
            passed: speed_ok && accuracy_ok,
            speed_ok,
            accuracy_ok,
        }
    }
}
