use crate::app_dirs::AppDirs;
use crate::curriculum::ExamSpec;
use crate::language::SupportedLanguage;
use crate::metrics::WordCounting;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub default_test_secs: u64,
    pub number_of_words: usize,
    pub language: SupportedLanguage,
    pub word_counting: WordCounting,
    pub exam_secs: u64,
    pub exam_min_wpm: u32,
    pub exam_min_accuracy: u32,
    pub lesson_pass_accuracy: u32,
    pub sport_countdown_secs: u32,
    pub drill_words: usize,
}

impl Default for Config {
    fn default() -> Self {
        let exam = ExamSpec::default();
        Self {
            default_test_secs: 60,
            number_of_words: 50,
            language: SupportedLanguage::default(),
            word_counting: WordCounting::default(),
            exam_secs: exam.duration_secs,
            exam_min_wpm: exam.min_wpm,
            exam_min_accuracy: exam.min_accuracy,
            lesson_pass_accuracy: 90,
            sport_countdown_secs: 3,
            drill_words: 20,
        }
    }
}

impl Config {
    pub fn exam(&self) -> ExamSpec {
        ExamSpec {
            duration_secs: self.exam_secs,
            min_wpm: self.exam_min_wpm,
            min_accuracy: self.exam_min_accuracy,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            default_test_secs: 30,
            number_of_words: 25,
            language: SupportedLanguage::EnglishAdvanced,
            word_counting: WordCounting::CorrectCharsOverFive,
            exam_secs: 600,
            exam_min_wpm: 40,
            exam_min_accuracy: 95,
            lesson_pass_accuracy: 85,
            sport_countdown_secs: 5,
            drill_words: 10,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
        assert_eq!(loaded.exam().duration_secs, 600);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_test_secs": 15, "word_counting": "correct_chars_over_five"}"#)
            .unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.default_test_secs, 15);
        assert_eq!(loaded.word_counting, WordCounting::CorrectCharsOverFive);
        assert_eq!(loaded.number_of_words, Config::default().number_of_words);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }
}
