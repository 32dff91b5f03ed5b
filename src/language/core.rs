use crate::error::{Result, TrainerError};
use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::Deserialize;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Word lists bundled into the binary
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SupportedLanguage {
    #[default]
    English,
    EnglishAdvanced,
}

impl SupportedLanguage {
    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }

    pub fn load(&self) -> Result<Language> {
        read_language_from_file(&self.file_name())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

fn read_language_from_file(file_name: &str) -> Result<Language> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| TrainerError::Other(format!("language file not found: {file_name}")))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| TrainerError::Other(format!("language file is not utf-8: {file_name}")))?;

    Ok(serde_json::from_str(file_as_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_languages_load() {
        for lang in [SupportedLanguage::English, SupportedLanguage::EnglishAdvanced] {
            let loaded = lang.load().unwrap();
            assert_eq!(loaded.name, lang.to_string());
            assert!(!loaded.words.is_empty());
            assert_eq!(loaded.size as usize, loaded.words.len());
        }
    }

    #[test]
    fn language_deserialization() {
        let json_data = r#"{"name": "test", "size": 3, "words": ["hello", "world", "test"]}"#;
        let lang: Language = serde_json::from_str(json_data).unwrap();

        assert_eq!(lang.name, "test");
        assert_eq!(lang.words, vec!["hello", "world", "test"]);
    }

    #[test]
    fn missing_language_file_is_an_error() {
        assert!(read_language_from_file("nonexistent.json").is_err());
    }
}
