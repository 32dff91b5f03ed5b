use crate::error::{Result, TrainerError};
use crate::language::SupportedLanguage;

/// Configuration for word generation
#[derive(Debug, Clone)]
pub struct WordGenConfig {
    pub number_of_words: usize,
    pub number_of_sentences: Option<usize>,
    pub custom_prompt: Option<String>,
    pub language: SupportedLanguage,
}

impl Default for WordGenConfig {
    fn default() -> Self {
        Self {
            number_of_words: 50,
            number_of_sentences: None,
            custom_prompt: None,
            language: SupportedLanguage::default(),
        }
    }
}

/// Builds prompts for word tests and exams
pub struct WordGenerator {
    config: WordGenConfig,
}

impl WordGenerator {
    pub fn new(config: WordGenConfig) -> Self {
        Self { config }
    }

    /// Generate a prompt and its word count. A custom prompt wins over
    /// sentences, which win over random words.
    pub fn generate_prompt(&self) -> Result<(String, usize)> {
        if let Some(ref custom_prompt) = self.config.custom_prompt {
            let prompt = custom_prompt.trim();
            if prompt.is_empty() {
                return Err(TrainerError::EmptyPrompt);
            }
            return Ok((prompt.to_string(), prompt.split_whitespace().count()));
        }

        if let Some(sentence_count) = self.config.number_of_sentences {
            return self.generate_sentences(sentence_count);
        }

        self.generate_words()
    }

    /// Generate sentences using cgisf
    fn generate_sentences(&self, count: usize) -> Result<(String, usize)> {
        let language = self.config.language.load()?;
        let (passage, word_count) = language.get_random_sentences(count.max(1));
        if passage.is_empty() {
            return Err(TrainerError::EmptyPrompt);
        }
        Ok((passage, word_count))
    }

    fn generate_words(&self) -> Result<(String, usize)> {
        if self.config.number_of_words == 0 {
            return Err(TrainerError::EmptyPrompt);
        }
        let language = self.config.language.load()?;
        let words = language.get_random(self.config.number_of_words);
        Ok((words.join(" "), words.len()))
    }
}
