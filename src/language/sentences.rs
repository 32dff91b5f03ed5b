use super::core::Language;
use cgisf_lib::cgisf;
use rand::Rng;

impl Language {
    /// Generate `num` random sentences, joined with single spaces.
    /// Returns the passage and its word count.
    pub fn get_random_sentences(&self, num: usize) -> (String, usize) {
        let rng = &mut rand::thread_rng();
        let sentences: Vec<String> = (0..num)
            .map(|_| {
                cgisf(
                    rng.gen_range(1..3),
                    rng.gen_range(1..3),
                    rng.gen_range(1..5),
                    rng.gen_bool(0.5),
                    rng.gen_range(1..3),
                    rng.gen_bool(0.5),
                )
                .trim()
                .to_string()
            })
            .filter(|s| !s.is_empty())
            .collect();

        let passage = sentences.join(" ");
        let word_count = passage.split_whitespace().count();
        (passage, word_count)
    }
}
