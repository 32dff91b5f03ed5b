use crate::error::{Result, TrainerError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Short exercise built only from a handful of target keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drill {
    keys: Vec<char>,
}

impl Drill {
    /// Whitespace is dropped and duplicates collapse
    pub fn new(keys: impl IntoIterator<Item = char>) -> Result<Self> {
        let keys: BTreeSet<char> = keys.into_iter().filter(|c| !c.is_whitespace()).collect();
        if keys.is_empty() {
            return Err(TrainerError::EmptyPrompt);
        }
        Ok(Self {
            keys: keys.into_iter().collect(),
        })
    }

    pub fn keys(&self) -> &[char] {
        &self.keys
    }

    /// Stable identifier: the sorted key set
    pub fn id(&self) -> String {
        self.keys.iter().collect()
    }

    pub fn title(&self) -> String {
        format!("Drill: {}", self.id())
    }

    pub fn text(&self, words: usize) -> String {
        self.text_with(words, &mut rand::thread_rng())
    }

    /// `words` pseudo-words of two to five keys each, every key appearing at
    /// least once when there are enough slots
    pub fn text_with<R: Rng + ?Sized>(&self, words: usize, rng: &mut R) -> String {
        let mut pool: Vec<char> = Vec::new();
        let lengths: Vec<usize> = (0..words).map(|_| rng.gen_range(2..=5)).collect();
        let total: usize = lengths.iter().sum();

        while pool.len() < total {
            let mut round = self.keys.clone();
            round.shuffle(rng);
            pool.extend(round);
        }
        pool.truncate(total);
        pool.shuffle(rng);

        let mut chars = pool.into_iter();
        lengths
            .into_iter()
            .map(|len| chars.by_ref().take(len).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keys_are_sorted_and_deduplicated() {
        let drill = Drill::new("kfj fj".chars()).unwrap();
        assert_eq!(drill.keys(), &['f', 'j', 'k']);
        assert_eq!(drill.id(), "fjk");
        assert_eq!(drill.title(), "Drill: fjk");
    }

    #[test]
    fn empty_key_set_is_rejected() {
        assert!(Drill::new("  ".chars()).is_err());
    }

    #[test]
    fn text_uses_only_drill_keys() {
        let drill = Drill::new("asdf".chars()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let text = drill.text_with(12, &mut rng);

        assert_eq!(text.split(' ').count(), 12);
        assert!(text.chars().all(|c| c == ' ' || "asdf".contains(c)));
        for word in text.split(' ') {
            assert!((2..=5).contains(&word.chars().count()));
        }
        for key in drill.keys() {
            assert!(text.contains(*key));
        }
    }
}
