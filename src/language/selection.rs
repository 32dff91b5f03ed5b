use super::core::Language;
use rand::seq::SliceRandom;
use rand::Rng;

impl Language {
    /// `num` words drawn at random; words may repeat when `num` exceeds the list
    pub fn get_random(&self, num: usize) -> Vec<String> {
        self.get_random_with(num, &mut rand::thread_rng())
    }

    pub fn get_random_with<R: Rng + ?Sized>(&self, num: usize, rng: &mut R) -> Vec<String> {
        if self.words.is_empty() {
            return Vec::new();
        }
        (0..num)
            .filter_map(|_| self.words.choose(rng).cloned())
            .collect()
    }
}
