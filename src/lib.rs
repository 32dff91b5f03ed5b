// Library surface for headless/integration tests and reuse.
// Terminal rendering and the event loop live in the binary.
pub mod achievements;
pub mod app_dirs;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod export;
pub mod language;
pub mod metrics;
pub mod missed_keys;
pub mod progress;
pub mod runtime;
pub mod session;
pub mod sport;
pub mod storage;
pub mod tracker;
pub mod typing_policy;
pub mod util;
pub mod word_generator;

pub use error::{Result, TrainerError};
