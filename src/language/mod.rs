pub mod core;
pub mod selection;
pub mod sentences;

pub use core::{Language, SupportedLanguage};
