//! Compilation passes.

mod translate;

pub use translate::{BasisTranslation, TranslationStats};
