pub mod analyzer;
pub mod builder;
pub mod fallback;
pub mod gateway;
pub mod recover;
pub mod rules;
pub mod stats;

pub use crate::domain::model::{AnalysisResult, BuiltDeck, DeckStatistics};
pub use crate::domain::ports::TextGenerator;
pub use crate::utils::error::Result;
