pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::gemini::GeminiClient;
pub use crate::config::AdvisorConfig;
pub use crate::core::analyzer::DeckAnalyzer;
pub use crate::core::builder::DeckBuilder;
pub use crate::core::gateway::ModelGateway;
pub use crate::domain::model::{AnalysisResult, AnalyzeRequest, BuildRequest, BuiltDeck};
pub use crate::domain::ports::TextGenerator;
pub use crate::utils::error::{AdvisorError, GatewayError, Result};
