use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "deck-advisor")]
#[command(about = "AI-assisted deck analysis and building for trading card games")]
pub struct Cli {
    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "TOML config file; falls back to GOOGLE_API_KEY/GEMINI_MODEL env vars")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a deck list and return statistics plus an AI critique
    Analyze {
        #[arg(long, help = "JSON file with {name?, cards: [{productId, skuId?, quantity, section?}]}")]
        deck: PathBuf,

        #[arg(long, default_value = "mtg")]
        tcg: String,

        #[arg(long)]
        format: Option<String>,

        #[arg(long, help = "JSON file with owned cards [{productId, skuId?, quantity}]")]
        holdings: Option<PathBuf>,
    },

    /// Build a candidate deck list from a high-level goal
    Build {
        #[arg(long, default_value = "mtg")]
        tcg: String,

        #[arg(long)]
        format: Option<String>,

        #[arg(long, help = "Archetype or goal, e.g. \"mono-red burn\"")]
        goal: Option<String>,

        #[arg(long)]
        target_main_size: Option<u32>,

        #[arg(long, help = "Skip format-rule reminders in the instruction")]
        no_rules: bool,

        #[arg(long, help = "JSON file with owned cards [{name, quantity}]")]
        owned: Option<PathBuf>,
    },
}
