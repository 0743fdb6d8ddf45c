use clap::Parser;
use deck_advisor::config::cli::{Cli, Command};
use deck_advisor::domain::model::{AnalyzeRequest, BuildRequest, BuilderHolding, Deck, HoldingEntry, Tcg};
use deck_advisor::utils::{logger, validation::Validate};
use deck_advisor::{AdvisorConfig, DeckAnalyzer, DeckBuilder, GeminiClient, ModelGateway};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting deck-advisor CLI");

    let config = match &cli.config {
        Some(path) => AdvisorConfig::from_file(path)?,
        None => AdvisorConfig::from_env()?,
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = GeminiClient::new(&config);
    let gateway = ModelGateway::with_timeout(client, config.timeout());

    match cli.command {
        Command::Analyze {
            deck,
            tcg,
            format,
            holdings,
        } => {
            let deck: Deck = read_json(&deck)?;
            let holdings: Option<Vec<HoldingEntry>> = match holdings {
                Some(path) => Some(read_json(&path)?),
                None => None,
            };
            let request = AnalyzeRequest {
                tcg: Tcg::from(tcg),
                format,
                deck,
                holdings,
            };
            if let Err(e) = request.validate() {
                tracing::error!("❌ Request validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }

            let analyzer =
                DeckAnalyzer::with_gateway(gateway).with_generation_config(config.generation());
            let result = analyzer.analyze(&request).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            tracing::info!("✅ Deck analysis completed");
        }
        Command::Build {
            tcg,
            format,
            goal,
            target_main_size,
            no_rules,
            owned,
        } => {
            let holdings: Option<Vec<BuilderHolding>> = match owned {
                Some(path) => Some(read_json(&path)?),
                None => None,
            };
            let request = BuildRequest {
                tcg: Tcg::from(tcg),
                format,
                goal,
                target_main_size,
                enforce_rules: Some(!no_rules),
                holdings,
            };
            if let Err(e) = request.validate() {
                tracing::error!("❌ Request validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }

            let builder =
                DeckBuilder::with_gateway(gateway).with_generation_config(config.generation());
            match builder.build(&request).await {
                Ok(deck) => {
                    println!("{}", serde_json::to_string_pretty(&deck)?);
                    tracing::info!("✅ Deck build completed ({} cards)", deck.cards.len());
                }
                Err(e) => {
                    // no fallback for the builder; surface the failure
                    tracing::error!("❌ Deck build failed: {}", e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
