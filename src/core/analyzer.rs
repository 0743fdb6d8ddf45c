use crate::core::gateway::ModelGateway;
use crate::core::{fallback, recover, stats};
use crate::domain::model::{
    AiAnalysis, AiPayload, AnalysisResult, AnalyzeRequest, DeckStatistics, GenerationConfig,
    HoldingEntry, Issue,
};
use crate::domain::ports::TextGenerator;

/// Prompt-size guards: extreme decks and collections are truncated before
/// they reach the model.
pub const MAX_PROMPT_CARDS: usize = 500;
pub const MAX_PROMPT_HOLDINGS: usize = 200;
const RAW_EXCERPT_CHARS: usize = 200;

const ANALYSIS_INSTRUCTIONS: &str = r#"You are a deck building assistant for trading card games (TCGs).
Return a concise JSON response with:
{
  "analysis": {"summary": string, "strengths": string[], "weaknesses": string[]},
  "issues": [ {"type": string, "detail": string, "severity": "error"|"warning"} ],
  "suggestions": [ {"change": string, "rationale": string, "requiresPurchase": boolean} ],
  "stats": {"bySection": object, "total": number, "unique": number}
}
Rules:
- Consider tcg and format; mention assumptions if format-specific data is missing.
- Prefer suggestions that use owned cards (provided in holdings) when possible.
- If legality constraints are unknown, flag potential legality checks as warnings, not errors.
- Keep output strictly valid JSON with no extra commentary."#;

/// Deck analysis orchestrator: stats, model invocation, structured-response
/// recovery, deterministic fallback. Every reachable path returns a
/// structurally valid [`AnalysisResult`]; this type never fails a request.
pub struct DeckAnalyzer<G: TextGenerator> {
    gateway: ModelGateway<G>,
    generation: GenerationConfig,
}

impl<G: TextGenerator> DeckAnalyzer<G> {
    pub fn new(generator: G) -> Self {
        Self::with_gateway(ModelGateway::new(generator))
    }

    pub fn with_gateway(gateway: ModelGateway<G>) -> Self {
        Self {
            gateway,
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub async fn analyze(&self, request: &AnalyzeRequest) -> AnalysisResult {
        let ctx = request.context();
        let stats = stats::compute_stats(&request.deck.cards, &ctx);
        let model = self.gateway.model_name().to_string();
        tracing::debug!(
            total = stats.total,
            unique = stats.unique,
            "computed deck statistics"
        );

        let payload = prompt_payload(request, &stats);
        let text = match self
            .gateway
            .generate(ANALYSIS_INSTRUCTIONS, &payload, &self.generation)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("analysis degraded to deterministic fallback: {}", err);
                let ai = fallback::fallback_analysis(&stats, &ctx, &err.to_string());
                return AnalysisResult { model, stats, ai };
            }
        };

        let recovered = recover::recover_structure(&text)
            .and_then(|value| serde_json::from_value::<AiPayload>(value).ok());

        let ai = match recovered {
            Some(mut ai) => {
                // local statistics are the ground truth, never the model's
                ai.stats = stats.clone();
                ai
            }
            None => {
                tracing::warn!("model response was not recoverable JSON");
                unparsed_payload(&text, &stats)
            }
        };

        AnalysisResult { model, stats, ai }
    }
}

fn prompt_payload(request: &AnalyzeRequest, stats: &DeckStatistics) -> String {
    let cards = &request.deck.cards[..request.deck.cards.len().min(MAX_PROMPT_CARDS)];
    let holdings: &[HoldingEntry] = request.holdings.as_deref().unwrap_or(&[]);
    let holdings = &holdings[..holdings.len().min(MAX_PROMPT_HOLDINGS)];

    let payload = serde_json::json!({
        "tcg": request.tcg,
        "format": request.format,
        "deck": {
            "name": request.deck.name.as_deref().unwrap_or("Untitled Deck"),
            "stats": stats,
            "cards": cards,
        },
        "holdings": holdings,
    });
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

fn unparsed_payload(raw: &str, stats: &DeckStatistics) -> AiPayload {
    AiPayload {
        analysis: AiAnalysis {
            summary: "AI returned non-JSON response".to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
        },
        issues: vec![Issue {
            kind: "LLM_PARSE".to_string(),
            detail: excerpt(raw, RAW_EXCERPT_CHARS),
            severity: "warning".to_string(),
        }],
        suggestions: Vec::new(),
        stats: stats.clone(),
        raw: Some(raw.to_string()),
    }
}

fn excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Deck, DeckCard, Tcg};
    use crate::utils::error::GatewayError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct StubGenerator {
        response: Result<String, GatewayError>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            _instruction: &str,
            _payload: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            self.response.clone()
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }
    }

    struct HangingGenerator;

    #[async_trait]
    impl TextGenerator for HangingGenerator {
        async fn generate(
            &self,
            _instruction: &str,
            _payload: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            std::future::pending().await
        }

        fn model_name(&self) -> &str {
            "hanging-model"
        }
    }

    fn request(tcg: Tcg, format: Option<&str>, cards: Vec<DeckCard>) -> AnalyzeRequest {
        AnalyzeRequest {
            tcg,
            format: format.map(str::to_string),
            deck: Deck { name: None, cards },
            holdings: None,
        }
    }

    fn card(product_id: i64, quantity: u32) -> DeckCard {
        DeckCard {
            product_id,
            sku_id: None,
            quantity,
            section: None,
        }
    }

    #[tokio::test]
    async fn valid_model_response_becomes_ai_payload() {
        let response = serde_json::json!({
            "analysis": {"summary": "Aggressive list", "strengths": ["fast"], "weaknesses": []},
            "issues": [],
            "suggestions": [],
            "stats": {"total": 999, "unique": 999, "bySection": {}, "duplicates": []}
        });
        let analyzer = DeckAnalyzer::new(StubGenerator {
            response: Ok(response.to_string()),
        });

        let result = analyzer
            .analyze(&request(Tcg::Mtg, Some("standard"), vec![card(1, 4)]))
            .await;

        assert_eq!(result.model, "stub-model");
        assert_eq!(result.ai.analysis.summary, "Aggressive list");
        // the model's self-reported stats are overridden by ground truth
        assert_eq!(result.ai.stats.total, 4);
        assert_eq!(result.ai.stats, result.stats);
        assert!(result.ai.issues.is_empty());
    }

    #[tokio::test]
    async fn fenced_model_response_is_recovered() {
        let analyzer = DeckAnalyzer::new(StubGenerator {
            response: Ok(
                "```json\n{\"analysis\": {\"summary\": \"ok\"}, \"issues\": []}\n```".to_string(),
            ),
        });
        let result = analyzer
            .analyze(&request(Tcg::Mtg, None, vec![card(1, 4)]))
            .await;
        assert_eq!(result.ai.analysis.summary, "ok");
    }

    #[tokio::test]
    async fn non_json_response_degrades_with_raw_preserved() {
        let prose = "Sorry, I can only describe the deck in plain words.";
        let analyzer = DeckAnalyzer::new(StubGenerator {
            response: Ok(prose.to_string()),
        });

        let result = analyzer
            .analyze(&request(Tcg::Mtg, Some("standard"), vec![card(1, 4)]))
            .await;

        assert_eq!(result.ai.analysis.summary, "AI returned non-JSON response");
        assert_eq!(result.ai.issues.len(), 1);
        assert_eq!(result.ai.issues[0].kind, "LLM_PARSE");
        assert_eq!(result.ai.issues[0].detail, prose);
        assert_eq!(result.ai.raw.as_deref(), Some(prose));
        assert_eq!(result.ai.stats, result.stats);
    }

    #[tokio::test]
    async fn long_raw_text_is_excerpted_in_the_issue() {
        let prose = "x".repeat(600);
        let analyzer = DeckAnalyzer::new(StubGenerator {
            response: Ok(prose.clone()),
        });
        let result = analyzer.analyze(&request(Tcg::Mtg, None, vec![])).await;
        assert_eq!(result.ai.issues[0].detail.len(), 203); // 200 chars + "..."
        assert_eq!(result.ai.raw.as_deref(), Some(prose.as_str()));
    }

    #[tokio::test]
    async fn scalar_response_takes_the_parse_failure_path() {
        // recoverable as JSON, but not coercible into the payload object
        let analyzer = DeckAnalyzer::new(StubGenerator {
            response: Ok("42".to_string()),
        });
        let result = analyzer.analyze(&request(Tcg::Mtg, None, vec![])).await;
        assert_eq!(result.ai.issues[0].kind, "LLM_PARSE");
    }

    #[tokio::test]
    async fn transport_failure_falls_back_deterministically() {
        let analyzer = DeckAnalyzer::new(StubGenerator {
            response: Err(GatewayError::Transport("boom".to_string())),
        });

        let result = analyzer
            .analyze(&request(Tcg::Pokemon, None, vec![card(1, 60)]))
            .await;

        assert_eq!(result.stats.total, 60);
        assert_eq!(result.stats.unique, 1);
        assert!(result.stats.duplicates.is_empty());
        assert_eq!(result.ai.issues.len(), 1);
        assert_eq!(result.ai.issues[0].kind, "API_ERROR");
        assert!(result.ai.issues[0].detail.contains("boom"));
        assert!(result
            .ai
            .analysis
            .strengths
            .contains(&"Proper deck size".to_string()));
    }

    #[tokio::test]
    async fn empty_response_reason_reaches_the_issue_detail() {
        let analyzer = DeckAnalyzer::new(StubGenerator {
            response: Ok(String::new()),
        });
        let result = analyzer.analyze(&request(Tcg::Mtg, None, vec![card(1, 4)])).await;
        assert_eq!(result.ai.issues[0].kind, "API_ERROR");
        assert_eq!(
            result.ai.issues[0].detail,
            "AI service returned empty response"
        );
    }

    #[tokio::test]
    async fn timeout_degrades_within_bounded_time() {
        let analyzer = DeckAnalyzer::with_gateway(ModelGateway::with_timeout(
            HangingGenerator,
            Duration::from_millis(50),
        ));

        let started = std::time::Instant::now();
        let result = analyzer
            .analyze(&request(Tcg::Mtg, Some("standard"), vec![card(1, 4)]))
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(result.ai.issues[0].kind, "API_ERROR");
        assert!(result.ai.issues[0].detail.contains("timed out"));
    }
}
