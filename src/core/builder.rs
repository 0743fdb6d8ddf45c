use crate::core::gateway::ModelGateway;
use crate::core::{recover, rules};
use crate::domain::model::{
    BuildRequest, BuiltCard, BuiltDeck, GameContext, GenerationConfig, Tcg,
};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{AdvisorError, Result};
use serde_json::Value;

/// Deck builder orchestrator: turns a high-level goal into a candidate card
/// list. Unlike the analyzer there is no deterministic fallback here; a
/// gateway failure propagates to the caller.
pub struct DeckBuilder<G: TextGenerator> {
    gateway: ModelGateway<G>,
    generation: GenerationConfig,
}

impl<G: TextGenerator> DeckBuilder<G> {
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

    pub async fn build(&self, request: &BuildRequest) -> Result<BuiltDeck> {
        let ctx = request.context();
        let target = request
            .target_main_size
            .unwrap_or_else(|| rules::target_main_size(&ctx));

        let instruction = build_instructions(&ctx, target, request);
        let payload = prompt_payload(request, target);

        let text = self
            .gateway
            .generate(&instruction, &payload, &self.generation)
            .await?;

        let value =
            recover::recover_structure(&text).ok_or(AdvisorError::UnusableModelOutput)?;

        let plan = value
            .get("plan")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let cards: Vec<BuiltCard> = value
            .get("cards")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(sanitize_card).collect())
            .unwrap_or_default();

        tracing::debug!(cards = cards.len(), "deck build recovered card list");
        Ok(BuiltDeck {
            model: self.gateway.model_name().to_string(),
            plan,
            cards,
        })
    }
}

fn build_instructions(ctx: &GameContext, target: u32, request: &BuildRequest) -> String {
    let mut lines = vec![
        "You are a deck building assistant for trading card games (TCGs).".to_string(),
        "Construct a complete deck list for the requested game and format.".to_string(),
        format!("Target main deck size: {} cards.", target),
    ];

    if request.enforce_rules.unwrap_or(true) {
        if rules::is_commander(ctx) {
            lines.push(
                "Commander is singleton: exactly one copy of each card except basic lands."
                    .to_string(),
            );
            lines.push("Every card must fit the commander's color identity.".to_string());
        } else if ctx.tcg == Tcg::Ygo {
            lines.push(
                "Main deck must be between 40 and 60 cards, with at most 3 copies of any card."
                    .to_string(),
            );
        } else {
            lines.push(
                "Use at most 4 copies of any card and keep the list legal for the stated format."
                    .to_string(),
            );
        }
    }

    if request
        .holdings
        .as_ref()
        .is_some_and(|holdings| !holdings.is_empty())
    {
        lines.push(
            "Prefer cards the user already owns (listed in the payload) before adding new ones."
                .to_string(),
        );
    }

    lines.push(
        r#"Return strictly valid JSON: {"plan": string, "cards": [{"name": string, "quantity": number, "section": "main"|"sideboard"|"extra"}]}."#
            .to_string(),
    );
    lines.join("\n")
}

fn prompt_payload(request: &BuildRequest, target: u32) -> String {
    let payload = serde_json::json!({
        "tcg": request.tcg,
        "format": request.format,
        "goal": request.goal.as_deref().unwrap_or("a well-rounded deck"),
        "targetMainSize": target,
        "holdings": request.holdings.as_deref().unwrap_or(&[]),
    });
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

/// Coerce one recovered card entry: non-empty name required, quantity floored
/// at 1, section restricted to the known labels with "main" as the default.
fn sanitize_card(entry: &Value) -> Option<BuiltCard> {
    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let quantity = coerce_quantity(entry.get("quantity"));
    let section = entry
        .get("section")
        .and_then(Value::as_str)
        .filter(|section| *section == "sideboard" || *section == "extra")
        .unwrap_or("main")
        .to_string();

    Some(BuiltCard {
        name: name.to_string(),
        quantity,
        section,
    })
}

fn coerce_quantity(value: Option<&Value>) -> u32 {
    let quantity = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(1),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(1),
        _ => 1,
    };
    quantity.clamp(1, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BuilderHolding;
    use crate::utils::error::GatewayError;
    use async_trait::async_trait;
    use serde_json::json;

    struct StubGenerator {
        response: std::result::Result<String, GatewayError>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            _instruction: &str,
            _payload: &str,
            _config: &GenerationConfig,
        ) -> std::result::Result<String, GatewayError> {
            self.response.clone()
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }
    }

    fn request(tcg: Tcg, format: Option<&str>) -> BuildRequest {
        BuildRequest {
            tcg,
            format: format.map(str::to_string),
            goal: Some("mono-red burn".to_string()),
            target_main_size: None,
            enforce_rules: None,
            holdings: None,
        }
    }

    #[tokio::test]
    async fn builds_and_sanitizes_a_card_list() {
        let response = json!({
            "plan": "Fast burn spells backed by cheap creatures.",
            "cards": [
                {"name": "Lightning Bolt", "quantity": 4, "section": "main"},
                {"name": "Searing Blood", "quantity": "3"},
                {"name": "Smash to Smithereens", "quantity": 2, "section": "sideboard"},
                {"name": "Roiling Vortex", "quantity": 1, "section": "bench"},
                {"name": "  ", "quantity": 4},
                {"name": "Skewer the Critics", "quantity": 0}
            ]
        });
        let builder = DeckBuilder::new(StubGenerator {
            response: Ok(response.to_string()),
        });

        let deck = builder
            .build(&request(Tcg::Mtg, Some("modern")))
            .await
            .unwrap();

        assert_eq!(deck.model, "stub-model");
        assert_eq!(deck.plan, "Fast burn spells backed by cheap creatures.");
        assert_eq!(deck.cards.len(), 5); // blank name dropped

        assert_eq!(deck.cards[0].name, "Lightning Bolt");
        assert_eq!(deck.cards[0].quantity, 4);
        assert_eq!(deck.cards[0].section, "main");

        // string quantity coerced
        assert_eq!(deck.cards[1].quantity, 3);
        assert_eq!(deck.cards[1].section, "main");

        assert_eq!(deck.cards[2].section, "sideboard");

        // unknown section normalized
        assert_eq!(deck.cards[3].section, "main");

        // zero quantity floored at 1
        assert_eq!(deck.cards[4].name, "Skewer the Critics");
        assert_eq!(deck.cards[4].quantity, 1);
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let builder = DeckBuilder::new(StubGenerator {
            response: Err(GatewayError::Transport("connection reset".to_string())),
        });

        let err = builder
            .build(&request(Tcg::Mtg, Some("standard")))
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Gateway(_)));
    }

    #[tokio::test]
    async fn unrecoverable_output_propagates() {
        let builder = DeckBuilder::new(StubGenerator {
            response: Ok("I would start with lands, then spells.".to_string()),
        });

        let err = builder
            .build(&request(Tcg::Mtg, Some("standard")))
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::UnusableModelOutput));
    }

    #[tokio::test]
    async fn missing_cards_field_yields_empty_list() {
        let builder = DeckBuilder::new(StubGenerator {
            response: Ok(json!({"plan": "thinking..."}).to_string()),
        });
        let deck = builder.build(&request(Tcg::Ygo, None)).await.unwrap();
        assert_eq!(deck.plan, "thinking...");
        assert!(deck.cards.is_empty());
    }

    #[test]
    fn instructions_embed_format_rules() {
        let commander = request(Tcg::Mtg, Some("commander"));
        let text = build_instructions(&commander.context(), 100, &commander);
        assert!(text.contains("singleton"));
        assert!(text.contains("color identity"));

        let ygo = request(Tcg::Ygo, None);
        let text = build_instructions(&ygo.context(), 40, &ygo);
        assert!(text.contains("between 40 and 60"));

        let standard = request(Tcg::Mtg, Some("standard"));
        let text = build_instructions(&standard.context(), 60, &standard);
        assert!(text.contains("at most 4 copies"));
    }

    #[test]
    fn rules_can_be_disabled() {
        let mut req = request(Tcg::Mtg, Some("commander"));
        req.enforce_rules = Some(false);
        let text = build_instructions(&req.context(), 100, &req);
        assert!(!text.contains("singleton"));
    }

    #[test]
    fn instructions_mention_holdings_only_when_present() {
        let mut req = request(Tcg::Mtg, Some("standard"));
        let without = build_instructions(&req.context(), 60, &req);
        assert!(!without.contains("already owns"));

        req.holdings = Some(vec![BuilderHolding {
            name: "Lightning Bolt".to_string(),
            quantity: 4,
        }]);
        let with = build_instructions(&req.context(), 60, &req);
        assert!(with.contains("already owns"));
    }
}
