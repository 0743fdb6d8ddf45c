use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One deck entry. `section` defaults to "main" when absent; identity for
/// duplicate counting is the `(product_id, sku_id)` pair, so two printings of
/// the same product (foil vs. non-foil) are tracked separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    pub product_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<i64>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Cards the user already owns. Read-only bias signal for the model prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingEntry {
    pub product_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<i64>,
    pub quantity: u32,
}

/// Supported games. Unrecognized identifiers are carried through as `Other`
/// so the engine degrades to default rules instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tcg {
    Mtg,
    Pokemon,
    Ygo,
    Other(String),
}

impl From<String> for Tcg {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "mtg" => Tcg::Mtg,
            "pokemon" => Tcg::Pokemon,
            "ygo" => Tcg::Ygo,
            _ => Tcg::Other(value),
        }
    }
}

impl From<Tcg> for String {
    fn from(value: Tcg) -> Self {
        match value {
            Tcg::Mtg => "mtg".to_string(),
            Tcg::Pokemon => "pokemon".to_string(),
            Tcg::Ygo => "ygo".to_string(),
            Tcg::Other(name) => name,
        }
    }
}

impl fmt::Display for Tcg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tcg::Mtg => write!(f, "MTG"),
            Tcg::Pokemon => write!(f, "POKEMON"),
            Tcg::Ygo => write!(f, "YGO"),
            Tcg::Other(name) => write!(f, "{}", name.to_ascii_uppercase()),
        }
    }
}

/// Game + optional format, the rule table lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub tcg: Tcg,
    #[serde(default)]
    pub format: Option<String>,
}

/// Deterministic deck statistics; the numeric ground truth of every result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStatistics {
    pub total: u32,
    pub unique: u32,
    #[serde(default)]
    pub by_section: BTreeMap<String, u32>,
    #[serde(default)]
    pub duplicates: Vec<DuplicateEntry>,
}

/// A pooled `productId:skuId` key whose quantity exceeds the copy limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub key: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default = "default_severity")]
    pub severity: String,
}

fn default_severity() -> String {
    "warning".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub change: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub requires_purchase: bool,
}

/// The model-facing half of an analysis result. Every field is defaulted so
/// loosely-typed model output coerces into this shape instead of failing;
/// `stats` is always overwritten with the locally computed statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiPayload {
    #[serde(default)]
    pub analysis: AiAnalysis,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub stats: DeckStatistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Uniform analysis result. Identical shape on the model-assisted and the
/// deterministic fallback path; callers inspect `ai.issues[].type` to detect
/// degraded mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub model: String,
    pub stats: DeckStatistics,
    pub ai: AiPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub cards: Vec<DeckCard>,
}

/// Deck analysis request contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub tcg: Tcg,
    #[serde(default)]
    pub format: Option<String>,
    pub deck: Deck,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdings: Option<Vec<HoldingEntry>>,
}

impl AnalyzeRequest {
    pub fn context(&self) -> GameContext {
        GameContext {
            tcg: self.tcg.clone(),
            format: self.format.clone(),
        }
    }
}

/// Holdings for the builder are name-based, not id-based: the model works
/// with card names when composing a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderHolding {
    pub name: String,
    pub quantity: u32,
}

/// Deck builder request contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub tcg: Tcg,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub target_main_size: Option<u32>,
    #[serde(default)]
    pub enforce_rules: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdings: Option<Vec<BuilderHolding>>,
}

impl BuildRequest {
    pub fn context(&self) -> GameContext {
        GameContext {
            tcg: self.tcg.clone(),
            format: self.format.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltCard {
    pub name: String,
    pub quantity: u32,
    pub section: String,
}

/// Deck builder response: a free-text plan plus the sanitized card list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltDeck {
    pub model: String,
    pub plan: String,
    pub cards: Vec<BuiltCard>,
}

/// Generation parameters passed through to the text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Ask the provider for a JSON response mime type.
    pub json_output: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_output_tokens: 1024,
            json_output: true,
        }
    }
}
