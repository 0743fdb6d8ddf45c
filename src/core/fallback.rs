use crate::core::rules;
use crate::domain::model::{
    AiAnalysis, AiPayload, DeckStatistics, GameContext, Issue, Suggestion, Tcg,
};

/// Deterministic substitute for the model's analysis, built only from the
/// statistics and the rule table. Used whenever the gateway or the recoverer
/// cannot produce a usable result; `reason` is the upstream failure's
/// message and lands verbatim in the single `API_ERROR` issue.
pub fn fallback_analysis(stats: &DeckStatistics, ctx: &GameContext, reason: &str) -> AiPayload {
    let target = rules::target_main_size(ctx);
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if ctx.tcg == Tcg::Ygo {
        if (rules::YGO_MAIN_MIN..=rules::YGO_MAIN_MAX).contains(&stats.total) {
            strengths.push("Proper deck size".to_string());
        }
        if stats.total < rules::YGO_MAIN_MIN {
            weaknesses.push(format!(
                "Deck too small ({}/{} cards)",
                stats.total,
                rules::YGO_MAIN_MIN
            ));
        }
        if stats.total > rules::YGO_MAIN_MAX {
            weaknesses.push(format!(
                "Deck too large ({}/{} max)",
                stats.total,
                rules::YGO_MAIN_MAX
            ));
        }
    } else if rules::is_commander(ctx) {
        // Commander is an exact size, not a ceiling
        if stats.total == rules::COMMANDER_DECK_SIZE {
            strengths.push("Proper Commander deck size (100)".to_string());
        } else {
            weaknesses.push(format!(
                "Commander deck must be 100 cards (currently {})",
                stats.total
            ));
        }
    } else {
        if stats.total == target {
            strengths.push("Proper deck size".to_string());
        }
        if stats.total < target {
            weaknesses.push(format!("Deck too small ({}/{} cards)", stats.total, target));
        }
        if stats.total > target {
            weaknesses.push(format!("Deck too large ({}/{} target)", stats.total, target));
        }
    }

    if !rules::copy_limit(ctx).is_exempt() && !stats.duplicates.is_empty() {
        weaknesses.push("Has cards with more than allowed copies".to_string());
    }

    let format_suffix = ctx
        .format
        .as_deref()
        .map(|format| format!(" {}", format))
        .unwrap_or_default();
    let summary = format!(
        "This is a {}-card {}{} deck with {} unique cards.",
        stats.total, ctx.tcg, format_suffix, stats.unique
    );

    let suggestions = if stats.total < target {
        vec![Suggestion {
            change: format!("Add cards to reach {}", target),
            rationale: "Meet format deck size".to_string(),
            requires_purchase: false,
        }]
    } else {
        Vec::new()
    };

    AiPayload {
        analysis: AiAnalysis {
            summary,
            strengths,
            weaknesses,
        },
        issues: vec![Issue {
            kind: "API_ERROR".to_string(),
            detail: reason.to_string(),
            severity: "warning".to_string(),
        }],
        suggestions,
        stats: stats.clone(),
        raw: None,
    }
}
