use crate::core::rules;
use crate::domain::model::{DeckCard, DeckStatistics, DuplicateEntry, GameContext};
use std::collections::BTreeMap;

pub const DEFAULT_SECTION: &str = "main";
/// Placeholder sku segment when a card has no skuId.
const MISSING_SKU: &str = "_";

/// Pooling key for duplicate counting: `productId:skuId`. Printings with
/// different skuIds stay distinct.
pub fn pair_key(card: &DeckCard) -> String {
    match card.sku_id {
        Some(sku) => format!("{}:{}", card.product_id, sku),
        None => format!("{}:{}", card.product_id, MISSING_SKU),
    }
}

/// Single pass over the card list: totals, per-section sums, unique pair
/// count, and pooled quantities exceeding the game's copy limit. Empty input
/// yields all-zero statistics; this function cannot fail.
pub fn compute_stats(cards: &[DeckCard], ctx: &GameContext) -> DeckStatistics {
    let mut by_section: BTreeMap<String, u32> = BTreeMap::new();
    let mut pooled: BTreeMap<String, u32> = BTreeMap::new();
    let mut total = 0u32;
    let mut unique = 0u32;

    for card in cards {
        let section = card.section.as_deref().unwrap_or(DEFAULT_SECTION);
        *by_section.entry(section.to_string()).or_insert(0) += card.quantity;
        total += card.quantity;

        let entry = pooled.entry(pair_key(card)).or_insert_with(|| {
            unique += 1;
            0
        });
        *entry += card.quantity;
    }

    let limit = rules::copy_limit(ctx);
    let duplicates = pooled
        .into_iter()
        .filter(|(_, quantity)| limit.exceeded_by(*quantity))
        .map(|(key, quantity)| DuplicateEntry { key, quantity })
        .collect();

    DeckStatistics {
        total,
        unique,
        by_section,
        duplicates,
    }
}
