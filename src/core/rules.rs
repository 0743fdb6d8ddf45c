use crate::domain::model::{GameContext, Tcg};

/// Main-deck target for every game/format the table does not name.
pub const DEFAULT_TARGET_MAIN_SIZE: u32 = 60;
pub const COMMANDER_DECK_SIZE: u32 = 100;
/// Yu-Gi-Oh! main decks are a band, not a point: [40, 60].
pub const YGO_MAIN_MIN: u32 = 40;
pub const YGO_MAIN_MAX: u32 = 60;

/// Per-game copy limit. `Exempt` marks games/formats where duplicate
/// counting does not apply (Pokemon basic energy, Commander singleton).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyLimit {
    Exempt,
    Max(u32),
}

impl CopyLimit {
    pub fn is_exempt(&self) -> bool {
        matches!(self, CopyLimit::Exempt)
    }

    pub fn exceeded_by(&self, quantity: u32) -> bool {
        match self {
            CopyLimit::Exempt => false,
            CopyLimit::Max(limit) => quantity > *limit,
        }
    }
}

pub fn is_commander(ctx: &GameContext) -> bool {
    ctx.tcg == Tcg::Mtg
        && ctx
            .format
            .as_deref()
            .is_some_and(|format| format.eq_ignore_ascii_case("commander"))
}

/// Target main-deck size for a game/format. Unrecognized games fall through
/// to the 60-card default; the engine never fails on an unknown game.
pub fn target_main_size(ctx: &GameContext) -> u32 {
    if ctx.tcg == Tcg::Ygo {
        return YGO_MAIN_MIN;
    }
    if is_commander(ctx) {
        return COMMANDER_DECK_SIZE;
    }
    DEFAULT_TARGET_MAIN_SIZE
}

pub fn copy_limit(ctx: &GameContext) -> CopyLimit {
    match ctx.tcg {
        Tcg::Ygo => CopyLimit::Max(3),
        Tcg::Pokemon => CopyLimit::Exempt,
        _ if is_commander(ctx) => CopyLimit::Exempt,
        _ => CopyLimit::Max(4),
    }
}
