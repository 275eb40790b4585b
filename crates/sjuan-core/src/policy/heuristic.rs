use super::{Policy, PolicyContext};
use crate::error::GameError;
use crate::model::action::{Action, ActionKind};
use crate::model::board::{BoardMatrix, bounds_in};
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::turn::Turn;
use tracing::{Level, event};

/// Order in which action kinds are considered.
const PRIORITY: [ActionKind; 5] = [
    ActionKind::PlayAllCards,
    ActionKind::GiveCard,
    ActionKind::PlayCard,
    ActionKind::TakeCard,
    ActionKind::PassTurn,
];

/// Stateless scoring policy used for automated seats.
///
/// Cards are scored by how far they sit outside the placed range of their suit
/// (an empty suit counts as a range of just the seven). Plays take the lowest
/// score, gives surrender the highest. Ties go to the lowest card.
pub struct ActionDecider;

impl ActionDecider {
    pub fn decide_action(board: &BoardMatrix, turn: &Turn) -> Result<Action, GameError> {
        for kind in PRIORITY {
            let candidates: Vec<Action> = turn
                .actions()
                .copied()
                .filter(|action| action.kind() == kind)
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let chosen = match kind {
                ActionKind::PlayCard => {
                    let bounds = analyze_board(board);
                    pick_card(&candidates, &bounds, |score, best| score < best)
                }
                ActionKind::GiveCard => {
                    let bounds = analyze_board(board);
                    pick_card(&candidates, &bounds, |score, best| score > best)
                }
                _ => candidates.first().copied(),
            };

            if let Some(action) = chosen {
                return Ok(action);
            }
        }

        Err(GameError::NoLegalActions)
    }
}

/// Placed (min, max) rank per suit, seven/seven for untouched suits.
fn analyze_board(board: &BoardMatrix) -> [(Rank, Rank); 4] {
    Suit::ALL.map(|suit| bounds_in(board, suit).unwrap_or((Rank::Seven, Rank::Seven)))
}

pub(crate) fn score_card(card: Card, bounds: &[(Rank, Rank); 4]) -> u8 {
    let (low, high) = bounds[card.suit.index()];
    if card.rank > high {
        card.rank.distance(high)
    } else if card.rank < low {
        card.rank.distance(low)
    } else {
        0
    }
}

/// Walks candidates in ascending order and keeps the first one that `better` prefers.
fn pick_card(
    candidates: &[Action],
    bounds: &[(Rank, Rank); 4],
    better: impl Fn(u8, u8) -> bool,
) -> Option<Action> {
    let mut best: Option<(Action, u8)> = None;
    for action in candidates {
        let Some(card) = action.card() else {
            continue;
        };
        let score = score_card(card, bounds);
        match best {
            Some((_, best_score)) if !better(score, best_score) => {}
            _ => best = Some((*action, score)),
        }
    }
    best.map(|(action, _)| action)
}

/// Engine-default policy wrapping [`ActionDecider`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for HeuristicPolicy {
    fn choose_action(&mut self, ctx: &PolicyContext) -> Result<Action, GameError> {
        let chosen = ActionDecider::decide_action(ctx.board, ctx.turn)?;
        log_decision(ctx.turn, chosen);
        Ok(chosen)
    }
}

fn decision_logging_enabled() -> bool {
    std::env::var("SJUAN_DECISION_DETAILS")
        .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(false)
}

fn log_decision(turn: &Turn, chosen: Action) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    if !decision_logging_enabled() {
        return;
    }

    let legal_preview = if turn.len() <= 6 {
        turn.actions()
            .map(|action| action.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} actions", turn.len())
    };

    event!(
        target: "sjuan_core::policy",
        Level::INFO,
        seat = turn.player(),
        legal_count = turn.len(),
        legal_actions = %legal_preview,
        chosen = %chosen,
        reason = "heuristic",
    );
}
