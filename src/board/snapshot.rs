//! Pure board mutations. No I/O, no locking; the coordinator decides when
//! to call them and stamps versions.

use std::fmt;

use uuid::Uuid;

use crate::types::{Board, Card};

/// Why a requested move does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveSkip {
    CardNotFound,
    SameColumn,
    UnknownTarget,
}

impl fmt::Display for MoveSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CardNotFound => "card not on board",
            Self::SameColumn => "card already in target column",
            Self::UnknownTarget => "target column not on board",
        })
    }
}

/// A validated move: the card as it is now and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MovePlan {
    pub card: Card,
    pub from: Uuid,
    pub to: Uuid,
}

pub(crate) fn plan_move(board: &Board, card_id: Uuid, target: Uuid) -> Result<MovePlan, MoveSkip> {
    let (col_idx, card_idx) = board.position_of(card_id).ok_or(MoveSkip::CardNotFound)?;
    let source = &board.columns[col_idx];
    let card = &source.cards[card_idx];

    if card.column_id == target || source.id == target {
        return Err(MoveSkip::SameColumn);
    }
    if board.column(target).is_none() {
        return Err(MoveSkip::UnknownTarget);
    }
    Ok(MovePlan { card: card.clone(), from: source.id, to: target })
}

/// Remove the card from its source column and append it to the target with
/// its `column_id` reassigned.
pub(crate) fn apply_move(board: &mut Board, plan: &MovePlan) {
    let Some(mut card) = remove_card(board, plan.card.id) else {
        return;
    };
    card.column_id = plan.to;
    if let Some(target) = board.columns.iter_mut().find(|c| c.id == plan.to) {
        target.cards.push(card);
    }
}

pub(crate) fn remove_card(board: &mut Board, card_id: Uuid) -> Option<Card> {
    let (col_idx, card_idx) = board.position_of(card_id)?;
    Some(board.columns[col_idx].cards.remove(card_idx))
}

/// Insert or replace `card`. A card staying in its column keeps its position;
/// a card changing column is appended to the new one. Returns `false` (and
/// leaves the board untouched) when the card's column is not on this board.
pub(crate) fn upsert_card(board: &mut Board, card: Card) -> bool {
    let Some(target_idx) = board.columns.iter().position(|c| c.id == card.column_id) else {
        return false;
    };

    match board.position_of(card.id) {
        Some((col_idx, card_idx)) if col_idx == target_idx => {
            board.columns[col_idx].cards[card_idx] = card;
        }
        Some((col_idx, card_idx)) => {
            board.columns[col_idx].cards.remove(card_idx);
            board.columns[target_idx].cards.push(card);
        }
        None => board.columns[target_idx].cards.push(card),
    }
    true
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
