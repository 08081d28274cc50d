use super::*;
use crate::board::test_helpers::{card, two_column_board};

fn titles(board: &Board, column_id: Uuid) -> Vec<String> {
    board
        .column(column_id)
        .unwrap()
        .cards
        .iter()
        .map(|c| c.title.clone())
        .collect()
}

// =============================================================
// plan_move
// =============================================================

#[test]
fn plan_move_captures_source_and_card() {
    let fx = two_column_board();
    let plan = plan_move(&fx.board, fx.card1, fx.b).unwrap();
    assert_eq!(plan.from, fx.a);
    assert_eq!(plan.to, fx.b);
    assert_eq!(plan.card.id, fx.card1);
    assert_eq!(plan.card.column_id, fx.a);
}

#[test]
fn plan_move_skips_unknown_card() {
    let fx = two_column_board();
    assert_eq!(plan_move(&fx.board, Uuid::new_v4(), fx.b), Err(MoveSkip::CardNotFound));
}

#[test]
fn plan_move_skips_same_column() {
    let fx = two_column_board();
    assert_eq!(plan_move(&fx.board, fx.card2, fx.a), Err(MoveSkip::SameColumn));
}

#[test]
fn plan_move_skips_unknown_target() {
    let fx = two_column_board();
    assert_eq!(plan_move(&fx.board, fx.card1, Uuid::new_v4()), Err(MoveSkip::UnknownTarget));
}

// =============================================================
// apply_move
// =============================================================

#[test]
fn apply_move_appends_to_target_and_reassigns_column() {
    let mut fx = two_column_board();
    let plan = plan_move(&fx.board, fx.card1, fx.b).unwrap();
    apply_move(&mut fx.board, &plan);

    assert_eq!(titles(&fx.board, fx.a), ["card2"]);
    assert_eq!(titles(&fx.board, fx.b), ["card1"]);
    assert_eq!(fx.board.card(fx.card1).unwrap().column_id, fx.b);
    assert!(fx.board.check_invariants().is_empty());
}

#[test]
fn apply_move_appends_after_existing_cards() {
    let mut fx = two_column_board();
    let first = plan_move(&fx.board, fx.card1, fx.b).unwrap();
    apply_move(&mut fx.board, &first);
    let second = plan_move(&fx.board, fx.card2, fx.b).unwrap();
    apply_move(&mut fx.board, &second);

    assert!(titles(&fx.board, fx.a).is_empty());
    assert_eq!(titles(&fx.board, fx.b), ["card1", "card2"]);
}

// =============================================================
// remove_card / upsert_card
// =============================================================

#[test]
fn remove_card_returns_removed_card() {
    let mut fx = two_column_board();
    let removed = remove_card(&mut fx.board, fx.card1).unwrap();
    assert_eq!(removed.id, fx.card1);
    assert_eq!(fx.board.card_count(), 1);
    assert!(remove_card(&mut fx.board, fx.card1).is_none());
}

#[test]
fn upsert_card_replaces_in_place() {
    let mut fx = two_column_board();
    let mut edited = fx.board.card(fx.card1).unwrap().clone();
    edited.title = "renamed".into();

    assert!(upsert_card(&mut fx.board, edited));
    assert_eq!(titles(&fx.board, fx.a), ["renamed", "card2"]);
}

#[test]
fn upsert_card_moves_between_columns() {
    let mut fx = two_column_board();
    let mut moved = fx.board.card(fx.card1).unwrap().clone();
    moved.column_id = fx.b;

    assert!(upsert_card(&mut fx.board, moved));
    assert_eq!(titles(&fx.board, fx.a), ["card2"]);
    assert_eq!(titles(&fx.board, fx.b), ["card1"]);
}

#[test]
fn upsert_card_appends_new_card() {
    let mut fx = two_column_board();
    assert!(upsert_card(&mut fx.board, card(fx.b, "fresh")));
    assert_eq!(titles(&fx.board, fx.b), ["fresh"]);
}

#[test]
fn upsert_card_ignores_foreign_column() {
    let mut fx = two_column_board();
    let before = fx.board.clone();
    assert!(!upsert_card(&mut fx.board, card(Uuid::new_v4(), "elsewhere")));
    assert_eq!(fx.board, before);
}
