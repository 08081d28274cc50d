use super::*;

fn card_in(column_id: Uuid, title: &str) -> Card {
    Card {
        id: Uuid::new_v4(),
        title: title.into(),
        description: None,
        priority: Priority::Medium,
        due_date: None,
        completion_percentage: 0,
        column_id,
        assignee_id: None,
        created_at: None,
        updated_at: None,
    }
}

fn column(board_id: Uuid, name: &str, order: i32) -> Column {
    Column { id: Uuid::new_v4(), name: name.into(), order, board_id, column_type_id: None, cards: Vec::new() }
}

fn board_with(columns: Vec<Column>) -> Board {
    Board {
        id: Uuid::new_v4(),
        name: "Roadmap".into(),
        description: None,
        owner_id: None,
        columns,
        created_at: None,
        updated_at: None,
    }
}

// =============================================================
// Priority
// =============================================================

#[test]
fn priority_parses_uppercase_lowercase_and_aliases() {
    assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
    assert_eq!(Priority::parse("low"), Some(Priority::Low));
    assert_eq!(Priority::parse("Alta"), Some(Priority::High));
    assert_eq!(Priority::parse("baixa"), Some(Priority::Low));
    assert_eq!(Priority::parse("média"), Some(Priority::Medium));
    assert_eq!(Priority::parse("URGENT"), Some(Priority::Urgent));
    assert_eq!(Priority::parse("urgente"), Some(Priority::Urgent));
    assert_eq!(Priority::parse("someday"), None);
}

#[test]
fn priority_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"LOW\"");
    let decoded: Priority = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(decoded, Priority::Medium);
}

#[test]
fn priority_rejects_unknown_name() {
    let err = serde_json::from_str::<Priority>("\"someday\"").unwrap_err();
    assert!(err.to_string().contains("someday"));
}

#[test]
fn priority_from_str_reports_input() {
    let err = "critical".parse::<Priority>().unwrap_err();
    assert!(err.contains("critical"));
}

// =============================================================
// Decoding backend payloads
// =============================================================

#[test]
fn board_decodes_backend_shape() {
    let json = r#"{
        "id": "6f1c1d2e-54a6-4a3e-9d55-0d1f7c2b9a10",
        "name": "Launch",
        "description": "Q3 launch",
        "ownerId": null,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-02T10:00:00Z",
        "columns": [{
            "id": "0b0e4f4c-2a0c-4d3f-8f0f-9f3e5d7c1a01",
            "name": "To Do",
            "order": 0,
            "boardId": "6f1c1d2e-54a6-4a3e-9d55-0d1f7c2b9a10",
            "cards": [{
                "id": "a9b0c1d2-e3f4-4a5b-8c6d-7e8f9a0b1c2d",
                "title": "Write docs",
                "priority": "HIGH",
                "dueDate": "2024-06-30",
                "completionPercentage": 40,
                "columnId": "0b0e4f4c-2a0c-4d3f-8f0f-9f3e5d7c1a01"
            }]
        }]
    }"#;

    let board: Board = serde_json::from_str(json).unwrap();
    assert_eq!(board.name, "Launch");
    assert!(board.owner_id.is_none());
    assert_eq!(board.columns.len(), 1);
    let card = &board.columns[0].cards[0];
    assert_eq!(card.priority, Priority::High);
    assert_eq!(card.completion_percentage, 40);
    assert_eq!(card.due_date, NaiveDate::from_ymd_opt(2024, 6, 30));
    assert_eq!(card.column_id, board.columns[0].id);
}

#[test]
fn card_null_fields_fall_back_to_defaults() {
    let json = r#"{
        "id": "a9b0c1d2-e3f4-4a5b-8c6d-7e8f9a0b1c2d",
        "title": "Triage",
        "description": null,
        "priority": null,
        "completionPercentage": null,
        "columnId": "0b0e4f4c-2a0c-4d3f-8f0f-9f3e5d7c1a01"
    }"#;
    let card: Card = serde_json::from_str(json).unwrap();
    assert_eq!(card.priority, Priority::Medium);
    assert_eq!(card.completion_percentage, 0);
    assert!(card.description.is_none());
}

#[test]
fn board_with_urgent_and_out_of_range_cards_still_decodes() {
    let json = r#"{
        "id": "6f1c1d2e-54a6-4a3e-9d55-0d1f7c2b9a10",
        "name": "Ops",
        "columns": [{
            "id": "0b0e4f4c-2a0c-4d3f-8f0f-9f3e5d7c1a01",
            "name": "Doing",
            "order": 0,
            "boardId": "6f1c1d2e-54a6-4a3e-9d55-0d1f7c2b9a10",
            "cards": [
                {
                    "id": "a9b0c1d2-e3f4-4a5b-8c6d-7e8f9a0b1c2d",
                    "title": "Outage",
                    "priority": "URGENT",
                    "columnId": "0b0e4f4c-2a0c-4d3f-8f0f-9f3e5d7c1a01"
                },
                {
                    "id": "b1c2d3e4-f5a6-4b7c-8d9e-0f1a2b3c4d5e",
                    "title": "Overshoot",
                    "priority": "urgente",
                    "completionPercentage": 300,
                    "columnId": "0b0e4f4c-2a0c-4d3f-8f0f-9f3e5d7c1a01"
                }
            ]
        }]
    }"#;

    let board: Board = serde_json::from_str(json).unwrap();
    let cards = &board.columns[0].cards;
    assert_eq!(cards[0].priority, Priority::Urgent);
    assert_eq!(cards[1].priority, Priority::Urgent);
    assert_eq!(serde_json::to_value(&cards[0]).unwrap()["priority"], "URGENT");
    assert_eq!(
        board.check_invariants(),
        [InvariantViolation::CompletionOutOfRange { card_id: cards[1].id, value: 300 }]
    );
}

#[test]
fn column_null_cards_is_empty() {
    let json = r#"{
        "id": "0b0e4f4c-2a0c-4d3f-8f0f-9f3e5d7c1a01",
        "name": "Done",
        "order": 3,
        "boardId": "6f1c1d2e-54a6-4a3e-9d55-0d1f7c2b9a10",
        "cards": null
    }"#;
    let column: Column = serde_json::from_str(json).unwrap();
    assert!(column.cards.is_empty());
}

// =============================================================
// Board helpers
// =============================================================

#[test]
fn sort_columns_is_ascending_and_stable() {
    let board_id = Uuid::new_v4();
    let mut board = board_with(vec![
        column(board_id, "Done", 2),
        column(board_id, "To Do", 0),
        column(board_id, "Doing", 1),
    ]);
    board.sort_columns();
    let names: Vec<_> = board.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["To Do", "Doing", "Done"]);
}

#[test]
fn position_of_finds_card_across_columns() {
    let board_id = Uuid::new_v4();
    let mut todo = column(board_id, "To Do", 0);
    let mut done = column(board_id, "Done", 1);
    let first = card_in(todo.id, "first");
    let second = card_in(done.id, "second");
    todo.cards.push(first.clone());
    done.cards.push(second.clone());
    let board = board_with(vec![todo, done]);

    assert_eq!(board.position_of(first.id), Some((0, 0)));
    assert_eq!(board.position_of(second.id), Some((1, 0)));
    assert_eq!(board.card(second.id), Some(&second));
    assert!(board.position_of(Uuid::new_v4()).is_none());
    assert_eq!(board.card_count(), 2);
}

#[test]
fn check_invariants_clean_board() {
    let board_id = Uuid::new_v4();
    let mut todo = column(board_id, "To Do", 0);
    todo.cards.push(card_in(todo.id, "ok"));
    let board = board_with(vec![todo, column(board_id, "Done", 1)]);
    assert!(board.check_invariants().is_empty());
}

#[test]
fn check_invariants_reports_each_violation() {
    let board_id = Uuid::new_v4();
    let mut todo = column(board_id, "To Do", 0);
    let mut done = column(board_id, "Done", 0);

    let mut misplaced = card_in(done.id, "misplaced");
    misplaced.completion_percentage = 120;
    todo.cards.push(misplaced.clone());
    let mut dup = card_in(done.id, "dup");
    dup.id = misplaced.id;
    done.cards.push(dup);

    let violations = board_with(vec![todo, done]).check_invariants();
    assert!(violations.contains(&InvariantViolation::DuplicateColumnOrder { order: 0 }));
    assert!(violations.contains(&InvariantViolation::DuplicateCard { card_id: misplaced.id }));
    assert!(violations.contains(&InvariantViolation::CompletionOutOfRange { card_id: misplaced.id, value: 120 }));
    assert!(
        violations
            .iter()
            .any(|v| matches!(v, InvariantViolation::CardInWrongColumn { card_id, .. } if *card_id == misplaced.id))
    );
}

// =============================================================
// Requests
// =============================================================

#[test]
fn relocate_carries_all_mutable_fields() {
    let from = Uuid::new_v4();
    let to = Uuid::new_v4();
    let mut card = card_in(from, "ship it");
    card.description = Some("details".into());
    card.priority = Priority::High;
    card.completion_percentage = 75;
    card.assignee_id = Some(Uuid::new_v4());

    let update = CardUpdate::relocate(&card, to);
    assert_eq!(update.title.as_deref(), Some("ship it"));
    assert_eq!(update.description.as_deref(), Some("details"));
    assert_eq!(update.priority, Some(Priority::High));
    assert_eq!(update.completion_percentage, Some(75));
    assert_eq!(update.assignee_id, card.assignee_id);
    assert_eq!(update.column_id, Some(to));
}

#[test]
fn relocate_leaves_out_of_range_completion_unset() {
    let mut card = card_in(Uuid::new_v4(), "overshoot");
    card.completion_percentage = -5;
    let update = CardUpdate::relocate(&card, Uuid::new_v4());
    assert_eq!(update.completion_percentage, None);
    assert_eq!(update.title.as_deref(), Some("overshoot"));
}

#[test]
fn card_update_omits_absent_fields() {
    let update = CardUpdate { title: Some("renamed".into()), ..CardUpdate::default() };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json, serde_json::json!({ "title": "renamed" }));
    assert!(!update.is_empty());
    assert!(CardUpdate::default().is_empty());
}

#[test]
fn card_create_uses_camel_case() {
    let column_id = Uuid::new_v4();
    let request = CardCreate::new("New", column_id);
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["columnId"], serde_json::json!(column_id));
    assert_eq!(json["completionPercentage"], 0);
    assert_eq!(json["priority"], "MEDIUM");
    assert!(json.get("dueDate").is_none());
}
