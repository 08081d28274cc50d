//! Wire types shared by the REST collaborator and the board coordinator.
//!
//! DESIGN
//! ======
//! Field names follow the backend DTOs (camelCase JSON). One canonical
//! Board/Column/Card schema is modelled; priorities always encode uppercase
//! but decode leniently because older clients and seed data send lowercase
//! or localized names.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// =============================================================================
// PRIORITY
// =============================================================================

const PRIORITY_VARIANTS: &[&str] = &["LOW", "MEDIUM", "HIGH", "URGENT"];

/// Card priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Parse a priority name, case-insensitively, including the backend's
    /// Portuguese aliases.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" | "baixa" => Some(Self::Low),
            "medium" | "media" | "média" => Some(Self::Medium),
            "high" | "alta" => Some(Self::High),
            "urgent" | "urgente" => Some(Self::Urgent),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown priority '{s}' (expected low, medium, high or urgent)"))
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::unknown_variant(&raw, PRIORITY_VARIANTS))
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// BOARD / COLUMN / CARD
// =============================================================================

/// A task card. Belongs to exactly one column via `column_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Completion in percent, expected within `0..=100`. Kept as the
    /// backend's integer so a bad value shows up in `check_invariants`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_percentage: i32,
    pub column_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A named, ordered bucket of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Uuid,
    pub name: String,
    /// Display position; unique within a board.
    pub order: i32,
    pub board_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_type_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cards: Vec<Card>,
}

/// A project's Kanban workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Board {
    /// Stable sort of columns by their `order` field.
    pub fn sort_columns(&mut self) {
        self.columns.sort_by_key(|column| column.order);
    }

    #[must_use]
    pub fn column(&self, column_id: Uuid) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Locate a card, returning `(column index, card index)`.
    #[must_use]
    pub fn position_of(&self, card_id: Uuid) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(col_idx, column)| {
            column
                .cards
                .iter()
                .position(|card| card.id == card_id)
                .map(|card_idx| (col_idx, card_idx))
        })
    }

    #[must_use]
    pub fn card(&self, card_id: Uuid) -> Option<&Card> {
        self.position_of(card_id)
            .map(|(col_idx, card_idx)| &self.columns[col_idx].cards[card_idx])
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    /// Report every data-model invariant the board currently breaks.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let mut seen_orders = std::collections::HashSet::new();
        let mut seen_cards = std::collections::HashSet::new();

        for column in &self.columns {
            if !seen_orders.insert(column.order) {
                violations.push(InvariantViolation::DuplicateColumnOrder { order: column.order });
            }
            for card in &column.cards {
                if !seen_cards.insert(card.id) {
                    violations.push(InvariantViolation::DuplicateCard { card_id: card.id });
                }
                if card.column_id != column.id {
                    violations.push(InvariantViolation::CardInWrongColumn {
                        card_id: card.id,
                        column_id: column.id,
                        claimed: card.column_id,
                    });
                }
                if !(0..=100).contains(&card.completion_percentage) {
                    violations.push(InvariantViolation::CompletionOutOfRange {
                        card_id: card.id,
                        value: card.completion_percentage,
                    });
                }
            }
        }
        violations
    }
}

/// A broken board invariant, as reported by [`Board::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    DuplicateColumnOrder { order: i32 },
    DuplicateCard { card_id: Uuid },
    CardInWrongColumn { card_id: Uuid, column_id: Uuid, claimed: Uuid },
    CompletionOutOfRange { card_id: Uuid, value: i32 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumnOrder { order } => write!(f, "column order {order} used more than once"),
            Self::DuplicateCard { card_id } => write!(f, "card {card_id} appears more than once"),
            Self::CardInWrongColumn { card_id, column_id, claimed } => {
                write!(f, "card {card_id} listed under column {column_id} but claims column {claimed}")
            }
            Self::CompletionOutOfRange { card_id, value } => {
                write!(f, "card {card_id} completion {value}% outside 0..=100")
            }
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Body of `POST /cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completion_percentage: u8,
    pub column_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
}

impl CardCreate {
    /// New card with default priority and zero completion.
    #[must_use]
    pub fn new(title: impl Into<String>, column_id: Uuid) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_date: None,
            completion_percentage: 0,
            column_id,
            assignee_id: None,
        }
    }
}

/// Body of `PUT /cards/{id}`. Absent fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<Uuid>,
}

impl CardUpdate {
    /// Every mutable field of `card`, reassigned to `column_id`. An
    /// out-of-range completion is left for the backend to keep.
    #[must_use]
    pub fn relocate(card: &Card, column_id: Uuid) -> Self {
        Self {
            title: Some(card.title.clone()),
            description: card.description.clone(),
            priority: Some(card.priority),
            due_date: card.due_date,
            completion_percentage: u8::try_from(card.completion_percentage).ok().filter(|v| *v <= 100),
            assignee_id: card.assignee_id,
            column_id: Some(column_id),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// COMMENTS
// =============================================================================

/// A comment attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub card_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a comment `POST`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreate {
    pub text: String,
    pub card_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
