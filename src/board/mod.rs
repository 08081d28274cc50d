//! Board state — the versioned snapshot, its events, and the coordinator.
//!
//! DESIGN
//! ======
//! The coordinator owns exactly one [`BoardSnapshot`] per board view. Every
//! mutation stamps the snapshot with a fresh, strictly increasing version.
//! Optimistic moves remember the version they produced; a failed move only
//! rolls back while that version is still current, so a stale failure can
//! never overwrite a newer state.
//!
//! Observers subscribe to [`BoardEvent`]s (a broadcast channel) and read the
//! snapshot through the coordinator; nothing else mutates it.

pub mod coordinator;
pub(crate) mod snapshot;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{BoardError, ErrorCode};
use crate::types::Board;

pub use coordinator::{BoardCoordinator, PendingMove};

/// A board plus the version stamped by the mutation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub version: u64,
}

/// User-facing failure notice. Emitted exactly once per rejected move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub message: String,
    /// The session should be dropped and the user asked to sign in again.
    pub reauth: bool,
}

impl Notice {
    pub(crate) fn for_rejected_move(error: &BoardError, rolled_back: bool) -> Self {
        let message = match (error.requires_reauth(), rolled_back) {
            (true, true) => "Your session expired or you lack permission. The card was moved back.",
            (true, false) => "Your session expired or you lack permission. Reload the board to resync.",
            (false, true) => "Could not save the move. The card was moved back.",
            (false, false) => "Could not save the move and the board has changed since. Reload the board to resync.",
        };
        Self { code: error.error_code(), message: message.to_owned(), reauth: error.requires_reauth() }
    }
}

/// Snapshot changes and outcomes, in the order they were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    Loaded { board_id: Uuid, version: u64 },
    CardMoved { card_id: Uuid, from: Uuid, to: Uuid, version: u64 },
    MoveConfirmed { card_id: Uuid, version: u64 },
    MoveRejected { card_id: Uuid, notice: Notice, rolled_back: bool, version: u64 },
    CardCreated { card_id: Uuid, column_id: Uuid, version: u64 },
    CardUpdated { card_id: Uuid, version: u64 },
    CardDeleted { card_id: Uuid, version: u64 },
}
