//! Board State Coordinator — one board snapshot, optimistic card moves.
//!
//! DESIGN
//! ======
//! `move_card` applies the move to the snapshot synchronously (under the
//! write lock), emits `CardMoved`, then spawns the `PUT /cards/{id}` call and
//! returns. The spawned continuation confirms or rolls back:
//!
//! - success: the backend's card is reconciled into the snapshot if nothing
//!   else changed the board meanwhile;
//! - failure: the pre-move board is restored only if the snapshot still
//!   carries the version this move produced. Otherwise the rollback is
//!   discarded because a later mutation already superseded it. Either way
//!   exactly one `MoveRejected` event with a notice is emitted.
//!
//! Continuations hold a `Weak` reference to the state. After `close()` or
//! drop they find nothing to update and end silently; in-flight requests are
//! not cancelled.
//!
//! Create, update, delete and complete are not optimistic: the snapshot
//! changes only after the backend accepts the write.

use std::sync::{Arc, Weak};

use tokio::sync::{RwLock, broadcast, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::snapshot::{self, MoveSkip};
use super::{BoardEvent, BoardSnapshot, Notice};
use crate::api::BoardApi;
use crate::config::{ClientConfig, DEFAULT_EVENT_CAPACITY};
use crate::error::{ApiError, BoardError};
use crate::types::{Board, Card, CardCreate, CardUpdate, Comment, CommentCreate};

// =============================================================================
// STATE
// =============================================================================

#[derive(Default)]
struct CoordinatorState {
    snapshot: Option<BoardSnapshot>,
    /// Last version handed out. Survives snapshot replacement so versions
    /// never repeat within one coordinator.
    version: u64,
    closed: bool,
}

impl CoordinatorState {
    fn current_version(&self) -> Option<u64> {
        self.snapshot.as_ref().map(|s| s.version)
    }

    /// Replace the snapshot wholesale under a fresh version.
    fn install(&mut self, board: Board) -> u64 {
        self.version += 1;
        self.snapshot = Some(BoardSnapshot { board, version: self.version });
        self.version
    }

    /// Apply `f` to the loaded board; stamp a fresh version if it reports a change.
    fn mutate(&mut self, f: impl FnOnce(&mut Board) -> bool) -> Option<u64> {
        let snapshot = self.snapshot.as_mut()?;
        if !f(&mut snapshot.board) {
            return None;
        }
        self.version += 1;
        snapshot.version = self.version;
        Some(self.version)
    }
}

// =============================================================================
// PENDING MOVE
// =============================================================================

/// Handle to a move whose backend confirmation is still in flight.
///
/// Dropping it does not cancel the move; the rollback path runs regardless.
#[derive(Debug)]
pub struct PendingMove {
    card_id: Uuid,
    from: Uuid,
    to: Uuid,
    version: u64,
    outcome: oneshot::Receiver<Result<Card, BoardError>>,
}

impl PendingMove {
    #[must_use]
    pub fn card_id(&self) -> Uuid {
        self.card_id
    }

    #[must_use]
    pub fn from_column(&self) -> Uuid {
        self.from
    }

    #[must_use]
    pub fn to_column(&self) -> Uuid {
        self.to
    }

    /// Snapshot version produced by the optimistic mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Wait for the backend to confirm or reject the move.
    ///
    /// # Errors
    ///
    /// `MoveRejected`/`AuthExpired` when the backend refused the move, or
    /// `Closed` when the board view was torn down first.
    pub async fn settle(self) -> Result<Card, BoardError> {
        self.outcome.await.unwrap_or(Err(BoardError::Closed))
    }
}

// =============================================================================
// COORDINATOR
// =============================================================================

pub struct BoardCoordinator {
    api: Arc<dyn BoardApi>,
    state: Arc<RwLock<CoordinatorState>>,
    events: broadcast::Sender<BoardEvent>,
}

impl BoardCoordinator {
    #[must_use]
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        Self::with_event_capacity(api, DEFAULT_EVENT_CAPACITY)
    }

    #[must_use]
    pub fn from_config(api: Arc<dyn BoardApi>, config: &ClientConfig) -> Self {
        Self::with_event_capacity(api, config.event_capacity)
    }

    fn with_event_capacity(api: Arc<dyn BoardApi>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { api, state: Arc::new(RwLock::new(CoordinatorState::default())), events }
    }

    /// Receive every subsequent [`BoardEvent`].
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Option<BoardSnapshot> {
        self.state.read().await.snapshot.clone()
    }

    pub async fn board(&self) -> Option<Board> {
        self.state.read().await.snapshot.as_ref().map(|s| s.board.clone())
    }

    /// Latest version handed out (0 before the first load).
    pub async fn version(&self) -> u64 {
        self.state.read().await.version
    }

    /// Tear down the view. Pending continuations become no-ops.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        state.closed = true;
        state.snapshot = None;
        debug!("board view closed");
    }

    // -------------------------------------------------------------------------
    // LOAD
    // -------------------------------------------------------------------------

    /// Fetch a board and replace the snapshot with it, columns sorted by `order`.
    ///
    /// # Errors
    ///
    /// `Fetch` or `AuthExpired` if the backend call fails; the previous
    /// snapshot is left untouched.
    pub async fn load_board(&self, board_id: Uuid) -> Result<Board, BoardError> {
        self.ensure_open().await?;
        let mut board = self.api.get_board(board_id).await.map_err(|error| {
            warn!(%board_id, %error, "board load failed");
            BoardError::fetch(error)
        })?;

        board.sort_columns();
        for violation in board.check_invariants() {
            warn!(%board_id, %violation, "board invariant violated");
        }

        let mut state = self.state.write().await;
        if state.closed {
            return Err(BoardError::Closed);
        }
        let version = state.install(board.clone());
        info!(%board_id, version, columns = board.columns.len(), cards = board.card_count(), "board loaded");
        emit(&self.events, BoardEvent::Loaded { board_id, version });
        Ok(board)
    }

    /// Every board visible to the session, columns sorted by `order`.
    ///
    /// # Errors
    ///
    /// `Fetch` or `AuthExpired` if the backend call fails.
    pub async fn list_boards(&self) -> Result<Vec<Board>, BoardError> {
        let mut boards = self.api.list_boards().await.map_err(BoardError::fetch)?;
        for board in &mut boards {
            board.sort_columns();
        }
        Ok(boards)
    }

    // -------------------------------------------------------------------------
    // MOVE
    // -------------------------------------------------------------------------

    /// Move a card to another column, optimistically.
    ///
    /// Returns `None` without touching the network when there is nothing to
    /// do: no board loaded, unknown card, unknown target, or the card is
    /// already in the target column.
    pub async fn move_card(&self, card_id: Uuid, target_column_id: Uuid) -> Option<PendingMove> {
        let mut state = self.state.write().await;
        if state.closed {
            return None;
        }
        let Some(current) = state.snapshot.as_ref() else {
            debug!(%card_id, "move ignored: no board loaded");
            return None;
        };

        let plan = match snapshot::plan_move(&current.board, card_id, target_column_id) {
            Ok(plan) => plan,
            Err(MoveSkip::UnknownTarget) => {
                warn!(%card_id, %target_column_id, "move ignored: {}", MoveSkip::UnknownTarget);
                return None;
            }
            Err(skip) => {
                debug!(%card_id, %target_column_id, "move ignored: {skip}");
                return None;
            }
        };
        let previous = current.board.clone();
        let version = state.mutate(|board| {
            snapshot::apply_move(board, &plan);
            true
        })?;

        debug!(%card_id, from = %plan.from, to = %plan.to, version, "card moved optimistically");
        emit(&self.events, BoardEvent::CardMoved { card_id, from: plan.from, to: plan.to, version });
        drop(state);

        let update = CardUpdate::relocate(&plan.card, plan.to);
        let (tx, rx) = oneshot::channel();
        let api = Arc::clone(&self.api);
        let weak = Arc::downgrade(&self.state);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.update_card(card_id, &update).await;
            if let Some(outcome) = settle_move(&weak, &events, card_id, version, previous, result).await {
                let _ = tx.send(outcome);
            }
        });

        Some(PendingMove { card_id, from: plan.from, to: plan.to, version, outcome: rx })
    }

    // -------------------------------------------------------------------------
    // CARD WRITES
    // -------------------------------------------------------------------------

    /// Create a card and, if its column is on the loaded board, append it.
    ///
    /// # Errors
    ///
    /// `Invalid` for a blank title or completion above 100 (no request sent),
    /// `Mutation`/`AuthExpired` if the backend refuses.
    pub async fn create_card(&self, request: &CardCreate) -> Result<Card, BoardError> {
        self.ensure_open().await?;
        validate_title(&request.title)?;
        validate_completion(request.completion_percentage)?;

        let card = self
            .api
            .create_card(request)
            .await
            .map_err(|error| BoardError::mutation("create card", error))?;

        let mut state = self.state.write().await;
        if let Some(version) = state.mutate(|board| snapshot::upsert_card(board, card.clone())) {
            emit(&self.events, BoardEvent::CardCreated { card_id: card.id, column_id: card.column_id, version });
        }
        info!(card_id = %card.id, column_id = %card.column_id, "card created");
        Ok(card)
    }

    /// Edit card fields. The snapshot takes the backend's version of the card.
    ///
    /// # Errors
    ///
    /// `Invalid` for an empty update, blank title or completion above 100,
    /// `Mutation`/`AuthExpired` if the backend refuses.
    pub async fn update_card(&self, card_id: Uuid, update: &CardUpdate) -> Result<Card, BoardError> {
        self.ensure_open().await?;
        if update.is_empty() {
            return Err(BoardError::Invalid("nothing to update".into()));
        }
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(completion) = update.completion_percentage {
            validate_completion(completion)?;
        }

        let card = self
            .api
            .update_card(card_id, update)
            .await
            .map_err(|error| BoardError::mutation("update card", error))?;

        let mut state = self.state.write().await;
        let changed = state.mutate(|board| {
            if board.card(card_id) == Some(&card) {
                return false;
            }
            snapshot::upsert_card(board, card.clone()) || snapshot::remove_card(board, card_id).is_some()
        });
        if let Some(version) = changed {
            emit(&self.events, BoardEvent::CardUpdated { card_id, version });
        }
        Ok(card)
    }

    /// Delete a card.
    ///
    /// # Errors
    ///
    /// `Mutation`/`AuthExpired` if the backend refuses; the card stays.
    pub async fn delete_card(&self, card_id: Uuid) -> Result<(), BoardError> {
        self.ensure_open().await?;
        self.api
            .delete_card(card_id)
            .await
            .map_err(|error| BoardError::mutation("delete card", error))?;

        let mut state = self.state.write().await;
        if let Some(version) = state.mutate(|board| snapshot::remove_card(board, card_id).is_some()) {
            emit(&self.events, BoardEvent::CardDeleted { card_id, version });
        }
        info!(%card_id, "card deleted");
        Ok(())
    }

    /// Mark a card complete (100%).
    ///
    /// # Errors
    ///
    /// `Mutation`/`AuthExpired` if the backend refuses.
    pub async fn complete_card(&self, card_id: Uuid) -> Result<(), BoardError> {
        self.ensure_open().await?;
        self.api
            .complete_card(card_id)
            .await
            .map_err(|error| BoardError::mutation("complete card", error))?;

        let mut state = self.state.write().await;
        let changed = state.mutate(|board| {
            let Some((col_idx, card_idx)) = board.position_of(card_id) else {
                return false;
            };
            let card = &mut board.columns[col_idx].cards[card_idx];
            if card.completion_percentage == 100 {
                return false;
            }
            card.completion_percentage = 100;
            true
        });
        if let Some(version) = changed {
            emit(&self.events, BoardEvent::CardUpdated { card_id, version });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // COMMENTS
    // -------------------------------------------------------------------------

    /// Comments on a card of the loaded board.
    ///
    /// # Errors
    ///
    /// `NotLoaded`, `CardNotFound`, or `Fetch`/`AuthExpired`.
    pub async fn list_comments(&self, card_id: Uuid) -> Result<Vec<Comment>, BoardError> {
        let board_id = self.board_id_for(card_id).await?;
        self.api
            .list_comments(board_id, card_id)
            .await
            .map_err(BoardError::fetch)
    }

    /// Add a comment to a card of the loaded board.
    ///
    /// # Errors
    ///
    /// `Invalid` for blank text, `NotLoaded`, `CardNotFound`, or
    /// `Mutation`/`AuthExpired`.
    pub async fn add_comment(&self, card_id: Uuid, text: &str, author: Option<Uuid>) -> Result<Comment, BoardError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BoardError::Invalid("comment text is blank".into()));
        }
        let board_id = self.board_id_for(card_id).await?;
        let request = CommentCreate { text: text.to_owned(), card_id, user_id: author };
        self.api
            .add_comment(board_id, card_id, &request)
            .await
            .map_err(|error| BoardError::mutation("add comment", error))
    }

    // -------------------------------------------------------------------------
    // HELPERS
    // -------------------------------------------------------------------------

    async fn ensure_open(&self) -> Result<(), BoardError> {
        if self.state.read().await.closed { Err(BoardError::Closed) } else { Ok(()) }
    }

    async fn board_id_for(&self, card_id: Uuid) -> Result<Uuid, BoardError> {
        let state = self.state.read().await;
        if state.closed {
            return Err(BoardError::Closed);
        }
        let snapshot = state.snapshot.as_ref().ok_or(BoardError::NotLoaded)?;
        if snapshot.board.card(card_id).is_none() {
            return Err(BoardError::CardNotFound(card_id));
        }
        Ok(snapshot.board.id)
    }
}

// =============================================================================
// MOVE CONTINUATION
// =============================================================================

/// Reconcile a finished move request with the snapshot. `None` when the view
/// is gone and nothing should observe the outcome.
async fn settle_move(
    state: &Weak<RwLock<CoordinatorState>>,
    events: &broadcast::Sender<BoardEvent>,
    card_id: Uuid,
    version: u64,
    previous: Board,
    result: Result<Card, ApiError>,
) -> Option<Result<Card, BoardError>> {
    let state = state.upgrade()?;
    let mut state = state.write().await;
    if state.closed {
        return None;
    }

    match result {
        Ok(card) => {
            if state.current_version() == Some(version) {
                state.mutate(|board| board.card(card_id) != Some(&card) && snapshot::upsert_card(board, card.clone()));
            }
            let current = state.version;
            info!(%card_id, version = current, "move confirmed");
            emit(events, BoardEvent::MoveConfirmed { card_id, version: current });
            Some(Ok(card))
        }
        Err(error) => {
            let rolled_back = state.current_version() == Some(version);
            if rolled_back {
                state.install(previous);
            }
            let error = BoardError::move_rejected(card_id, error);
            let notice = Notice::for_rejected_move(&error, rolled_back);
            let current = state.version;
            if rolled_back {
                warn!(%card_id, version = current, %error, "move rejected; rolled back");
            } else {
                warn!(%card_id, version = current, %error, "move rejected; rollback discarded, board changed since");
            }
            emit(events, BoardEvent::MoveRejected { card_id, notice, rolled_back, version: current });
            Some(Err(error))
        }
    }
}

fn emit(events: &broadcast::Sender<BoardEvent>, event: BoardEvent) {
    // No subscribers is fine.
    let _ = events.send(event);
}

fn validate_title(title: &str) -> Result<(), BoardError> {
    if title.trim().is_empty() {
        return Err(BoardError::Invalid("card title is blank".into()));
    }
    Ok(())
}

fn validate_completion(value: u8) -> Result<(), BoardError> {
    if value > 100 {
        return Err(BoardError::Invalid(format!("completion {value}% exceeds 100")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
