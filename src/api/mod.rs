//! Backend collaborator — the REST surface the board coordinator depends on.
//!
//! DESIGN
//! ======
//! `BoardApi` is the seam: the coordinator only ever sees `Arc<dyn BoardApi>`,
//! so tests drive it with scripted mocks and production uses
//! [`HttpBoardApi`]. Authentication lives in [`auth`] because login and
//! registration happen before a [`crate::Session`] exists.

pub mod auth;
pub mod http;

use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{Board, Card, CardCreate, CardUpdate, Comment, CommentCreate};

pub use http::HttpBoardApi;

/// Provider-neutral async trait for the task backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait BoardApi: Send + Sync {
    /// `GET /boards`
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError>;

    /// `GET /boards/{id}` — the board with every column and card.
    async fn get_board(&self, board_id: Uuid) -> Result<Board, ApiError>;

    /// `POST /cards`
    async fn create_card(&self, request: &CardCreate) -> Result<Card, ApiError>;

    /// `PUT /cards/{id}` — also the confirmation call for card moves.
    async fn update_card(&self, card_id: Uuid, update: &CardUpdate) -> Result<Card, ApiError>;

    /// `DELETE /cards/{id}`
    async fn delete_card(&self, card_id: Uuid) -> Result<(), ApiError>;

    /// `PUT /cards/{id}/complete`
    async fn complete_card(&self, card_id: Uuid) -> Result<(), ApiError>;

    async fn list_comments(&self, board_id: Uuid, card_id: Uuid) -> Result<Vec<Comment>, ApiError>;

    async fn add_comment(&self, board_id: Uuid, card_id: Uuid, request: &CommentCreate)
    -> Result<Comment, ApiError>;
}
