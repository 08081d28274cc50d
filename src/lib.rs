//! # taskflow
//!
//! Client core for the TaskFlow Kanban backend: typed wire models, a REST
//! collaborator behind the [`api::BoardApi`] trait, and the
//! [`board::BoardCoordinator`] that owns a board snapshot and applies card
//! moves optimistically with versioned rollback.
//!
//! The `cli/` crate is the outer surface built on this library.

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use board::{BoardCoordinator, BoardEvent, BoardSnapshot, Notice, PendingMove};
pub use config::ClientConfig;
pub use error::{ApiError, BoardError, ErrorCode};
pub use session::Session;
