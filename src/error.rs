//! Error taxonomy for the REST collaborator and the board coordinator.
//!
//! ERROR HANDLING
//! ==============
//! `ApiError` describes what went wrong on the wire. `BoardError` describes
//! what it means for the board view: a failed load (`Fetch`), a rejected
//! optimistic move (`MoveRejected`, always paired with a rollback attempt),
//! or an expired session (`AuthExpired`, any operation answered 401/403).
//! Nothing here is fatal; every failure leaves a consistent snapshot.

use uuid::Uuid;

/// Grepable error code and retryable flag for user-facing notices.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// API ERROR
// =============================================================================

/// Errors produced by backend requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, I/O).
    #[error("request failed: {0}")]
    Network(String),

    /// The backend answered 401 or 403.
    #[error("not authorized: status {status}")]
    Unauthorized { status: u16, body: String },

    /// The backend answered with any other non-success status.
    #[error("unexpected response status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success status code.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        if matches!(status, 401 | 403) {
            Self::Unauthorized { status, body }
        } else {
            Self::Status { status, body }
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Network(_) => "E_NETWORK",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// BOARD ERROR
// =============================================================================

/// Errors surfaced by [`crate::board::BoardCoordinator`] operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Loading a board (or board list) failed. No local state was changed.
    #[error("failed to load board: {0}")]
    Fetch(#[source] ApiError),

    /// The backend refused a card move that was already applied locally.
    #[error("move of card {card_id} was not saved: {source}")]
    MoveRejected {
        card_id: Uuid,
        #[source]
        source: ApiError,
    },

    /// The backend answered 401/403; the session should be invalidated.
    #[error("session expired or access denied (status {status})")]
    AuthExpired { status: u16 },

    /// A non-optimistic write (create, update, delete, comment) failed.
    #[error("{action} failed: {source}")]
    Mutation {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("no board is loaded")]
    NotLoaded,

    #[error("card not found: {0}")]
    CardNotFound(Uuid),

    #[error("column not found: {0}")]
    ColumnNotFound(Uuid),

    /// Input rejected before any request was sent.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// The board view was closed before the operation settled.
    #[error("board view closed")]
    Closed,
}

impl BoardError {
    pub(crate) fn fetch(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized { status, .. } => Self::AuthExpired { status },
            other => Self::Fetch(other),
        }
    }

    pub(crate) fn move_rejected(card_id: Uuid, error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized { status, .. } => Self::AuthExpired { status },
            other => Self::MoveRejected { card_id, source: other },
        }
    }

    pub(crate) fn mutation(action: &'static str, error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized { status, .. } => Self::AuthExpired { status },
            other => Self::Mutation { action, source: other },
        }
    }

    /// Whether the surrounding application should drop the session.
    #[must_use]
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }
}

impl ErrorCode for BoardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "E_FETCH",
            Self::MoveRejected { .. } => "E_MOVE_REJECTED",
            Self::AuthExpired { .. } => "E_AUTH_EXPIRED",
            Self::Mutation { .. } => "E_MUTATION",
            Self::NotLoaded => "E_NOT_LOADED",
            Self::CardNotFound(_) => "E_CARD_NOT_FOUND",
            Self::ColumnNotFound(_) => "E_COLUMN_NOT_FOUND",
            Self::Invalid(_) => "E_INVALID",
            Self::Closed => "E_CLOSED",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Fetch(source) | Self::MoveRejected { source, .. } | Self::Mutation { source, .. } => {
                source.retryable()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
