//! reqwest-backed implementation of [`BoardApi`].
//!
//! Thin HTTP wrapper: every call attaches the injected session's bearer
//! token, checks the status, then decodes the body. Status classification
//! and body parsing are plain functions for testability.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::BoardApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;
use crate::types::{Board, Card, CardCreate, CardUpdate, Comment, CommentCreate};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBoardApi {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl HttpBoardApi {
    /// Build a client bound to `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        Ok(Self { http: build_http_client(config)?, base_url: config.base_url.clone(), session })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.session.bearer())
    }
}

pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeouts.request_secs))
        .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
        .build()
        .map_err(|e| ApiError::HttpClientBuild(e.to_string()))
}

/// Send a request and return the body text of a 2xx response.
pub(crate) async fn send(request: reqwest::RequestBuilder) -> Result<String, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let url = response.url().path().to_owned();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    debug!(status, %url, "backend response");
    check_status(status, text)
}

async fn fetch<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let text = send(request).await?;
    parse_body(&text)
}

async fn execute(request: reqwest::RequestBuilder) -> Result<(), ApiError> {
    send(request).await.map(|_| ())
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn check_status(status: u16, body: String) -> Result<String, ApiError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(ApiError::from_status(status, body))
    }
}

pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

// =============================================================================
// BOARD API
// =============================================================================

#[async_trait::async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        fetch(self.request(reqwest::Method::GET, "/boards")).await
    }

    async fn get_board(&self, board_id: Uuid) -> Result<Board, ApiError> {
        fetch(self.request(reqwest::Method::GET, &format!("/boards/{board_id}"))).await
    }

    async fn create_card(&self, request: &CardCreate) -> Result<Card, ApiError> {
        fetch(self.request(reqwest::Method::POST, "/cards").json(request)).await
    }

    async fn update_card(&self, card_id: Uuid, update: &CardUpdate) -> Result<Card, ApiError> {
        fetch(self.request(reqwest::Method::PUT, &format!("/cards/{card_id}")).json(update)).await
    }

    async fn delete_card(&self, card_id: Uuid) -> Result<(), ApiError> {
        execute(self.request(reqwest::Method::DELETE, &format!("/cards/{card_id}"))).await
    }

    async fn complete_card(&self, card_id: Uuid) -> Result<(), ApiError> {
        execute(self.request(reqwest::Method::PUT, &format!("/cards/{card_id}/complete"))).await
    }

    async fn list_comments(&self, board_id: Uuid, card_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        let path = comments_path(board_id, card_id);
        fetch(self.request(reqwest::Method::GET, &path)).await
    }

    async fn add_comment(&self, board_id: Uuid, card_id: Uuid, request: &CommentCreate) -> Result<Comment, ApiError> {
        let path = comments_path(board_id, card_id);
        fetch(self.request(reqwest::Method::POST, &path).json(request)).await
    }
}

fn comments_path(board_id: Uuid, card_id: Uuid) -> String {
    format!("/api/projects/{board_id}/tasks/{card_id}/comments")
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
