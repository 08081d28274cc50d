//! Login and registration. Both run without a session; login produces one.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::http::{build_http_client, parse_body, send};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    email: Option<String>,
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<String>,
}

impl Registration {
    /// Registration with the default `USER` role.
    #[must_use]
    pub fn new(first_name: &str, last_name: &str, email: &str, password: &str) -> Self {
        Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            roles: vec!["USER".to_owned()],
        }
    }
}

/// Account returned by registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Authenticate with `POST /users/login` and return the issued session.
///
/// # Errors
///
/// Returns `Unauthorized` for rejected credentials, or a network/decode error.
pub async fn login(config: &ClientConfig, email: &str, password: &str) -> Result<Session, ApiError> {
    let http = build_http_client(config)?;
    let request = http
        .post(format!("{}/users/login", config.base_url))
        .json(&LoginRequest { email, password });

    let body: LoginResponse = parse_body(&send(request).await?)?;
    let session_email = body.email.unwrap_or_else(|| email.to_owned());
    info!(email = %session_email, "logged in");
    Ok(Session::new(body.token).with_email(session_email))
}

/// Create an account with `POST /users/register`.
///
/// # Errors
///
/// Returns an error if the backend rejects the registration.
pub async fn register(config: &ClientConfig, registration: &Registration) -> Result<User, ApiError> {
    let http = build_http_client(config)?;
    let request = http
        .post(format!("{}/users/register", config.base_url))
        .json(registration);
    parse_body(&send(request).await?)
}
