//! HTTP implementation of the resource service.
//!
//! ERROR HANDLING
//! ==============
//! Non-success statuses are classified with `ServiceError::from_status`, so a
//! 401 from any endpoint reaches the interceptor as `Unauthorized`. Network
//! failures become `Transport`, undecodable bodies become `Decode`.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use session::net::api::{LOGIN_ENDPOINT, ResourceService, SLOW_DATA_ENDPOINT, USERS_ENDPOINT, bearer};
use session::net::types::LoginRequest;
use session::{LoginResponse, ServiceError, SlowData, UserRecord};

use crate::CliError;

pub struct HttpResourceService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResourceService {
    /// # Errors
    ///
    /// Returns [`CliError::InvalidBaseUrl`] unless `base_url` is an http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, CliError> {
        let base_url = normalize_base_url(base_url)?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(self.url(path))
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, CliError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(CliError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

/// Pull a human-readable message out of an error body.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
            return message.to_owned();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() { format!("HTTP {status}") } else { trimmed.to_owned() }
}

fn transport(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::from_status(status.as_u16(), error_message(status.as_u16(), &body)));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ServiceError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl ResourceService for HttpResourceService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let body = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        let response = self
            .client
            .post(self.url(LOGIN_ENDPOINT))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserRecord>, ServiceError> {
        self.get(USERS_ENDPOINT, token).await
    }

    async fn slow_data(&self, token: &str) -> Result<SlowData, ServiceError> {
        self.get(SLOW_DATA_ENDPOINT, token).await
    }
}
