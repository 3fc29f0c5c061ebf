//! Remote backend client (native only)
//!
//! The backend holds one shared JSON document: `GET` returns the last
//! saved state (or nothing), `POST` replaces it. There is no locking,
//! versioning, retry, or cancellation; a hung call stalls only its own
//! future.

use reqwest::Client;

use crate::shared_state::SharedState;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
    #[error("Backend returned status {status}")]
    Status { status: u16 },
    #[error("Malformed payload: {message}")]
    Malformed { message: String },
}

pub struct RemoteClient {
    client: Client,
    endpoint: String,
}

impl RemoteClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch the shared document. `Ok(None)` means the backend has no
    /// data yet (empty body, empty document, or a payload missing the
    /// record collection); callers keep their local state in that case.
    pub async fn fetch(&self) -> Result<Option<SharedState>, RemoteError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| RemoteError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::RequestFailed {
                message: e.to_string(),
            })?;
        parse_shared_document(&body)
    }

    /// Replace the shared document with the given state. Any non-success
    /// HTTP status is a failure.
    pub async fn save(&self, state: &SharedState) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(state)
            .send()
            .await
            .map_err(|e| RemoteError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// A fetched document is well-formed only when it carries a `records`
/// array; `Ok(None)` for anything that merely deserializes to defaults.
/// Without this check a payload like `{"activities": []}` would read as a
/// present-but-empty record collection and wipe local state downstream.
fn parse_shared_document(body: &str) -> Result<Option<SharedState>, RemoteError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| RemoteError::Malformed {
            message: e.to_string(),
        })?;
    if !value.get("records").map_or(false, |r| r.is_array()) {
        return Ok(None);
    }
    let state: SharedState =
        serde_json::from_value(value).map_err(|e| RemoteError::Malformed {
            message: e.to_string(),
        })?;
    if state.is_empty() {
        return Ok(None);
    }
    Ok(Some(state))
}
