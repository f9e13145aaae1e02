//! Browser `fetch` collaborators for the computation service and scenario store.
//!
//! Response decoding is kept in plain functions over `(status, body)` so it
//! can be exercised without a browser.
use serde::Deserialize;
use sparks_engine::{
    ComputationResponse, EndpointConfig, ScaleInputSet, ScenarioError, StoredScenario,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl TransportError {
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            Self::Request(_) | Self::Decode(_) => 0,
        }
    }
}

impl From<TransportError> for ScenarioError {
    fn from(err: TransportError) -> Self {
        let status = err.status();
        let message = match err {
            TransportError::Status { body, .. } => error_message(&body),
            other => other.to_string(),
        };
        Self::ComputationFailed { status, message }
    }
}

const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Human-readable failure text: the `error` field of a JSON body, else the body.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// # Errors
///
/// Non-2xx status or an undecodable body.
pub fn decode_compute(status: u16, body: &str) -> Result<ComputationResponse, TransportError> {
    if !is_success(status) {
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        });
    }
    ComputationResponse::from_json(body).map_err(|err| TransportError::Decode(err.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SaveBody {
    Flag(bool),
    Status { status: String },
}

/// Save outcome: 2xx with `true`, `{"status": "ok"}` or an empty body is success.
///
/// # Errors
///
/// Never fails on status; kept fallible for transport symmetry.
pub fn decode_save(status: u16, body: &str) -> Result<bool, TransportError> {
    if !is_success(status) {
        return Ok(false);
    }
    if body.trim().is_empty() {
        return Ok(true);
    }
    Ok(match serde_json::from_str::<SaveBody>(body) {
        Ok(SaveBody::Flag(flag)) => flag,
        Ok(SaveBody::Status { status }) => status.eq_ignore_ascii_case("ok"),
        Err(_) => false,
    })
}

/// Stored payload; 404 means no such scenario.
///
/// # Errors
///
/// Any other non-2xx status, or a body that is not a JSON object.
pub fn decode_load(status: u16, body: &str) -> Result<Option<StoredScenario>, TransportError> {
    if status == 404 {
        return Ok(None);
    }
    if !is_success(status) {
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|err| TransportError::Decode(err.to_string()))
}

/// # Errors
///
/// Non-2xx status, or a body that is not a JSON array of strings.
pub fn decode_list(status: u16, body: &str) -> Result<Vec<String>, TransportError> {
    if !is_success(status) {
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|err| TransportError::Decode(err.to_string()))
}

/// # Errors
///
/// Serialization of a scale input set does not fail in practice.
pub fn encode_inputs(inputs: &ScaleInputSet) -> Result<String, TransportError> {
    serde_json::to_string(inputs).map_err(|err| TransportError::Decode(err.to_string()))
}

/// POSTs scale factors to the computation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpComputation {
    endpoint: String,
}

impl HttpComputation {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Scenario store reached through the configured endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpScenarioStore {
    endpoints: EndpointConfig,
}

impl HttpScenarioStore {
    #[must_use]
    pub const fn new(endpoints: EndpointConfig) -> Self {
        Self { endpoints }
    }

    #[must_use]
    pub const fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{
        HttpComputation, HttpScenarioStore, TransportError, decode_compute, decode_list,
        decode_load, decode_save, encode_inputs,
    };
    use crate::dom::{FetchedText, fetch_text, js_error_message};
    use async_trait::async_trait;
    use sparks_engine::{
        ComputationResponse, ComputationService, ScaleInputSet, ScenarioStore, StoredScenario,
    };

    fn encode_name(name: &str) -> String {
        String::from(js_sys::encode_uri_component(name))
    }

    async fn send(method: &str, url: &str, body: Option<&str>) -> Result<FetchedText, TransportError> {
        log::debug!("{method} {url}");
        fetch_text(method, url, body)
            .await
            .map_err(|err| TransportError::Request(js_error_message(&err)))
    }

    #[async_trait(?Send)]
    impl ComputationService for HttpComputation {
        type Error = TransportError;

        async fn compute(
            &self,
            inputs: &ScaleInputSet,
        ) -> Result<ComputationResponse, Self::Error> {
            let body = encode_inputs(inputs)?;
            let reply = send("POST", self.endpoint(), Some(&body)).await?;
            decode_compute(reply.status, &reply.body)
        }
    }

    #[async_trait(?Send)]
    impl ScenarioStore for HttpScenarioStore {
        type Error = TransportError;

        async fn save(&self, name: &str, inputs: &ScaleInputSet) -> Result<bool, Self::Error> {
            let url = self.endpoints().save_path(&encode_name(name));
            let body = encode_inputs(inputs)?;
            let reply = send("POST", &url, Some(&body)).await?;
            decode_save(reply.status, &reply.body)
        }

        async fn load(&self, name: &str) -> Result<Option<StoredScenario>, Self::Error> {
            let url = self.endpoints().load_path(&encode_name(name));
            let reply = send("GET", &url, None).await?;
            decode_load(reply.status, &reply.body)
        }

        async fn list(&self) -> Result<Vec<String>, Self::Error> {
            let reply = send("GET", &self.endpoints().list, None).await?;
            decode_list(reply.status, &reply.body)
        }
    }
}
