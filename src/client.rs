//! HTTP access to the remote interpretation service.
//!
//! The service is consumed over plain request/response semantics: no
//! streaming, no authentication, no client-side timeout (the workbench waits
//! on the transport's own resolution). Every failure mode on the way to a
//! decoded response body (request error, non-2xx status, malformed JSON)
//! collapses into [`ClientError`]; the session treats them all as one
//! transport-failure category.

use reqwest::blocking::Client;

use crate::protocol::{AstResponse, InterpretRequest, InterpretResponse};

pub use reqwest::StatusCode;

/// Transport-level failure talking to the service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned HTTP {0}")]
    Status(StatusCode),
}

/// The two requests of an execution round.
///
/// A trait seam so the session's round logic can be driven by a scripted
/// backend in tests.
pub trait ExecutionBackend: Send + Sync {
    fn interpret(&self, code: &str) -> Result<InterpretResponse, ClientError>;
    fn fetch_ast(&self, code: &str) -> Result<AstResponse, ClientError>;
}

/// Blocking HTTP client for the interpretation service.
///
/// Rounds run on worker threads, so blocking requests are fine here; the UI
/// loop never touches this type directly.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Build a client for the given base URL. Trailing slashes are trimmed
    /// so paths can be appended uniformly.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(None).build()?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ExecutionBackend for ApiClient {
    fn interpret(&self, code: &str) -> Result<InterpretResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/interpretar", self.base_url))
            .json(&InterpretRequest { codigo: code })
            .send()?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json::<InterpretResponse>()?)
    }

    fn fetch_ast(&self, code: &str) -> Result<AstResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/ast", self.base_url))
            .query(&[("codigo", code)])
            .send()?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json::<AstResponse>()?)
    }
}
