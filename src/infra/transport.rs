//! Thin HTTP transport for the blog REST API.
//!
//! Resolves API paths against the configured base URL, attaches an optional
//! bearer token and folds every non-2xx or transport failure into
//! [`HttpError`]. Session semantics live one level up in the authorized client.

use std::time::Duration;

use blog_admin_types::ApiMessage;
use metrics::counter;
use reqwest::{
    Client, Method, StatusCode, Url,
    header::{AUTHORIZATION, HeaderValue},
    multipart::Form,
};
use thiserror::Error;
use tracing::{debug, warn};

use super::error::InfraError;

/// Failed HTTP exchange: a non-2xx status or a transport failure (no status).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpError {
    pub status: Option<StatusCode>,
    pub message: String,
}

impl HttpError {
    pub fn new(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Build the error for a non-2xx response, preferring the body's `message`.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ApiMessage>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Self::new(Some(status), message)
    }

    pub fn transport(error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else {
            error.to_string()
        };
        Self::new(error.status(), message)
    }

    /// True when the body carried no usable `message`.
    pub fn is_generic(&self) -> bool {
        self.status
            .is_some_and(|status| self.message == format!("HTTP {}", status.as_u16()))
    }

    /// 401 and 403 end the session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}

/// Outgoing request payload.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

#[derive(Clone, Debug)]
pub struct Transport {
    client: Client,
    base: Url,
}

impl Transport {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, InfraError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|err| InfraError::configuration(format!("http client: {err}")))?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("blog-admin/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve an API path such as `/api/blogs` below the base URL.
    pub fn url(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| HttpError::new(None, format!("invalid URL `{path}`: {err}")))
    }

    pub fn auth_header(token: &str) -> Result<HeaderValue, HttpError> {
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|err| HttpError::new(None, format!("invalid credential: {err}")))
    }

    /// Perform one exchange and decode the JSON body (`null` when empty).
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: RequestBody,
    ) -> Result<serde_json::Value, HttpError> {
        let url = self.url(path)?;
        debug!(%method, %url, authenticated = bearer.is_some(), "sending request");
        counter!("blog_admin_http_requests_total", "method" => method.as_str().to_owned())
            .increment(1);

        let mut req = self.client.request(method.clone(), url);
        if let Some(token) = bearer {
            req = req.header(AUTHORIZATION, Self::auth_header(token)?);
        }
        req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.json(&value),
            RequestBody::Multipart(form) => req.multipart(form),
        };

        let result = match req.send().await {
            Ok(resp) => Self::handle(resp).await,
            Err(err) => Err(HttpError::transport(&err)),
        };
        if let Err(err) = &result {
            counter!("blog_admin_http_failures_total", "method" => method.as_str().to_owned())
                .increment(1);
            warn!(%method, path, status = ?err.status, error = %err, "request failed");
        }
        result
    }

    async fn handle(resp: reqwest::Response) -> Result<serde_json::Value, HttpError> {
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| HttpError::transport(&err))?;
        if !status.is_success() {
            return Err(HttpError::from_response(status, &bytes));
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|err| {
            HttpError::new(Some(status), format!("failed to parse response body: {err}"))
        })
    }
}
