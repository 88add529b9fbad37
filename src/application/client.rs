//! Authorized request client: every admin call goes through here so a
//! refused credential ends the session in exactly one place.

use std::sync::Arc;

use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

use crate::infra::transport::{HttpError, RequestBody, Transport};

use super::session::SessionStore;

#[derive(Clone, Debug)]
pub struct AuthorizedClient {
    session: Arc<SessionStore>,
}

impl AuthorizedClient {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn transport(&self) -> &Transport {
        self.session.transport()
    }

    /// Send one request with the current token attached, if any.
    ///
    /// A 401 or 403 logs the session out before the error is returned; every
    /// other failure is handed back untouched.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<serde_json::Value, HttpError> {
        let token = self.session.token();
        let result = self
            .transport()
            .send(method, path, token.as_deref(), body)
            .await;
        if let Err(err) = &result
            && err.is_auth_failure()
        {
            self.session.force_logout(&err.message);
        }
        result
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        let value = self.request(Method::GET, path, RequestBody::Empty).await?;
        decode(value)
    }

    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)
            .map_err(|err| HttpError::new(None, format!("failed to encode request: {err}")))?;
        let value = self.request(method, path, RequestBody::Json(body)).await?;
        decode(value)
    }

    /// For endpoints whose success body carries nothing of interest.
    pub async fn request_unit(&self, method: Method, path: &str) -> Result<(), HttpError> {
        self.request(method, path, RequestBody::Empty).await.map(drop)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, HttpError> {
    serde_json::from_value(value)
        .map_err(|err| HttpError::new(None, format!("unexpected response shape: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use httpmock::MockServer;
    use reqwest::{StatusCode, Url};

    use crate::{
        domain::session::SessionStatus,
        infra::credentials::{MemoryCredentialStore, PersistedCredential},
    };

    async fn signed_in(server: &MockServer) -> (AuthorizedClient, Arc<MemoryCredentialStore>) {
        server.mock(|when, then| {
            when.method("GET").path("/api/auth/me");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"_id":"u1","username":"admin"}"#);
        });
        let credentials = Arc::new(MemoryCredentialStore::with_credential(PersistedCredential {
            token: "tok".into(),
            username: "admin".into(),
        }));
        let base = Url::parse(&server.base_url()).expect("base url");
        let transport = Transport::new(&base, Duration::from_secs(5)).expect("transport");
        let session = Arc::new(SessionStore::new(transport, credentials.clone()));
        assert_eq!(session.initialize().await, SessionStatus::Authenticated);
        (AuthorizedClient::new(session), credentials)
    }

    #[tokio::test]
    async fn attaches_session_token() {
        let server = MockServer::start();
        let (client, _) = signed_in(&server).await;
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/api/categories")
                .header("authorization", "Bearer tok");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        });

        let rows: Vec<serde_json::Value> = client.get("/api/categories").await.expect("ok");
        mock.assert();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_response_forces_logout() {
        let server = MockServer::start();
        let (client, credentials) = signed_in(&server).await;
        server.mock(|when, then| {
            when.method("GET").path("/api/blogs");
            then.status(401)
                .header("content-type", "application/json")
                .body(r#"{"message":"Token expired"}"#);
        });

        let err = client
            .get::<serde_json::Value>("/api/blogs")
            .await
            .expect_err("refused");
        assert_eq!(err.status, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.message, "Token expired");
        assert_eq!(client.session().status(), SessionStatus::Unauthenticated);
        assert_eq!(credentials.current(), None);
    }

    #[tokio::test]
    async fn other_failures_keep_the_session() {
        let server = MockServer::start();
        let (client, credentials) = signed_in(&server).await;
        server.mock(|when, then| {
            when.method("DELETE").path("/api/comments/c1");
            then.status(500);
        });

        let err = client
            .request_unit(Method::DELETE, "/api/comments/c1")
            .await
            .expect_err("server error");
        assert_eq!(err.message, "HTTP 500");
        assert_eq!(client.session().status(), SessionStatus::Authenticated);
        assert!(credentials.current().is_some());
    }
}
