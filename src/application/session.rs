//! Session store: the single owner of the process-wide authentication state.
//!
//! The current [`Session`] lives in a `watch` channel so the route guard and
//! any other observer can follow transitions without touching the store's
//! internals. Persisted credentials go through a [`CredentialStore`].

use std::sync::Arc;

use blog_admin_types::{LoginRequest, LoginResponse, User};
use metrics::counter;
use reqwest::Method;
use tokio::sync::{OnceCell, watch};
use tracing::{info, warn};

use crate::{
    domain::{
        error::ValidationError,
        session::{Session, SessionStatus},
    },
    infra::{
        credentials::{CredentialStore, PersistedCredential},
        transport::{HttpError, RequestBody, Transport},
    },
};

use super::error::AuthError;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const IDENTITY_PATH: &str = "/api/auth/me";

#[derive(Debug)]
pub struct SessionStore {
    transport: Transport,
    credentials: Arc<dyn CredentialStore>,
    state: watch::Sender<Session>,
    initialized: OnceCell<()>,
}

impl SessionStore {
    pub fn new(transport: Transport, credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::pending());
        Self {
            transport,
            credentials,
            state,
            initialized: OnceCell::new(),
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Validate any persisted credential against the identity endpoint.
    ///
    /// Runs its I/O at most once per store; later calls (and concurrent ones)
    /// wait for that first run and return the current status, which is never
    /// `Pending` afterwards.
    pub async fn initialize(&self) -> SessionStatus {
        self.initialized
            .get_or_init(|| self.restore_persisted())
            .await;
        self.status()
    }

    async fn restore_persisted(&self) {
        let persisted = match self.credentials.load() {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(error = %err, "persisted credential unreadable");
                None
            }
        };

        let Some(credential) = persisted else {
            self.end_session();
            return;
        };

        match self.fetch_identity(&credential.token).await {
            Ok(user) => {
                info!(username = %user.username, "session restored");
                self.state
                    .send_replace(Session::authenticated(credential.token, user));
            }
            Err(err) => {
                info!(error = %err, "persisted credential rejected");
                self.end_session();
            }
        }
    }

    async fn fetch_identity(&self, token: &str) -> Result<User, HttpError> {
        let value = self
            .transport
            .send(Method::GET, IDENTITY_PATH, Some(token), RequestBody::Empty)
            .await?;
        decode_user(value)
    }

    /// Exchange credentials for a token and become `Authenticated`.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.initialize().await;

        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::new("credentials", "Both fields required").into());
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = serde_json::to_value(&request).map_err(|err| AuthError::Rejected {
            status: None,
            message: format!("failed to encode login request: {err}"),
        })?;
        let value = self
            .transport
            .send(Method::POST, LOGIN_PATH, None, RequestBody::Json(body))
            .await
            .map_err(AuthError::from_login_failure)?;
        let response: LoginResponse =
            serde_json::from_value(value).map_err(|err| AuthError::Rejected {
                status: None,
                message: format!("unexpected login response: {err}"),
            })?;

        let user = response.admin.unwrap_or_else(|| User {
            id: String::new(),
            username: username.to_string(),
            role: None,
        });
        let persisted = PersistedCredential {
            token: response.token.clone(),
            username: user.username.clone(),
        };
        if let Err(err) = self.credentials.save(&persisted) {
            warn!(error = %err, "session will not survive restart");
        }

        let session = Session::authenticated(response.token, user);
        info!(username = %persisted.username, "signed in");
        self.state.send_replace(session.clone());
        Ok(session)
    }

    /// End the session locally. Never fails and needs no network.
    pub fn logout(&self) {
        self.end_session();
        info!("signed out");
    }

    /// Logout triggered by the API refusing the current credential.
    pub fn force_logout(&self, reason: &str) {
        if self.status() == SessionStatus::Authenticated {
            counter!("blog_admin_forced_logout_total").increment(1);
            warn!(reason, "session ended by the server");
        }
        self.end_session();
    }

    fn end_session(&self) {
        if let Err(err) = self.credentials.clear() {
            warn!(error = %err, "failed to clear persisted credential");
        }
        self.state.send_replace(Session::unauthenticated());
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_owned)
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}

/// The identity endpoint answers with the user itself or wraps it.
fn decode_user(value: serde_json::Value) -> Result<User, HttpError> {
    let inner = match value {
        serde_json::Value::Object(mut map) => match map.remove("admin").or_else(|| map.remove("user")) {
            Some(inner @ serde_json::Value::Object(_)) => inner,
            _ => serde_json::Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(inner)
        .map_err(|err| HttpError::new(None, format!("unexpected identity response: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use httpmock::MockServer;
    use reqwest::{StatusCode, Url};

    use crate::infra::credentials::MemoryCredentialStore;

    fn store(server: &MockServer, credentials: Arc<MemoryCredentialStore>) -> SessionStore {
        let base = Url::parse(&server.base_url()).expect("base url");
        let transport = Transport::new(&base, Duration::from_secs(5)).expect("transport");
        SessionStore::new(transport, credentials)
    }

    fn persisted(token: &str) -> PersistedCredential {
        PersistedCredential {
            token: token.into(),
            username: "admin".into(),
        }
    }

    #[tokio::test]
    async fn initialize_without_credential_settles_unauthenticated() {
        let server = MockServer::start();
        let me = server.mock(|when, then| {
            when.method("GET").path(IDENTITY_PATH);
            then.status(200);
        });
        let credentials = Arc::new(MemoryCredentialStore::default());
        let store = store(&server, credentials);

        assert_eq!(store.status(), SessionStatus::Pending);
        assert_eq!(store.initialize().await, SessionStatus::Unauthenticated);
        me.assert_hits(0);
    }

    #[tokio::test]
    async fn initialize_validates_once_and_restores_user() {
        let server = MockServer::start();
        let me = server.mock(|when, then| {
            when.method("GET")
                .path(IDENTITY_PATH)
                .header("authorization", "Bearer saved");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"_id":"u1","username":"admin","role":"owner"}"#);
        });
        let credentials = Arc::new(MemoryCredentialStore::with_credential(persisted("saved")));
        let store = store(&server, credentials);

        assert_eq!(store.initialize().await, SessionStatus::Authenticated);
        assert_eq!(store.initialize().await, SessionStatus::Authenticated);
        me.assert_hits(1);

        let session = store.snapshot();
        assert_eq!(session.username(), Some("admin"));
        assert_eq!(session.user().and_then(|u| u.role.as_deref()), Some("owner"));
        assert_eq!(store.token().as_deref(), Some("saved"));
    }

    #[tokio::test]
    async fn rejected_credential_is_cleared() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path(IDENTITY_PATH);
            then.status(401)
                .header("content-type", "application/json")
                .body(r#"{"message":"jwt expired"}"#);
        });
        let credentials = Arc::new(MemoryCredentialStore::with_credential(persisted("old")));
        let store = store(&server, credentials.clone());

        assert_eq!(store.initialize().await, SessionStatus::Unauthenticated);
        assert_eq!(credentials.current(), None);
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn unreachable_identity_endpoint_settles_unauthenticated() {
        let base = Url::parse("http://127.0.0.1:9").expect("url");
        let transport = Transport::new(&base, Duration::from_millis(500)).expect("transport");
        let credentials = Arc::new(MemoryCredentialStore::with_credential(persisted("tok")));
        let store = SessionStore::new(transport, credentials.clone());

        assert_eq!(store.initialize().await, SessionStatus::Unauthenticated);
        assert_eq!(credentials.current(), None);
    }

    #[tokio::test]
    async fn login_with_wrong_password_reports_server_message() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method("POST")
                .path(LOGIN_PATH)
                .json_body_includes(r#"{"username":"admin","password":"wrong"}"#);
            then.status(401)
                .header("content-type", "application/json")
                .body(r#"{"message":"Invalid credentials"}"#);
        });
        let credentials = Arc::new(MemoryCredentialStore::default());
        let store = store(&server, credentials.clone());

        let err = store.login("admin", "wrong").await.expect_err("rejected");
        login.assert();
        assert_eq!(
            err,
            AuthError::Rejected {
                status: Some(StatusCode::UNAUTHORIZED),
                message: "Invalid credentials".into(),
            }
        );
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert_eq!(credentials.current(), None);
    }

    #[tokio::test]
    async fn login_without_message_falls_back_to_generic_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path(LOGIN_PATH);
            then.status(500).body("boom");
        });
        let store = store(&server, Arc::new(MemoryCredentialStore::default()));

        let err = store.login("admin", "pw").await.expect_err("rejected");
        assert_eq!(err.to_string(), "Login failed");
    }

    #[tokio::test]
    async fn login_requires_both_fields_without_network() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method("POST").path(LOGIN_PATH);
            then.status(200);
        });
        let store = store(&server, Arc::new(MemoryCredentialStore::default()));

        let err = store.login("admin", "").await.expect_err("incomplete");
        assert!(matches!(err, AuthError::Incomplete(_)));
        assert_eq!(err.to_string(), "Both fields required");
        login.assert_hits(0);
    }

    #[tokio::test]
    async fn login_persists_token_and_username() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path(LOGIN_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"token":"fresh","admin":{"_id":"u1","username":"editor"}}"#);
        });
        let credentials = Arc::new(MemoryCredentialStore::default());
        let store = store(&server, credentials.clone());
        let mut updates = store.subscribe();

        let session = store.login("editor", "pw").await.expect("login");
        assert!(session.is_authenticated());
        assert_eq!(
            credentials.current(),
            Some(PersistedCredential {
                token: "fresh".into(),
                username: "editor".into(),
            })
        );
        assert!(updates.has_changed().expect("sender alive"));
        assert!(updates.borrow_and_update().is_authenticated());
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_offline() {
        let credentials = Arc::new(MemoryCredentialStore::with_credential(persisted("tok")));
        let base = Url::parse("http://127.0.0.1:9").expect("url");
        let transport = Transport::new(&base, Duration::from_millis(200)).expect("transport");
        let store = SessionStore::new(transport, credentials.clone());

        store.logout();
        store.logout();
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert_eq!(credentials.current(), None);
    }

    #[test]
    fn identity_may_be_wrapped() {
        let wrapped = serde_json::json!({"admin": {"_id": "u1", "username": "a"}});
        let bare = serde_json::json!({"_id": "u2", "username": "b"});
        assert_eq!(decode_user(wrapped).expect("wrapped").username, "a");
        assert_eq!(decode_user(bare).expect("bare").id, "u2");
    }
}
