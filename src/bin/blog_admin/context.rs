#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use blog_admin::{
    application::{
        client::AuthorizedClient,
        error::AppError,
        guard::{GuardDecision, RouteGuard},
        session::SessionStore,
    },
    config::Settings,
    domain::{routes::Route, session::Session},
    infra::{credentials::FileCredentialStore, transport::Transport},
};

/// Everything a command handler needs, wired once per invocation.
#[derive(Debug)]
pub struct Console {
    pub settings: Settings,
    pub session: Arc<SessionStore>,
    pub client: AuthorizedClient,
    pub guard: RouteGuard,
}

impl Console {
    pub fn build(settings: Settings) -> Result<Self, AppError> {
        let transport = Transport::new(&settings.api.base_url, settings.api.timeout)?;
        let credentials = Arc::new(FileCredentialStore::new(settings.session.path.clone()));
        let session = Arc::new(SessionStore::new(transport, credentials));
        Ok(Self {
            client: AuthorizedClient::new(Arc::clone(&session)),
            guard: RouteGuard::new(Arc::clone(&session)),
            session,
            settings,
        })
    }

    /// Gate a command on the same check the console applies to its screens.
    pub async fn require(&self, route: Route) -> Result<Session, AppError> {
        match self.guard.enter(&route).await {
            GuardDecision::Render(session) => Ok(session),
            GuardDecision::Redirect(_) => Err(AppError::LoginRequired { route }),
        }
    }
}
