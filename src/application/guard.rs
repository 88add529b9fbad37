//! Route guard: decides whether a protected screen may render.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    routes::Route,
    session::{Session, SessionStatus},
};

use super::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Session),
    Redirect(Route),
}

#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Wait for the session to settle, then render or send to the login page.
    ///
    /// Nothing protected is rendered while the session is still `Pending`.
    pub async fn enter(&self, route: &Route) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Render(self.session.snapshot());
        }

        let mut updates = self.session.subscribe();
        self.session.initialize().await;
        let settled = match updates.wait_for(|session| session.status().is_settled()).await {
            Ok(session) => session.clone(),
            Err(_) => self.session.snapshot(),
        };

        if settled.is_authenticated() {
            GuardDecision::Render(settled)
        } else {
            debug!(%route, "redirecting to login");
            GuardDecision::Redirect(Route::Login)
        }
    }

    /// Resolve once the session ends, yielding where the view should go.
    pub async fn redirect_on_logout(&self) -> Route {
        let mut updates = self.session.subscribe();
        let _ = updates
            .wait_for(|session| session.status() == SessionStatus::Unauthenticated)
            .await;
        Route::Login
    }
}
