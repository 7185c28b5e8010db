//! Pre-navigation guard.
//!
//! DESIGN
//! ======
//! [`decide`] is an ordered decision table over (intent, session snapshot)
//! and has no side effects. [`RouteGuard::before_each`] adds the two effects
//! around it: restoring the profile when only a credential is known, and
//! notifying when a route is refused for lack of privilege.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use std::sync::Arc;

use super::routes::{RouteIntent, intent_for};
use crate::net::error::ErrorClass;
use crate::net::notify::Notice;
use crate::state::auth::AuthStore;
use crate::state::session::SessionSnapshot;

/// Exactly one outcome per navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    RedirectToLogin { return_to: String },
    RedirectHome,
    /// Refused for lack of privilege; the console stays home.
    Forbidden,
}

/// Pure decision table. Rows are evaluated in order; first match wins.
#[must_use]
pub fn decide(intent: &RouteIntent, session: &SessionSnapshot) -> GuardDecision {
    if intent.is_login() && session.is_logged_in() {
        return GuardDecision::RedirectHome;
    }
    if intent.public {
        return GuardDecision::Continue;
    }
    if intent.requires_auth && !session.is_logged_in() {
        return GuardDecision::RedirectToLogin { return_to: intent.target.clone() };
    }
    if intent.requires_admin && !session.is_admin() {
        return GuardDecision::Forbidden;
    }
    GuardDecision::Continue
}

pub struct RouteGuard {
    auth: Arc<AuthStore>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(auth: Arc<AuthStore>) -> Self {
        Self { auth }
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    pub async fn before_each(&self, target: &str) -> GuardDecision {
        let intent = intent_for(target);
        let client = self.auth.client();

        if client.session().snapshot().needs_profile() {
            if let Err(e) = self.auth.restore().await {
                tracing::info!(route = target, error = %e, "profile restore failed during navigation");
            }
        }

        let decision = decide(&intent, &client.session().snapshot());
        if decision == GuardDecision::Forbidden {
            let class = ErrorClass::Forbidden;
            client.notifier().notify(&Notice::new(class, class.message(None)));
            tracing::warn!(route = target, "navigation refused: insufficient privilege");
        }
        decision
    }
}
