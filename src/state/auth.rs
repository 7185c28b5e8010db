//! Authentication store: login, profile restore, logout and profile edits.
//!
//! SYSTEM CONTEXT
//! ==============
//! Drives the [`SessionContext`] state machine through the request pipeline.
//! The route guard calls [`AuthStore::restore`] whenever it sees a credential
//! without a profile.
//!
//! DESIGN
//! ======
//! - Transitions take a generation ticket from the session before awaiting;
//!   completions carrying a stale ticket are dropped.
//! - Profile fetches are serialized behind an async gate so concurrent
//!   navigations share one `/auth/me` call.
//! - Logout is best-effort on the server and unconditional locally.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use super::session::{SessionContext, SessionPhase};
use super::token::StoreError;
use crate::net::api::{auth, users};
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{Captcha, LoginRequest, LoginResponse, Profile, ProfileUpdate};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("superseded by a later session transition")]
    Superseded,
    #[error("invalid profile update: {0}")]
    Decode(String),
}

pub struct AuthStore {
    client: Arc<ApiClient>,
    fetch_gate: tokio::sync::Mutex<()>,
    captcha: Mutex<Option<Captcha>>,
}

impl AuthStore {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, fetch_gate: tokio::sync::Mutex::new(()), captcha: Mutex::new(None) }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        self.client.session()
    }

    // =========================================================================
    // Derived accessors
    // =========================================================================

    #[must_use]
    pub fn username(&self) -> String {
        self.session().profile().map(|p| p.username).unwrap_or_default()
    }

    /// Nickname, falling back to the username.
    #[must_use]
    pub fn nickname(&self) -> String {
        self.session()
            .profile()
            .map(|p| p.display_name().to_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn avatar(&self) -> String {
        self.session().profile().and_then(|p| p.avatar).unwrap_or_default()
    }

    /// Captcha most recently fetched for the login form.
    #[must_use]
    pub fn captcha(&self) -> Option<Captcha> {
        self.captcha.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_captcha(&self, captcha: Option<Captcha>) {
        *self.captcha.lock().unwrap_or_else(PoisonError::into_inner) = captcha;
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Fetch a fresh login captcha and keep it for the next login attempt.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn fetch_captcha(&self) -> Result<Captcha, AuthError> {
        let captcha: Captcha = self.client.send_json(auth::captcha()).await?;
        self.set_captcha(Some(captcha.clone()));
        Ok(captcha)
    }

    /// Submit credentials. On success the credential is persisted and the
    /// returned profile becomes the session profile; on failure nothing is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error, a storage error, or `Superseded` if another
    /// transition started while the request was in flight.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let session = self.session();
        let ticket = session.begin(SessionPhase::LoginInFlight);

        let result = self.client.send_json::<LoginResponse>(auth::login(credentials)).await;
        // A captcha is single use on the server whatever the outcome.
        self.set_captcha(None);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                session.abandon(ticket);
                return Err(e.into());
            }
        };
        if !session.establish(ticket, &response.access_token, response.user.clone())? {
            return Err(AuthError::Superseded);
        }
        tracing::info!(username = %response.user.username, "logged in");
        Ok(response)
    }

    /// Make sure the session has a profile for its credential.
    ///
    /// Returns `None` when there is no credential. Any failure logs the
    /// session out before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error, or `Superseded` if the session changed
    /// while the profile was being fetched.
    pub async fn restore(&self) -> Result<Option<Profile>, AuthError> {
        let _gate = self.fetch_gate.lock().await;
        let session = self.session();
        let snapshot = session.snapshot();
        if !snapshot.has_credential {
            return Ok(None);
        }
        if let Some(profile) = snapshot.profile {
            return Ok(Some(profile));
        }

        let ticket = session.begin(SessionPhase::Restoring);
        match self.client.send_json::<Profile>(auth::me()).await {
            Ok(profile) => {
                if session.attach_profile(ticket, profile.clone()) {
                    tracing::info!(username = %profile.username, "session restored");
                    Ok(Some(profile))
                } else {
                    Err(AuthError::Superseded)
                }
            }
            Err(e) => {
                if session.is_current(ticket) {
                    if let Err(logout_error) = self.logout().await {
                        tracing::warn!(error = %logout_error, "logout after failed restore did not complete");
                    }
                }
                tracing::info!(error = %e, "session restore failed");
                Err(e.into())
            }
        }
    }

    /// Log out. The server call is skipped without a credential and its
    /// failure is ignored; local state is always cleared. Logging out an
    /// already logged-out session does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted credential cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let session = self.session();
        let snapshot = session.snapshot();
        if !snapshot.has_credential && snapshot.profile.is_none() && snapshot.phase == SessionPhase::LoggedOut {
            return Ok(());
        }

        if snapshot.has_credential {
            if let Err(e) = self.client.send(auth::logout()).await {
                tracing::debug!(error = %e, "server logout failed; clearing local session anyway");
            }
        }
        session.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Merge locally known profile changes (for example after an avatar
    /// upload) into the session profile.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the merged profile is invalid.
    pub fn update_user_info(&self, patch: &Value) -> Result<bool, AuthError> {
        self.session()
            .merge_profile(patch)
            .map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Save profile changes on the server, then merge what it returned (or,
    /// for an empty response, the submitted fields) into the session.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error or `Decode` if the merge fails.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<Profile>, AuthError> {
        let returned: Value = self.client.send_json(users::update_my_profile(update)).await?;
        let patch = match returned {
            Value::Object(_) => returned,
            _ => serde_json::to_value(update).map_err(|e| AuthError::Decode(e.to_string()))?,
        };
        self.update_user_info(&patch)?;
        Ok(self.session().profile())
    }
}
