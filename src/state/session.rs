//! Session context shared by the request pipeline, the auth store and the
//! route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionContext` is built per console process, hydrated from the
//! token store, and handed (behind an `Arc`) to [`crate::net::client::ApiClient`]
//! for the bearer credential and to [`crate::routing::guard::RouteGuard`] for
//! navigation decisions.
//!
//! DESIGN
//! ======
//! All fields live behind one `std::sync::Mutex`; no method awaits, so the
//! lock is never held across a suspension point. Every transition bumps a
//! generation counter, and async completions carry the generation they
//! started under: a completion whose generation is no longer current is
//! discarded.
//!
//! Invariant: a profile is only ever present together with a credential.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::token::{StoreError, TokenStore};
use crate::net::types::Profile;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A credential was hydrated from storage but not yet verified.
    Unverified,
    LoggedOut,
    Restoring,
    LoggedIn,
    LoginInFlight,
}

/// Point-in-time copy of the session used for pure decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub has_credential: bool,
    pub profile: Option<Profile>,
    pub phase: SessionPhase,
    pub loading: bool,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.has_credential
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(Profile::is_admin)
    }

    /// Credential present but the profile has not been fetched yet.
    #[must_use]
    pub fn needs_profile(&self) -> bool {
        self.has_credential && self.profile.is_none()
    }
}

#[derive(Debug)]
struct SessionInner {
    credential: Option<String>,
    profile: Option<Profile>,
    phase: SessionPhase,
    loading: bool,
    generation: u64,
}

impl SessionInner {
    fn settled_phase(&self) -> SessionPhase {
        match (&self.credential, &self.profile) {
            (Some(_), Some(_)) => SessionPhase::LoggedIn,
            (Some(_), None) => SessionPhase::Unverified,
            (None, _) => SessionPhase::LoggedOut,
        }
    }

    fn reset(&mut self) {
        self.credential = None;
        self.profile = None;
        self.phase = SessionPhase::LoggedOut;
        self.loading = false;
        self.generation += 1;
    }
}

pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    inner: Mutex<SessionInner>,
}

impl SessionContext {
    /// Build a session from whatever credential the store currently holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn hydrate(store: Arc<dyn TokenStore>) -> Result<Self, StoreError> {
        let credential = store.load()?;
        let phase = if credential.is_some() { SessionPhase::Unverified } else { SessionPhase::LoggedOut };
        tracing::debug!(has_credential = credential.is_some(), "session hydrated");
        Ok(Self {
            store,
            inner: Mutex::new(SessionInner { credential, profile: None, phase, loading: false, generation: 0 }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.lock().credential.clone()
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.lock().profile.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.lock().credential.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.lock().profile.as_ref().is_some_and(Profile::is_admin)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            has_credential: inner.credential.is_some(),
            profile: inner.profile.clone(),
            phase: inner.phase,
            loading: inner.loading,
        }
    }

    /// Start a transition and return its generation ticket.
    pub fn begin(&self, phase: SessionPhase) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.phase = phase;
        inner.loading = true;
        inner.generation
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Complete a login: persist the credential, then publish it with the
    /// profile. Returns `Ok(false)` without touching anything if the
    /// transition was superseded.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be persisted; the session is
    /// left as it was before the login.
    pub fn establish(&self, generation: u64, token: &str, profile: Profile) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(generation, current = inner.generation, "discarding stale login completion");
            return Ok(false);
        }
        if let Err(e) = self.store.save(token) {
            inner.loading = false;
            inner.phase = inner.settled_phase();
            return Err(e);
        }
        inner.credential = Some(token.to_owned());
        inner.profile = Some(profile);
        inner.phase = SessionPhase::LoggedIn;
        inner.loading = false;
        Ok(true)
    }

    /// Attach a fetched profile to the current credential. Returns `false` if
    /// the fetch was superseded or the credential is gone.
    pub fn attach_profile(&self, generation: u64, profile: Profile) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation || inner.credential.is_none() {
            tracing::debug!(generation, current = inner.generation, "discarding stale profile completion");
            return false;
        }
        inner.profile = Some(profile);
        inner.phase = SessionPhase::LoggedIn;
        inner.loading = false;
        true
    }

    /// Settle a failed transition back to the phase its data implies.
    pub fn abandon(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation {
            inner.loading = false;
            inner.phase = inner.settled_phase();
        }
    }

    /// Drop the credential and profile from memory, then from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted credential cannot be removed; memory
    /// is cleared regardless.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.lock().reset();
        self.store.clear()
    }

    /// Unauthenticated-response path: like [`Self::clear`] but never fails.
    pub fn expire(&self) {
        if let Err(e) = self.clear() {
            tracing::warn!(error = %e, "failed to remove expired credential");
        }
        tracing::info!("session expired");
    }

    /// Merge `patch` into the current profile. Returns `Ok(false)` when no
    /// profile is loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged document is not a valid profile; the
    /// stored profile is left unchanged.
    pub fn merge_profile(&self, patch: &Value) -> Result<bool, serde_json::Error> {
        let mut inner = self.lock();
        let Some(current) = inner.profile.as_ref() else {
            return Ok(false);
        };
        let mut merged = current.clone();
        merged.merge(patch)?;
        inner.profile = Some(merged);
        Ok(true)
    }
}
