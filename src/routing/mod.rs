//! Console navigation: the route table, the pre-navigation guard and the
//! router that ties them to the current location.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Location`] is shared with the request pipeline so an unauthenticated
//! response can force the console to [`LOGIN_PATH`] from any call site.
//! [`Router::navigate`] runs the guard and settles on exactly one
//! destination per attempt.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod guard;
pub mod routes;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Url;

use self::guard::{GuardDecision, RouteGuard};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
/// Query parameter carrying the post-login return path.
pub const REDIRECT_PARAM: &str = "redirect";

// Only used to borrow `Url`'s query encoding for relative hrefs.
const HREF_BASE: &str = "http://console.local";

/// Login href that returns to `return_to` after authenticating.
#[must_use]
pub fn login_href(return_to: &str) -> String {
    let Ok(mut url) = Url::parse(HREF_BASE).and_then(|base| base.join(LOGIN_PATH)) else {
        return LOGIN_PATH.to_owned();
    };
    url.query_pairs_mut().append_pair(REDIRECT_PARAM, return_to);
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}

/// The `redirect` parameter of a relative href, decoded.
#[must_use]
pub fn redirect_target(href: &str) -> Option<String> {
    let url = Url::parse(HREF_BASE).and_then(|base| base.join(href)).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
struct LocationInner {
    current: String,
    forced: Option<String>,
}

/// Current console path plus any redirect forced from outside navigation.
#[derive(Debug)]
pub struct Location {
    inner: Mutex<LocationInner>,
}

impl Location {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self { inner: Mutex::new(LocationInner { current: initial.to_owned(), forced: None }) }
    }

    fn lock(&self) -> MutexGuard<'_, LocationInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.lock().current.clone()
    }

    pub fn set(&self, path: &str) {
        self.lock().current = path.to_owned();
    }

    /// Move to `path` immediately and remember it as a forced redirect.
    pub fn force(&self, path: &str) {
        let mut inner = self.lock();
        inner.current = path.to_owned();
        inner.forced = Some(path.to_owned());
        tracing::info!(path, "navigation forced");
    }

    pub fn take_forced(&self) -> Option<String> {
        self.lock().forced.take()
    }
}

/// Outcome of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub decision: GuardDecision,
    /// Where the console ended up.
    pub location: String,
}

impl Navigation {
    /// Whether the requested route was entered.
    #[must_use]
    pub fn entered(&self) -> bool {
        self.location == self.requested
    }
}

pub struct Router {
    guard: RouteGuard,
    location: Arc<Location>,
}

impl Router {
    #[must_use]
    pub fn new(guard: RouteGuard, location: Arc<Location>) -> Self {
        Self { guard, location }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Run the guard for `target` and move to wherever it settles.
    ///
    /// A guard redirect wins over a redirect forced by a failed request
    /// during the guard.
    pub async fn navigate(&self, target: &str) -> Navigation {
        self.location.take_forced();
        let decision = self.guard.before_each(target).await;
        let forced = self.location.take_forced();

        let destination = match &decision {
            GuardDecision::Continue => forced.unwrap_or_else(|| target.to_owned()),
            GuardDecision::RedirectToLogin { return_to } => login_href(return_to),
            GuardDecision::RedirectHome | GuardDecision::Forbidden => HOME_PATH.to_owned(),
        };
        self.location.set(&destination);
        tracing::debug!(route = target, ?decision, location = %destination, "navigation settled");

        Navigation { requested: target.to_owned(), decision, location: destination }
    }
}
