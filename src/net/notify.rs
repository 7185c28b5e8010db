//! User-visible notifications.
//!
//! The pipeline and the route guard report failures through a [`Notifier`]
//! instead of printing directly, so front-ends decide how a notice surfaces.

use super::error::ErrorClass;

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub class: ErrorClass,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self { class, message: message.into() }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Emits notices as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::warn!(class = %notice.class, "{}", notice.message);
    }
}
