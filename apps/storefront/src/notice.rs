//! Transient user feedback (toasts) and delayed navigation.

use serde::Serialize;
use std::time::Duration;

use metiz_core::Route;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Navigate to `route` once `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub after: Duration,
}

impl Redirect {
    pub fn now(route: Route) -> Self {
        Redirect {
            route,
            after: Duration::ZERO,
        }
    }

    pub fn delayed(route: Route, after: Duration) -> Self {
        Redirect { route, after }
    }
}
