//! # Registration Flow
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Registration page: Submit                                              │
//! │                                                                         │
//! │  password == confirmation? ── no ──► error toast, nothing sent         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  required fields / photo type ── bad ──► error toast, nothing sent     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  POST /api/users/registration  (buyer)                                 │
//! │  POST /api/metiz/registration  (vendor)                                │
//! │        │                                                                │
//! │        ├── failure ──► "Registration failed" toast, stay on page       │
//! │        └── success ──► "Registration successful!" toast,               │
//! │                        /login after the redirect delay                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use metiz_client::StorefrontApi;
use metiz_core::{RegistrationForm, Route};

use crate::error::AppError;
use crate::notice::{Notice, Redirect};

pub const REGISTRATION_SUCCEEDED: &str = "Registration successful!";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// What the page shows after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub notice: Notice,

    /// Present only after a successful registration.
    pub redirect: Option<Redirect>,
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        !self.notice.is_error()
    }
}

/// Creates buyer and vendor accounts.
#[derive(Clone)]
pub struct RegistrationFlow {
    api: Arc<dyn StorefrontApi>,
    redirect_delay: Duration,
}

impl RegistrationFlow {
    pub fn new(api: Arc<dyn StorefrontApi>, redirect_delay: Duration) -> Self {
        RegistrationFlow {
            api,
            redirect_delay,
        }
    }

    /// Validates and submits the form.
    ///
    /// Never fails: every outcome is a notice for the page.
    pub async fn submit(&self, form: RegistrationForm) -> RegistrationOutcome {
        let role = form.role();
        debug!(%role, has_photo = form.photo.is_some(), "submit registration");

        let payload = match form.into_payload() {
            Ok(payload) => payload,
            Err(err) => {
                debug!(%role, error = %err, "Registration form rejected");
                return RegistrationOutcome {
                    notice: Notice::error(err.to_string()),
                    redirect: None,
                };
            }
        };

        match self.api.register(payload).await {
            Ok(()) => {
                info!(%role, "Registration succeeded");
                RegistrationOutcome {
                    notice: Notice::success(REGISTRATION_SUCCEEDED),
                    redirect: Some(Redirect::delayed(Route::Login, self.redirect_delay)),
                }
            }
            Err(err) => {
                let app_err = AppError::from(err);
                warn!(%role, code = ?app_err.code, message = %app_err.message, "Registration failed");
                RegistrationOutcome {
                    notice: Notice::error(REGISTRATION_FAILED),
                    redirect: None,
                }
            }
        }
    }
}
