//! # Auth State
//!
//! Who is logged in. The only writer of the bearer token the HTTP client
//! attaches to requests.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use metiz_client::{BearerToken, StorefrontApi};
use metiz_core::validation::{validate_email, validate_required};
use metiz_core::{AuthState, CoreError, Menu, Role, Route, Session};

use crate::error::{AppError, AppResult};

/// Observable auth container.
#[derive(Clone)]
pub struct AuthStore {
    api: Arc<dyn StorefrontApi>,
    token: BearerToken,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthStore {
    /// Creates an anonymous session.
    ///
    /// `token` must be the handle the backend client reads from.
    pub fn new(api: Arc<dyn StorefrontApi>, token: BearerToken) -> Self {
        let (state, _) = watch::channel(AuthState::anonymous());
        AuthStore {
            api,
            token,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Logs in and stores the session.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = validate_email(email).map_err(CoreError::from)?;
        validate_required("password", password).map_err(CoreError::from)?;
        debug!(email, "login");

        let session = self.api.login(email, password).await.map_err(|err| {
            let app_err = AppError::from(err);
            warn!(email, code = ?app_err.code, "Login failed");
            app_err
        })?;

        self.restore(session.clone());
        info!(role = %session.role, "Logged in");
        Ok(session)
    }

    /// Adopts a session obtained earlier (e.g. from the config file).
    pub fn restore(&self, session: Session) {
        self.token.set(session.token.clone());
        self.state.send_replace(AuthState::authenticated(session));
    }

    /// Sends `token` with requests without establishing a session.
    ///
    /// Used for a configured token whose role is unknown; the menu stays
    /// anonymous until a login or a full session is restored.
    pub fn attach_token(&self, token: &str) {
        self.token.set(token.to_string());
        debug!("Bearer token attached without session");
    }

    /// Drops the session locally and returns where to navigate next.
    pub fn logout(&self) -> Route {
        self.token.clear();
        self.state.send_replace(AuthState::anonymous());
        info!("Logged out");
        Route::Home
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    /// Navigation menu for the current state.
    pub fn menu(&self) -> Menu {
        Menu::for_auth(&self.state.borrow())
    }
}
