//! # Metiz Storefront
//!
//! Session state and user flows for the Metiz marketplace storefront.
//! The `metiz` binary drives them from the command line; any other front
//! end can hold a [`Storefront`] and subscribe to its containers.
//!
//! ## Module Organization
//! ```text
//! metiz_storefront/
//! ├── lib.rs          ◄─── You are here (wiring & tracing setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart container (confirmed updates)
//! │   └── auth.rs     ◄─── Session container and menu
//! ├── flows/
//! │   ├── order.rs    ◄─── Checkout
//! │   └── registration.rs ◄─── Buyer/vendor sign-up
//! ├── notice.rs       ◄─── Toasts and delayed redirects
//! ├── config.rs       ◄─── TOML + environment configuration
//! ├── cli.rs          ◄─── `metiz` subcommands
//! └── error.rs        ◄─── AppError for every operation
//! ```
//!
//! ## Shared Bearer Token
//! ```text
//! ┌──────────────┐   set / clear   ┌──────────────┐   read per request
//! │  AuthStore   │ ──────────────► │ BearerToken  │ ◄──────────────────┐
//! └──────────────┘                 └──────────────┘                    │
//!                                                          ┌───────────┴────────┐
//!                                                          │ HttpStorefrontApi  │
//!                                                          └────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod flows;
pub mod notice;
pub mod state;

use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use metiz_client::{BearerToken, HttpStorefrontApi, StorefrontApi};

use config::StorefrontConfig;
use error::AppResult;
use flows::{OrderFlow, RegistrationFlow};
use state::{AuthStore, CartStore};

/// Everything a storefront front end holds for one user session.
#[derive(Clone)]
pub struct Storefront {
    config: StorefrontConfig,
    api: Arc<dyn StorefrontApi>,
    pub auth: AuthStore,
    pub cart: CartStore,
}

impl Storefront {
    /// Builds the HTTP client from `config` and restores any saved session.
    pub fn new(config: StorefrontConfig) -> AppResult<Self> {
        let token = BearerToken::new();
        let api = HttpStorefrontApi::new(&config.api, token.clone())?;
        info!(base_url = %config.api.base_url, "Storefront client ready");
        Ok(Self::with_api(config, Arc::new(api), token))
    }

    /// Wires the containers around an existing backend.
    ///
    /// `token` must be the handle `api` reads from.
    pub fn with_api(
        config: StorefrontConfig,
        api: Arc<dyn StorefrontApi>,
        token: BearerToken,
    ) -> Self {
        let auth = AuthStore::new(api.clone(), token);
        if let Some(session) = config.auth.session() {
            debug!(role = %session.role, "Restoring saved session");
            auth.restore(session);
        } else if let Some(bearer) = config.auth.bearer_token() {
            auth.attach_token(bearer);
        }
        let cart = CartStore::new(api.clone());

        Storefront {
            config,
            api,
            auth,
            cart,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn order_flow(&self) -> OrderFlow {
        OrderFlow::new(self.api.clone(), self.cart.clone())
    }

    pub fn registration_flow(&self) -> RegistrationFlow {
        RegistrationFlow::new(self.api.clone(), self.config.redirect_delay())
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=metiz=trace` - Show trace for metiz crates only
/// - Default: INFO, DEBUG for metiz crates
///
/// Logs go to stderr so command output stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,metiz=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
