//! # metiz-client: Backend REST Client
//!
//! Every network call the storefront makes goes through this crate.
//!
//! ## Modules
//!
//! - [`api`] - The [`StorefrontApi`] trait (and `MockStorefrontApi`)
//! - [`http`] - reqwest implementation with bearer auth and request ids
//! - [`config`] - Base URL, asset host and timeout settings
//! - [`endpoints`] - Endpoint paths
//! - [`error`] - [`ClientError`] and the user-facing message mapping
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use metiz_client::{ApiSettings, BearerToken, HttpStorefrontApi, StorefrontApi};
//!
//! # async fn run() -> metiz_client::ClientResult<()> {
//! let api = HttpStorefrontApi::new(&ApiSettings::default(), BearerToken::new())?;
//! let items = api.fetch_cart().await?;
//! println!("{} lines in cart", items.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;

pub use api::{MockStorefrontApi, StorefrontApi};
pub use config::ApiSettings;
pub use error::{ClientError, ClientResult};
pub use http::{BearerToken, HttpStorefrontApi, REQUEST_ID_HEADER};
