//! # State Module
//!
//! Shared, observable session state.
//!
//! Each container owns one `tokio::sync::watch` channel. Methods are the
//! only writers; anyone can `subscribe()` and drop the receiver to stop
//! listening.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐      │
//! │  │       CartStore          │        │       AuthStore          │      │
//! │  │                          │        │                          │      │
//! │  │  watch::Sender<          │        │  watch::Sender<          │      │
//! │  │    CartState>            │        │    AuthState>            │      │
//! │  │  Arc<dyn StorefrontApi>  │        │  BearerToken (writer)    │      │
//! │  └────────────┬─────────────┘        └────────────┬─────────────┘      │
//! │               │ subscribe()                       │ subscribe()         │
//! │               ▼                                   ▼                     │
//! │        watch::Receiver                     watch::Receiver              │
//! │                                                                         │
//! │  CONCURRENCY:                                                          │
//! │  • No lock is held across a backend await                              │
//! │  • State changes only after the backend confirms                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;

pub use auth::AuthStore;
pub use cart::CartStore;
