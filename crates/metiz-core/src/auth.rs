//! # Auth Types
//!
//! Who is using the storefront and in which capacity.
//!
//! The backend names the two account kinds `"user"` (a buyer) and `"metiz"`
//! (a vendor). Everything above the wire uses the [`Role`] enum so that each
//! role-dependent branch is checked for exhaustiveness by the compiler.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Role
// =============================================================================

/// Account kind of an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Role {
    /// A shopper. Wire name `user`.
    #[serde(rename = "user")]
    Buyer,

    /// A registered seller with its own admin area. Wire name `metiz`.
    #[serde(rename = "metiz")]
    Vendor,
}

impl Role {
    /// The name the backend uses for this role.
    pub const fn as_wire_str(&self) -> &'static str {
        match self {
            Role::Buyer => "user",
            Role::Vendor => "metiz",
        }
    }

    /// Registration endpoint for accounts of this role.
    pub const fn registration_path(&self) -> &'static str {
        match self {
            Role::Buyer => "/api/users/registration",
            Role::Vendor => "/api/metiz/registration",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "buyer" => Ok(Role::Buyer),
            "metiz" | "vendor" => Ok(Role::Vendor),
            other => Err(format!(
                "Unknown role: '{}'. Valid options: user, metiz",
                other
            )),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated session as returned by the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,

    /// Bearer token attached to backend calls.
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Auth State
// =============================================================================

/// Current authentication state.
///
/// Set from a login response, cleared on logout, read-only everywhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    session: Option<Session>,
}

impl AuthState {
    /// The state of a visitor who has not logged in.
    pub const fn anonymous() -> Self {
        AuthState { session: None }
    }

    pub fn authenticated(session: Session) -> Self {
        AuthState {
            session: Some(session),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Role of the session, `None` for anonymous visitors.
    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Buyer).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"metiz\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"metiz\"").unwrap(),
            Role::Vendor
        );
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!("Vendor".parse::<Role>().unwrap(), Role::Vendor);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_registration_paths() {
        assert_eq!(Role::Buyer.registration_path(), "/api/users/registration");
        assert_eq!(Role::Vendor.registration_path(), "/api/metiz/registration");
    }

    #[test]
    fn test_auth_state() {
        let anon = AuthState::anonymous();
        assert!(!anon.is_authenticated());
        assert_eq!(anon.role(), None);

        let state = AuthState::authenticated(Session {
            role: Role::Vendor,
            token: "t0k3n".to_string(),
        });
        assert!(state.is_authenticated());
        assert_eq!(state.role(), Some(Role::Vendor));
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = Session {
            role: Role::Buyer,
            token: "very-secret".to_string(),
        };
        let debug = format!("{:?}", session);
        assert!(!debug.contains("very-secret"));
    }
}
