//! # Navigation
//!
//! Which pages the navigation bar offers to whom.
//!
//! ```text
//! ┌──────────────────┬──────────┬──────────┬──────────┐
//! │ Route            │ Anonymous│  Buyer   │  Vendor  │
//! ├──────────────────┼──────────┼──────────┼──────────┤
//! │ My orders        │          │    ✓     │          │
//! │ Home             │          │    ✓     │          │
//! │ Cart             │          │    ✓     │          │
//! │ Vendor admin     │          │          │    ✓     │
//! │ Profile          │          │    ✓     │          │
//! │ Register         │    ✓     │          │          │
//! │ Log in           │    ✓     │          │          │
//! │ (Log out action) │          │    ✓     │    ✓     │
//! └──────────────────┴──────────┴──────────┴──────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::auth::{AuthState, Role};

/// A page of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Route {
    Orders,
    Home,
    Cart,
    VendorAdmin,
    Profile,
    Register,
    Login,
}

impl Route {
    /// Menu order of the navigation bar.
    pub const MENU: [Route; 7] = [
        Route::Orders,
        Route::Home,
        Route::Cart,
        Route::VendorAdmin,
        Route::Profile,
        Route::Register,
        Route::Login,
    ];

    pub const fn path(&self) -> &'static str {
        match self {
            Route::Orders => "/orders",
            Route::Home => "/",
            Route::Cart => "/cart",
            Route::VendorAdmin => "/metiz-admin",
            Route::Profile => "/profile",
            Route::Register => "/register",
            Route::Login => "/login",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Route::Orders => "My orders",
            Route::Home => "Home",
            Route::Cart => "Cart",
            Route::VendorAdmin => "Vendor admin",
            Route::Profile => "Profile",
            Route::Register => "Register",
            Route::Login => "Log in",
        }
    }

    /// Whether the menu shows this route for the given auth state.
    pub fn is_visible_to(&self, auth: &AuthState) -> bool {
        match (self, auth.role()) {
            (Route::Register | Route::Login, None) => true,
            (Route::Register | Route::Login, Some(_)) => false,
            (_, None) => false,
            (Route::Orders | Route::Home | Route::Cart | Route::Profile, Some(role)) => {
                role == Role::Buyer
            }
            (Route::VendorAdmin, Some(role)) => role == Role::Vendor,
        }
    }
}

/// One entry of the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct MenuEntry {
    pub route: Route,
    pub label: &'static str,
    pub path: &'static str,
}

/// The navigation menu for an auth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Menu {
    pub entries: Vec<MenuEntry>,

    /// Whether the "Log out" action is offered.
    pub show_logout: bool,
}

impl Menu {
    pub fn for_auth(auth: &AuthState) -> Self {
        let entries = Route::MENU
            .iter()
            .filter(|route| route.is_visible_to(auth))
            .map(|&route| MenuEntry {
                route,
                label: route.label(),
                path: route.path(),
            })
            .collect();

        Menu {
            entries,
            show_logout: auth.is_authenticated(),
        }
    }

    pub fn routes(&self) -> Vec<Route> {
        self.entries.iter().map(|e| e.route).collect()
    }
}
