//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use jersey_house_core::{CartKey, UserId};

use crate::api::types::ApiUser;

/// Session-stored user identity.
///
/// Copied from the login response; the backend stays the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user ID.
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Whether the user may use the admin console.
    #[serde(default)]
    pub is_admin: bool,
}

impl CurrentUser {
    /// The key of this user's cart.
    #[must_use]
    pub const fn cart_key(&self) -> CartKey {
        CartKey::User(self.id)
    }
}

impl From<ApiUser> for CurrentUser {
    fn from(user: ApiUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the backend access token of the logged-in user.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for this browser's device id, which scopes its carts.
    pub const DEVICE_ID: &str = "device_id";
}
