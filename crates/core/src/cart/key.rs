//! Storage keys for session carts.

use core::fmt;

use crate::types::UserId;

/// Which cart a session is working with.
///
/// The persisted key is `"<userId>_cart"` for a logged-in user and
/// `"guest_cart"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartKey {
    /// Cart of an authenticated user.
    User(UserId),
    /// Cart of an anonymous visitor.
    Guest,
}

impl CartKey {
    const SUFFIX: &'static str = "_cart";
    const GUEST: &'static str = "guest_cart";

    /// Key for an optional logged-in user, falling back to the guest cart.
    #[must_use]
    pub fn for_user(user: Option<UserId>) -> Self {
        user.map_or(Self::Guest, Self::User)
    }

    /// The storage key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self {
            Self::User(id) => format!("{id}{}", Self::SUFFIX),
            Self::Guest => Self::GUEST.to_string(),
        }
    }

    /// Recognize a storage key written by [`CartKey::storage_key`].
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        if key == Self::GUEST {
            return Some(Self::Guest);
        }
        key.strip_suffix(Self::SUFFIX)?
            .parse::<i32>()
            .ok()
            .map(|id| Self::User(UserId::new(id)))
    }

    /// Whether this is the anonymous cart.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}
