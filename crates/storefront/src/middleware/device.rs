//! Per-browser cart scoping.
//!
//! Each browser gets a random [`DeviceId`] on its first cart request; the id
//! lives in the session and partitions cart storage. Together with the
//! logged-in user it selects which cart a request works on.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jersey_house_core::CartKey;
use tower_sessions::Session;

use crate::cart::DeviceId;
use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// The cart a request operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartScope {
    /// The browser the cart belongs to.
    pub device: DeviceId,
    /// `<id>_cart` for a logged-in user, `guest_cart` otherwise.
    pub key: CartKey,
}

impl<S> FromRequestParts<S> for CartScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let device = device_id(&session).await?;
        let key = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await?
            .map_or(CartKey::Guest, |user| user.cart_key());

        Ok(Self { device, key })
    }
}

/// This browser's device id, assigned on first use.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn device_id(session: &Session) -> Result<DeviceId, tower_sessions::session::Error> {
    if let Some(device) = session.get::<DeviceId>(session_keys::DEVICE_ID).await? {
        return Ok(device);
    }

    let device = DeviceId::random();
    session.insert(session_keys::DEVICE_ID, device).await?;
    tracing::debug!(device = %device, "Assigned device id");
    Ok(device)
}
