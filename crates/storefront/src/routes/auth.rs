//! Authentication route handlers.
//!
//! Credentials are checked by the backend. On login the storefront keeps
//! the user and access token in the session and moves this browser's guest
//! cart into the user's cart.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tower_sessions::Session;
use tracing::{error, info, instrument};

use crate::api::types::{LoginRequest, MessageResponse, SignupRequest};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, device_id, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub user: CurrentUser,
    /// Guest cart lines moved into the user's cart.
    pub merged_lines: usize,
}

/// Log in with a username or email and password.
#[instrument(skip(state, session, credentials), fields(identifier = %credentials.identifier))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<LoginView>> {
    if credentials.identifier.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username or email and password are required".to_string(),
        ));
    }

    let response = state.api().login(&credentials).await?;
    let user = CurrentUser::from(response.user);
    let device = device_id(&session).await?;

    set_current_user(&session, &user, &response.access_token).await?;
    set_sentry_user(&user.id, Some(&user.email));
    info!(user_id = %user.id, is_admin = user.is_admin, "User logged in");

    // A failed merge leaves the guest cart in place; the login itself stands.
    let merged_lines = match state.carts().adopt_guest_cart(device, user.id).await {
        Ok(moved) => moved,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "Failed to merge guest cart");
            0
        }
    };

    Ok(Json(LoginView { user, merged_lines }))
}

/// Create an account.
#[instrument(skip(state, signup), fields(username = %signup.username))]
pub async fn signup(
    State(state): State<AppState>,
    Json(signup): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if signup.username.trim().is_empty()
        || signup.email.trim().is_empty()
        || signup.password.is_empty()
    {
        return Err(AppError::BadRequest(
            "Username, email and password are required".to_string(),
        ));
    }

    let response = state.api().signup(&signup).await?;
    info!("Account created");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log out. The browser keeps its guest cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in user.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}
