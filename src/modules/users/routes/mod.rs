use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use folio_authz::{Identity, PasswordHasher, TokenService};
use folio_http::{AppError, ValidJson};

use super::models::{ChangePasswordRequest, User, UserProfile};
use super::store::UserStore;

/// Shared state for the users routes
#[derive(Clone)]
pub struct UsersState {
    pub store: UserStore,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
}

impl FromRef<UsersState> for Arc<TokenService> {
    fn from_ref(state: &UsersState) -> Self {
        state.tokens.clone()
    }
}

/// HTTP routes for the users module
pub fn router(state: UsersState) -> Router {
    tracing::debug!(target: "folio.routes", module = "users", "registering routes");

    Router::new()
        .route("/users/user", get(get_user))
        .route("/users/change_password", post(change_password))
        .with_state(state)
}

async fn load_caller(store: &UserStore, identity: &Identity) -> Result<User, AppError> {
    store
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))
}

async fn get_user(
    State(state): State<UsersState>,
    identity: Identity,
) -> Result<Json<UserProfile>, AppError> {
    let user = load_caller(&state.store, &identity).await?;
    Ok(Json(user.into()))
}

async fn change_password(
    State(state): State<UsersState>,
    identity: Identity,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    let user = load_caller(&state.store, &identity).await?;

    let verified = state
        .hasher
        .verify_blocking(request.old_password, user.hashed_password)
        .await?;
    if !verified {
        tracing::warn!(user_id = user.id, "password change rejected: old password mismatch");
        return Err(AppError::unauthorized("Cannot verify password."));
    }

    let hashed = state.hasher.hash_blocking(request.new_password).await?;
    if !state.store.update_password(user.id, &hashed).await? {
        return Err(AppError::not_found("User not found."));
    }

    tracing::info!(user_id = user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
