use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, ProtectedResponse, PublicUser, TokenResponse},
        extractors::AuthUser,
        password::{hash_password_blocking, verify_against_dummy, verify_password_blocking},
        repo::{is_unique_violation, User},
    },
    error::{ApiError, MessageBody},
    state::AppState,
};

const MISSING_FIELDS: &str = "Email and password are required";
const EMAIL_TAKEN: &str = "User with this email already exists";
// Shared by unknown-email and wrong-password so callers cannot tell them apart.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/protected", get(protected))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let Json(payload) = payload?;
    let (email, password) = payload.into_parts().ok_or_else(|| {
        warn!("register: missing email or password");
        ApiError::BadRequest(MISSING_FIELDS.into())
    })?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
    }

    let hash = hash_password_blocking(password).await?;

    // The unique index settles a race between the lookup above and this insert.
    let user = match User::create(&state.db, &email, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %email, "email registered concurrently");
            return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageBody::new("User registered successfully!")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    let (email, password) = payload.into_parts().ok_or_else(|| {
        warn!("login: missing email or password");
        ApiError::BadRequest(MISSING_FIELDS.into())
    })?;

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        verify_against_dummy(password).await?;
        warn!(email = %email, "login unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let access_token = state.jwt.sign_access(&user.email)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}

#[instrument(skip_all)]
pub async fn protected(AuthUser(email): AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        logged_in_as: email,
        message: "You have access to protected data".into(),
    })
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = User::list_public(&state.db).await?;
    Ok(Json(users))
}
