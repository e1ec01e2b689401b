/// Users API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use roster_core::types::{NewUser, User, UserDraft, UserId, UserSummary};

const FIELDS_REQUIRED: &str = "Name and email are required";
const USER_NOT_FOUND: &str = "User not found";

/// Ids are matched exactly; a segment that is not an integer can never
/// match a row.
fn parse_id(raw: &str) -> Result<UserId> {
    raw.parse()
        .map_err(|_| ServerError::NotFound(USER_NOT_FOUND.to_string()))
}

/// A body that fails to parse is treated like one with missing fields
fn validate(payload: std::result::Result<Json<UserDraft>, JsonRejection>) -> Result<NewUser> {
    let Json(draft) = payload.map_err(|rejection| {
        tracing::debug!("Rejected user payload: {}", rejection);
        ServerError::BadRequest(FIELDS_REQUIRED.to_string())
    })?;
    draft.validate().map_err(ServerError::from)
}

/// GET /api/users
pub async fn list_users(State(app_state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = app_state.users.list_users().await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<User>> {
    let id = parse_id(&id)?;
    let user = app_state.users.get_user(id).await?;
    Ok(Json(user))
}

/// POST /api/users
/// Create a user; responds 201 with the assigned id
pub async fn create_user(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<UserDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSummary>)> {
    let user = validate(payload)?;
    let created = app_state.users.create_user(user).await?;
    tracing::info!(id = %created.id, "User created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/users/:id
/// Replace name and email
pub async fn update_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<UserDraft>, JsonRejection>,
) -> Result<Json<UserSummary>> {
    // Body is checked before the id, so a bad body is 400 even for unknown ids
    let user = validate(payload)?;
    let id = parse_id(&id)?;
    let updated = app_state.users.update_user(id, user).await?;
    Ok(Json(updated))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    app_state.users.delete_user(id).await?;
    tracing::info!(%id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
