/// Diagnostics API routes
use crate::{
    error::{Result, ServerError},
    services::host,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfoResponse {
    pub instance_id: String,
    pub availability_zone: String,
    pub hostname: String,
    pub timestamp: String,
}

/// GET /server-info
/// Cloud identity when available plus local host facts. Metadata failures
/// fall back to "unknown" and never fail the request.
pub async fn server_info(State(app_state): State<AppState>) -> Result<Json<ServerInfoResponse>> {
    let identity = app_state.metadata.identity().await;

    let hostname = host::hostname()
        .map_err(|e| ServerError::Diagnostics(format!("hostname lookup: {}", e)))?;

    Ok(Json(ServerInfoResponse {
        instance_id: identity.instance_id_or_unknown().to_string(),
        availability_zone: identity.availability_zone_or_unknown().to_string(),
        hostname,
        timestamp: host::timestamp(),
    }))
}
