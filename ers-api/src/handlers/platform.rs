use crate::connect::LocalAddr;
use crate::error::ApiError;
use crate::server::ApiState;
use axum::extract::{ConnectInfo, Request, State};
use axum::response::Json;
use ers_core::platform::{self, RuntimeSnapshot};
use std::sync::Arc;

/// GET /bluegreen-check
///
/// `[application_name, instance_index]` of the instance that served the
/// request. Hitting a route shared by two apps shows which one answered.
pub async fn bluegreen_check(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<[String; 2]>, ApiError> {
    let (name, index) = platform::list_bluegreen_identity(state.env.as_ref())?;
    Ok(Json([name, index]))
}

/// GET /app-env
pub async fn app_env(
    State(state): State<Arc<ApiState>>,
    request: Request,
) -> Result<Json<RuntimeSnapshot>, ApiError> {
    let local_addr = request
        .extensions()
        .get::<ConnectInfo<LocalAddr>>()
        .and_then(|ConnectInfo(LocalAddr(addr))| *addr);

    let snapshot =
        platform::build_runtime_snapshot(state.env.as_ref(), local_addr, &state.runtime_version)?;
    Ok(Json(snapshot))
}
