use crate::error::ApiError;
use crate::server::ApiState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use ers_core::attendee::{Attendee, AttendeeForm};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "firstName", default)]
    pub first_name: String,
}

/// GET /attendees
pub async fn list_attendees(State(state): State<Arc<ApiState>>) -> Json<Value> {
    let attendees = state.attendees.list_all_attendees();
    Json(json!({"total": attendees.len(), "list": attendees}))
}

/// POST /attendees
pub async fn add_attendee(
    State(state): State<Arc<ApiState>>,
    Json(form): Json<AttendeeForm>,
) -> Result<(StatusCode, Json<Attendee>), ApiError> {
    let stored = state.attendees.translate_and_store(form)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /attendees
pub async fn delete_attendees(State(state): State<Arc<ApiState>>) -> Result<StatusCode, ApiError> {
    state.attendees.delete_all_attendees()?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /attendees/search?firstName=..
pub async fn search_attendees(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let attendees = state
        .attendees
        .search_attendees_by_first_name_fragment(&params.first_name);
    Json(json!({"total": attendees.len(), "list": attendees}))
}
