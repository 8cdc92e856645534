use std::{collections::HashMap, sync::Arc};

use crate::{dto::StationsDto, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn stations(
    Query(_): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let guard = state.repository.read().await;
    let repository = guard
        .as_ref()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(StationsDto::from(repository)).into_response())
}
