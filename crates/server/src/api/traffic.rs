use crate::{dto::TrafficDto, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bikeflow::prelude::*;
use std::{collections::HashMap, sync::Arc};
use tracing::error;

pub async fn traffic(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let filter = match params.get("time") {
        Some(value) => {
            let raw: i32 = value.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
            TimeFilter::try_from(raw).map_err(|_| StatusCode::BAD_REQUEST)?
        }
        None => TimeFilter::Any,
    };
    let selection: FlowSelection = match params.get("flows") {
        Some(value) => value.parse().map_err(|_| StatusCode::BAD_REQUEST)?,
        None => FlowSelection::default(),
    };

    let guard = state.repository.read().await;
    let repository = guard.as_ref().ok_or_else(|| {
        error!("Traffic requested before any data was loaded");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let traffic = repository.traffic().filter(filter).compute();
    Ok(Json(TrafficDto::from(&traffic, &selection, repository)).into_response())
}
