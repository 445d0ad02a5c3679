use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CatalogError, CatalogResult},
    http_server::state::AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub movie_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary_text: String,
}

pub async fn generate_summary(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> CatalogResult<Json<SummaryResponse>> {
    let Json(request) = payload?;

    let movie = app_state
        .movies
        .fetch_by_id(request.movie_id)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Movie not found.".into()))?;

    let summary_text = app_state.summaries.summarize(&movie).await?;
    log::info!("Generated summary for movie {}", movie.id);

    Ok(Json(SummaryResponse { summary_text }))
}
