use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiResult,
    models::{AddToWatchlistRequest, WatchlistResponse},
    watchlist,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> ApiResult<Json<Vec<WatchlistResponse>>> {
    Ok(Json(watchlist::user_watchlist(&state.db, caller.id).await?))
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<AddToWatchlistRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    watchlist::add_to_watchlist(&state.db, caller.id, req.movie_id).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "message": "Movie added to watchlist" }))))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    watchlist::remove_from_watchlist(&state.db, caller.id, movie_id).await?;
    Ok(Json(serde_json::json!({ "message": "Movie removed from watchlist" })))
}
