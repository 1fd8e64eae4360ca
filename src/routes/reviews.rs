use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiResult,
    models::{
        CreateReviewRequest, PageQuery, Paginated, RatingStats, ReviewResponse,
        UpdateReviewRequest,
    },
    reviews,
};

pub async fn create(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewResponse>)> {
    let review = reviews::create_review(&state.db, caller.id, req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ReviewResponse>> {
    Ok(Json(reviews::get_review(&state.db, id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i32>,
    Json(req): Json<UpdateReviewRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    Ok(Json(reviews::update_review(&state.db, &caller, id, req).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    reviews::delete_review(&state.db, &caller, id).await?;
    Ok(Json(serde_json::json!({ "message": "Review deleted successfully" })))
}

pub async fn for_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    Ok(Json(reviews::movie_reviews(&state.db, movie_id).await?))
}

pub async fn for_movie_paginated(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paginated<ReviewResponse>>> {
    query.validate()?;
    Ok(Json(
        reviews::movie_reviews_paginated(&state.db, movie_id, query.page, query.page_size).await?,
    ))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<RatingStats>> {
    Ok(Json(reviews::rating_stats(&state.db, movie_id).await?))
}

pub async fn for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    Ok(Json(reviews::user_reviews(&state.db, user_id).await?))
}
