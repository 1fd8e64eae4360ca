use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState, auth::AdminUser, catalog, entities::movie_person::PersonRole, error::ApiResult,
    models::{
        AddCastMemberRequest, CastMemberResponse, CreateMovieRequest, MovieQuery, MovieResponse,
        Paginated, UpdateMovieRequest,
    },
    people,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieQuery>,
) -> ApiResult<Json<Paginated<MovieResponse>>> {
    Ok(Json(catalog::list_movies(&state.db, &query).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MovieResponse>> {
    Ok(Json(catalog::get_movie(&state.db, id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<CreateMovieRequest>,
) -> ApiResult<(StatusCode, Json<MovieResponse>)> {
    let movie = catalog::create_movie(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<UpdateMovieRequest>,
) -> ApiResult<Json<MovieResponse>> {
    Ok(Json(catalog::update_movie(&state.db, id, req).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    catalog::delete_movie(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "Movie deleted successfully" })))
}

pub async fn cast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<CastMemberResponse>>> {
    Ok(Json(people::movie_cast(&state.db, id).await?))
}

pub async fn add_cast(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<AddCastMemberRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    people::add_cast_member(&state.db, id, req).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "message": "Person added to movie" }))))
}

pub async fn remove_cast(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path((id, person_id, role)): Path<(i32, i32, PersonRole)>,
) -> ApiResult<Json<serde_json::Value>> {
    people::remove_cast_member(&state.db, id, person_id, role).await?;
    Ok(Json(serde_json::json!({ "message": "Person removed from movie" })))
}
