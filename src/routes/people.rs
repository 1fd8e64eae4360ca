use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AdminUser,
    error::ApiResult,
    models::{CreatePersonRequest, PersonResponse, PersonWithMoviesResponse, UpdatePersonRequest},
    people,
};

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<PersonResponse>>> {
    Ok(Json(people::list_people(&state.db).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<PersonResponse>> {
    Ok(Json(people::get_person(&state.db, id).await?))
}

pub async fn movies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<PersonWithMoviesResponse>> {
    Ok(Json(people::person_with_movies(&state.db, id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<CreatePersonRequest>,
) -> ApiResult<(StatusCode, Json<PersonResponse>)> {
    let person = people::create_person(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<UpdatePersonRequest>,
) -> ApiResult<Json<PersonResponse>> {
    Ok(Json(people::update_person(&state.db, id, req).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    people::delete_person(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "Person deleted successfully" })))
}
