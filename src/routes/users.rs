use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState, accounts,
    auth::AdminUser,
    error::ApiResult,
    models::{PageQuery, Paginated, PublicUserResponse, UpdateRoleRequest, UserResponse},
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paginated<UserResponse>>> {
    query.validate()?;
    Ok(Json(accounts::list_users(&state.db, query.page, query.page_size).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<UserResponse>> {
    let user = accounts::get_user(&state.db, id).await?;
    Ok(Json(user.into()))
}

pub async fn public_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<PublicUserResponse>> {
    let user = accounts::get_user(&state.db, id).await?;
    Ok(Json(user.into()))
}

pub async fn set_role(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = accounts::set_role(&state.db, admin.0.id, id, req.role).await?;
    Ok(Json(user.into()))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    accounts::delete_user(&state.db, admin.0.id, id).await?;
    Ok(Json(serde_json::json!({ "message": "User deleted successfully" })))
}
