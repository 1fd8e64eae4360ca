use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState, accounts,
    auth::{self, AuthUser},
    error::ApiResult,
    models::{
        AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
        UserResponse,
    },
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let user = accounts::register(&state.db, state.config.bcrypt_cost, req).await?;
    let token = auth::issue_token(&state.config, &user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user: user.into(), token })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = accounts::login(&state.db, req).await?;
    let token = auth::issue_token(&state.config, &user)?;
    Ok(Json(AuthResponse { user: user.into(), token }))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = accounts::get_user(&state.db, caller.id).await?;
    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = accounts::update_profile(&state.db, caller.id, req).await?;
    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    accounts::change_password(&state.db, caller.id, state.config.bcrypt_cost, req).await?;
    Ok(Json(serde_json::json!({ "message": "Password changed successfully" })))
}
