use std::sync::Arc;

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    config::Config,
    entities::user::{self, UserRole},
    error::{ApiError, ApiResult},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(password: &str, cost: u32) -> ApiResult<String> {
    Ok(bcrypt::hash(password, cost).map_err(anyhow::Error::new)?)
}

pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    Ok(bcrypt::verify(password, hash).map_err(anyhow::Error::new)?)
}

pub fn issue_token(config: &Config, user: &user::Model) -> ApiResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        role: user.role,
        iat: now.timestamp(),
        exp: (now + Duration::days(config.jwt_ttl_days)).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(config.jwt_secret.as_bytes()))
        .map_err(|e| ApiError::Internal(e.into()))
}

pub fn decode_token(secret: &str, token: &str) -> ApiResult<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| ApiError::unauthenticated("Invalid or expired token"))
}

/// The authenticated caller, decoded from the bearer token. Only the claim
/// pair survives; handlers that need the full user row load it themselves.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::unauthenticated("Missing bearer token"))?;
        let claims = decode_token(&state.config.jwt_secret, bearer.token())?;
        Ok(AuthUser { id: claims.sub, role: claims.role })
    }
}

/// Admin gate layered on top of [`AuthUser`].
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(AdminUser(user))
    }
}
