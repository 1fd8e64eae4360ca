//! Registration, login, profile and credential management, and the admin
//! user-management surface. Token issuing lives in `auth`; everything here
//! works in terms of user rows.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    auth,
    entities::user::{self, UserRole},
    error::{ApiError, ApiResult},
    models::{
        ChangePasswordRequest, LoginRequest, Paginated, RegisterRequest, UpdateProfileRequest,
        UserResponse,
    },
};

const MIN_PASSWORD_LEN: usize = 6;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation("password must be at least 6 characters"));
    }
    Ok(())
}

async fn email_taken(db: &DatabaseConnection, email: &str, exclude: Option<i32>) -> ApiResult<bool> {
    let mut select = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = exclude {
        select = select.filter(user::Column::Id.ne(id));
    }
    Ok(select.count(db).await? > 0)
}

async fn username_taken(
    db: &DatabaseConnection,
    username: &str,
    exclude: Option<i32>,
) -> ApiResult<bool> {
    let mut select = user::Entity::find().filter(user::Column::Username.eq(username));
    if let Some(id) = exclude {
        select = select.filter(user::Column::Id.ne(id));
    }
    Ok(select.count(db).await? > 0)
}

pub async fn register(
    db: &DatabaseConnection,
    bcrypt_cost: u32,
    req: RegisterRequest,
) -> ApiResult<user::Model> {
    let email = normalize_email(&req.email);
    let username = req.username.trim().to_string();
    if email.is_empty() {
        return Err(ApiError::validation("email is required"));
    }
    if username.is_empty() {
        return Err(ApiError::validation("username is required"));
    }
    validate_password(&req.password)?;

    if email_taken(db, &email, None).await? {
        return Err(ApiError::conflict("Email already registered"));
    }
    if username_taken(db, &username, None).await? {
        return Err(ApiError::conflict("Username already taken"));
    }

    let display_name = req
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| username.clone());

    let model = user::ActiveModel {
        email: Set(email),
        username: Set(username),
        display_name: Set(display_name),
        password_hash: Set(auth::hash_password(&req.password, bcrypt_cost)?),
        role: Set(UserRole::User),
        profile_pic_url: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

pub async fn login(db: &DatabaseConnection, req: LoginRequest) -> ApiResult<user::Model> {
    // anything with an @ is an email, otherwise a username
    let user = if req.login.contains('@') {
        user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(&req.login)))
            .one(db)
            .await?
    } else {
        user::Entity::find()
            .filter(user::Column::Username.eq(req.login.trim()))
            .one(db)
            .await?
    };

    // same message for unknown user and wrong password
    let user = user.ok_or_else(|| ApiError::unauthenticated("Invalid credentials"))?;
    if !auth::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::unauthenticated("Invalid credentials"));
    }
    Ok(user)
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> ApiResult<user::Model> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i32,
    req: UpdateProfileRequest,
) -> ApiResult<user::Model> {
    let existing = get_user(db, user_id).await?;

    let new_email = req
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty() && *e != existing.email);
    if let Some(email) = &new_email
        && email_taken(db, email, Some(user_id)).await?
    {
        return Err(ApiError::conflict("Email already registered"));
    }

    let new_username = req
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty() && *u != existing.username)
        .map(str::to_string);
    if let Some(username) = &new_username
        && username_taken(db, username, Some(user_id)).await?
    {
        return Err(ApiError::conflict("Username already taken"));
    }

    let mut model: user::ActiveModel = existing.into();
    if let Some(email) = new_email {
        model.email = Set(email);
    }
    if let Some(username) = new_username {
        model.username = Set(username);
    }
    if let Some(display_name) =
        req.display_name.as_deref().map(str::trim).filter(|d| !d.is_empty())
    {
        model.display_name = Set(display_name.to_string());
    }
    if let Some(profile_pic_url) = req.profile_pic_url {
        model.profile_pic_url = Set(Some(profile_pic_url.trim().to_string()));
    }
    Ok(model.update(db).await?)
}

pub async fn change_password(
    db: &DatabaseConnection,
    user_id: i32,
    bcrypt_cost: u32,
    req: ChangePasswordRequest,
) -> ApiResult<()> {
    let user = get_user(db, user_id).await?;

    if !auth::verify_password(&req.current_password, &user.password_hash)? {
        return Err(ApiError::validation("Current password is incorrect"));
    }
    validate_password(&req.new_password)?;

    let mut model: user::ActiveModel = user.into();
    model.password_hash = Set(auth::hash_password(&req.new_password, bcrypt_cost)?);
    model.update(db).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// admin user management

pub async fn list_users(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
) -> ApiResult<Paginated<UserResponse>> {
    let total_count = user::Entity::find().count(db).await?;
    let offset = (page - 1).saturating_mul(page_size);
    let users = if offset >= total_count {
        Vec::new()
    } else {
        user::Entity::find()
            .order_by(user::Column::Id, Order::Asc)
            .offset(offset)
            .limit(page_size)
            .all(db)
            .await?
    };
    let items = users.into_iter().map(UserResponse::from).collect();
    Ok(Paginated::new(items, page, page_size, total_count))
}

pub async fn set_role(
    db: &DatabaseConnection,
    caller_id: i32,
    target_id: i32,
    role: UserRole,
) -> ApiResult<user::Model> {
    if caller_id == target_id {
        return Err(ApiError::validation("You cannot change your own role"));
    }
    let target = get_user(db, target_id).await?;
    let mut model: user::ActiveModel = target.into();
    model.role = Set(role);
    Ok(model.update(db).await?)
}

pub async fn delete_user(
    db: &DatabaseConnection,
    caller_id: i32,
    target_id: i32,
) -> ApiResult<()> {
    if caller_id == target_id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }
    let result = user::Entity::delete_by_id(target_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(())
}
