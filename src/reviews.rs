//! Review lifecycle: create (one per user per movie), author-only edit,
//! author-or-admin delete, plus the per-movie rating aggregates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::{Expr, Func, SimpleExpr},
};

use crate::{
    auth::AuthUser,
    catalog,
    entities::{movie, review, user},
    error::{ApiError, ApiResult},
    models::{CreateReviewRequest, Paginated, RatingStats, ReviewResponse, UpdateReviewRequest},
};

fn avg_rating() -> SimpleExpr {
    SimpleExpr::from(Func::avg(Expr::col((review::Entity, review::Column::Rating))))
}

#[derive(Debug, FromQueryResult)]
struct ReviewRow {
    id: i32,
    user_id: i32,
    movie_id: i32,
    rating: i32,
    review_text: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    username: String,
    user_display_name: String,
    user_profile_pic_url: Option<String>,
    movie_title: String,
}

impl From<ReviewRow> for ReviewResponse {
    fn from(row: ReviewRow) -> Self {
        ReviewResponse {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            user_display_name: row.user_display_name,
            user_profile_pic_url: row.user_profile_pic_url,
            movie_id: row.movie_id,
            movie_title: row.movie_title,
            rating: row.rating,
            review_text: row.review_text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Reviews joined with their author and movie, newest first.
fn reviews_with_context() -> sea_orm::Select<review::Entity> {
    review::Entity::find()
        .select_only()
        .columns([
            review::Column::Id,
            review::Column::UserId,
            review::Column::MovieId,
            review::Column::Rating,
            review::Column::ReviewText,
            review::Column::CreatedAt,
            review::Column::UpdatedAt,
        ])
        .column_as(user::Column::Username, "username")
        .column_as(user::Column::DisplayName, "user_display_name")
        .column_as(user::Column::ProfilePicUrl, "user_profile_pic_url")
        .column_as(movie::Column::Title, "movie_title")
        .join(JoinType::InnerJoin, review::Relation::User.def())
        .join(JoinType::InnerJoin, review::Relation::Movie.def())
        .order_by(review::Column::CreatedAt, Order::Desc)
        .order_by(review::Column::Id, Order::Desc)
}

pub async fn movie_reviews(
    db: &DatabaseConnection,
    movie_id: i32,
) -> ApiResult<Vec<ReviewResponse>> {
    let rows = reviews_with_context()
        .filter(review::Column::MovieId.eq(movie_id))
        .into_model::<ReviewRow>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ReviewResponse::from).collect())
}

pub async fn movie_reviews_paginated(
    db: &DatabaseConnection,
    movie_id: i32,
    page: u64,
    page_size: u64,
) -> ApiResult<Paginated<ReviewResponse>> {
    let total_count = review::Entity::find()
        .filter(review::Column::MovieId.eq(movie_id))
        .count(db)
        .await?;
    let offset = (page - 1).saturating_mul(page_size);
    let rows = if offset >= total_count {
        Vec::new()
    } else {
        reviews_with_context()
            .filter(review::Column::MovieId.eq(movie_id))
            .offset(offset)
            .limit(page_size)
            .into_model::<ReviewRow>()
            .all(db)
            .await?
    };
    let reviews = rows.into_iter().map(ReviewResponse::from).collect();
    Ok(Paginated::new(reviews, page, page_size, total_count))
}

pub async fn user_reviews(
    db: &DatabaseConnection,
    user_id: i32,
) -> ApiResult<Vec<ReviewResponse>> {
    let rows = reviews_with_context()
        .filter(review::Column::UserId.eq(user_id))
        .into_model::<ReviewRow>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ReviewResponse::from).collect())
}

pub async fn get_review(db: &DatabaseConnection, id: i32) -> ApiResult<ReviewResponse> {
    let row = reviews_with_context()
        .filter(review::Column::Id.eq(id))
        .into_model::<ReviewRow>()
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;
    Ok(row.into())
}

fn validate_rating(rating: i32) -> ApiResult<()> {
    if !(1..=10).contains(&rating) {
        return Err(ApiError::validation("rating must be between 1 and 10"));
    }
    Ok(())
}

pub async fn create_review(
    db: &DatabaseConnection,
    user_id: i32,
    req: CreateReviewRequest,
) -> ApiResult<ReviewResponse> {
    validate_rating(req.rating)?;

    if !catalog::movie_exists(db, req.movie_id).await? {
        return Err(ApiError::not_found("Movie not found"));
    }

    let already_reviewed = review::Entity::find()
        .filter(review::Column::UserId.eq(user_id))
        .filter(review::Column::MovieId.eq(req.movie_id))
        .count(db)
        .await?
        > 0;
    if already_reviewed {
        return Err(ApiError::conflict("You have already reviewed this movie"));
    }

    let model = review::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(req.movie_id),
        rating: Set(req.rating),
        review_text: Set(req.review_text.map(|t| t.trim().to_string())),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    get_review(db, created.id).await
}

pub async fn update_review(
    db: &DatabaseConnection,
    caller: &AuthUser,
    review_id: i32,
    req: UpdateReviewRequest,
) -> ApiResult<ReviewResponse> {
    let existing = review::Entity::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    // author only; admins get no edit override
    if existing.user_id != caller.id {
        return Err(ApiError::forbidden("You can only edit your own reviews"));
    }

    let mut model: review::ActiveModel = existing.into();
    if let Some(rating) = req.rating {
        validate_rating(rating)?;
        model.rating = Set(rating);
    }
    if let Some(text) = req.review_text {
        model.review_text = Set(Some(text.trim().to_string()));
    }
    model.updated_at = Set(Some(Utc::now()));
    let updated = model.update(db).await?;
    get_review(db, updated.id).await
}

pub async fn delete_review(
    db: &DatabaseConnection,
    caller: &AuthUser,
    review_id: i32,
) -> ApiResult<()> {
    let existing = review::Entity::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    if !caller.is_admin() && existing.user_id != caller.id {
        return Err(ApiError::forbidden("You can only delete your own reviews"));
    }

    review::Entity::delete_by_id(review_id).exec(db).await?;
    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct StatsRow {
    average_rating: Option<f64>,
    review_count: i64,
}

pub async fn rating_stats(db: &DatabaseConnection, movie_id: i32) -> ApiResult<RatingStats> {
    if !catalog::movie_exists(db, movie_id).await? {
        return Err(ApiError::not_found("Movie not found"));
    }

    let row = review::Entity::find()
        .select_only()
        .column_as(avg_rating(), "average_rating")
        .column_as(review::Column::Id.count(), "review_count")
        .filter(review::Column::MovieId.eq(movie_id))
        .into_model::<StatsRow>()
        .one(db)
        .await?;

    let (average_rating, review_count) =
        row.map(|r| (r.average_rating, r.review_count)).unwrap_or((None, 0));
    Ok(RatingStats { movie_id, average_rating, review_count })
}

#[derive(Debug, FromQueryResult)]
struct MovieStatsRow {
    movie_id: i32,
    average_rating: Option<f64>,
    review_count: i64,
}

/// Aggregates for a set of movies in one query, keyed by movie id. Movies
/// with no reviews are simply absent from the map.
pub async fn stats_for_movies(
    db: &DatabaseConnection,
    movie_ids: &[i32],
) -> ApiResult<HashMap<i32, (Option<f64>, i64)>> {
    if movie_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = review::Entity::find()
        .select_only()
        .column(review::Column::MovieId)
        .column_as(avg_rating(), "average_rating")
        .column_as(review::Column::Id.count(), "review_count")
        .filter(review::Column::MovieId.is_in(movie_ids.iter().copied()))
        .group_by(review::Column::MovieId)
        .into_model::<MovieStatsRow>()
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| (r.movie_id, (r.average_rating, r.review_count))).collect())
}
