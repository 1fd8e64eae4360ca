//! Per-user watchlists. Entries carry the full rating-annotated movie so the
//! client renders a watchlist page from one call.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set,
};

use crate::{
    catalog,
    entities::{movie, watchlist},
    error::{ApiError, ApiResult},
    models::{MovieResponse, WatchlistResponse},
    reviews,
};

pub async fn user_watchlist(
    db: &DatabaseConnection,
    user_id: i32,
) -> ApiResult<Vec<WatchlistResponse>> {
    let entries = watchlist::Entity::find()
        .filter(watchlist::Column::UserId.eq(user_id))
        .order_by(watchlist::Column::AddedAt, Order::Desc)
        .order_by(watchlist::Column::MovieId, Order::Asc)
        .find_also_related(movie::Entity)
        .all(db)
        .await?;

    let movie_ids: Vec<i32> = entries.iter().map(|(entry, _)| entry.movie_id).collect();
    let stats = reviews::stats_for_movies(db, &movie_ids).await?;

    Ok(entries
        .into_iter()
        .filter_map(|(entry, movie)| {
            let movie = movie?;
            let (average_rating, review_count) =
                stats.get(&entry.movie_id).copied().unwrap_or((None, 0));
            Some(WatchlistResponse {
                movie: MovieResponse::from_model(movie, average_rating, review_count),
                added_at: entry.added_at,
            })
        })
        .collect())
}

pub async fn add_to_watchlist(
    db: &DatabaseConnection,
    user_id: i32,
    movie_id: i32,
) -> ApiResult<()> {
    if !catalog::movie_exists(db, movie_id).await? {
        return Err(ApiError::not_found("Movie not found"));
    }

    let already_listed = watchlist::Entity::find_by_id((user_id, movie_id)).one(db).await?;
    if already_listed.is_some() {
        return Err(ApiError::conflict("Movie is already in your watchlist"));
    }

    let model = watchlist::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie_id),
        added_at: Set(Utc::now()),
    };
    model.insert(db).await?;
    Ok(())
}

pub async fn remove_from_watchlist(
    db: &DatabaseConnection,
    user_id: i32,
    movie_id: i32,
) -> ApiResult<()> {
    let result = watchlist::Entity::delete_by_id((user_id, movie_id)).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Movie not found in your watchlist"));
    }
    Ok(())
}
