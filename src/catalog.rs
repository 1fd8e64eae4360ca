//! Movie CRUD and the filtered, rating-annotated listing pipeline.
//!
//! Filtering, the review join/aggregation, ordering and pagination are all
//! pushed down into the store; nothing materializes the full filtered set in
//! memory. Every ordering carries movie id ascending as the final tie-break,
//! so pages are stable and concatenating them reproduces the filtered set
//! exactly once.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

use crate::{
    entities::{
        movie::{self, Screenshots},
        review,
    },
    error::{ApiError, ApiResult},
    models::{
        CreateMovieRequest, MovieQuery, MovieResponse, MovieSortBy, Paginated, SortDirection,
        UpdateMovieRequest,
    },
};

#[derive(Debug, FromQueryResult)]
pub struct MovieRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_date: DateTime<Utc>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub screenshots: Option<Screenshots>,
    pub revenue: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

impl From<MovieRow> for MovieResponse {
    fn from(row: MovieRow) -> Self {
        MovieResponse {
            id: row.id,
            title: row.title,
            description: row.description,
            release_date: row.release_date,
            director: row.director,
            genre: row.genre,
            runtime_minutes: row.runtime_minutes,
            poster_url: row.poster_url,
            trailer_url: row.trailer_url,
            screenshots: row.screenshots.map(|s| s.0),
            revenue: row.revenue,
            created_at: row.created_at,
            average_rating: row.average_rating,
            review_count: row.review_count,
        }
    }
}

fn lower(col: movie::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((movie::Entity, col))))
}

// LIKE has no escape character unless one is declared, so wildcard bytes in
// user input would otherwise act as wildcards.
fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn contains_pattern(input: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(input))).escape('\\')
}

fn avg_rating() -> SimpleExpr {
    SimpleExpr::from(Func::avg(Expr::col((review::Entity, review::Column::Rating))))
}

fn review_count() -> SimpleExpr {
    Expr::col((review::Entity, review::Column::Id)).count()
}

fn year_bounds(year: i32) -> ApiResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ApiError::validation("year is out of range"))?;
    let end = Utc
        .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ApiError::validation("year is out of range"))?;
    Ok((start, end))
}

/// All active filters, combined conjunctively. Blank strings disable the
/// corresponding filter rather than matching nothing.
fn filter_condition(query: &MovieQuery) -> ApiResult<Condition> {
    let mut cond = Condition::all();

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cond = cond.add(lower(movie::Column::Title).like(contains_pattern(&search.to_lowercase())));
    }
    if let Some(genre) = query.genre.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cond = cond.add(lower(movie::Column::Genre).eq(genre.to_lowercase()));
    }
    if let Some(director) = query.director.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cond =
            cond.add(lower(movie::Column::Director).like(contains_pattern(&director.to_lowercase())));
    }
    if let Some(year) = query.year {
        let (start, end) = year_bounds(year)?;
        cond = cond
            .add(movie::Column::ReleaseDate.gte(start))
            .add(movie::Column::ReleaseDate.lt(end));
    }

    Ok(cond)
}

/// Base select: movies left-joined against their reviews, grouped per movie,
/// annotated with `average_rating` (null when unreviewed) and `review_count`.
fn movies_with_stats() -> sea_orm::Select<movie::Entity> {
    movie::Entity::find()
        .select_only()
        .columns([
            movie::Column::Id,
            movie::Column::Title,
            movie::Column::Description,
            movie::Column::ReleaseDate,
            movie::Column::Director,
            movie::Column::Genre,
            movie::Column::RuntimeMinutes,
            movie::Column::PosterUrl,
            movie::Column::TrailerUrl,
            movie::Column::Screenshots,
            movie::Column::Revenue,
            movie::Column::CreatedAt,
        ])
        .column_as(avg_rating(), "average_rating")
        .column_as(review_count(), "review_count")
        .join(JoinType::LeftJoin, movie::Relation::Reviews.def())
        .group_by(movie::Column::Id)
}

pub async fn list_movies(
    db: &DatabaseConnection,
    query: &MovieQuery,
) -> ApiResult<Paginated<MovieResponse>> {
    query.validate()?;
    let cond = filter_condition(query)?;

    // total before pagination, over the same filters
    let total_count = movie::Entity::find().filter(cond.clone()).count(db).await?;

    let order = match query.sort_direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    };
    let mut select = movies_with_stats().filter(cond);
    select = match query.sort_by {
        MovieSortBy::CreatedDate => select.order_by(movie::Column::CreatedAt, order),
        MovieSortBy::Rating => select.order_by(avg_rating(), order),
        MovieSortBy::ReviewCount => select.order_by(review_count(), order),
        MovieSortBy::ReleaseDate => select.order_by(movie::Column::ReleaseDate, order),
        MovieSortBy::Title => select.order_by(movie::Column::Title, order),
    };
    select = select.order_by(movie::Column::Id, Order::Asc);

    // saturate rather than overflow on absurd page numbers; any offset at or
    // past the filtered count yields an empty page without touching the store
    let offset = (query.page - 1).saturating_mul(query.page_size);
    let rows = if offset >= total_count {
        Vec::new()
    } else {
        select.offset(offset).limit(query.page_size).into_model::<MovieRow>().all(db).await?
    };

    let movies = rows.into_iter().map(MovieResponse::from).collect();
    Ok(Paginated::new(movies, query.page, query.page_size, total_count))
}

pub async fn get_movie(db: &DatabaseConnection, id: i32) -> ApiResult<MovieResponse> {
    let row = movies_with_stats()
        .filter(movie::Column::Id.eq(id))
        .into_model::<MovieRow>()
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;
    Ok(row.into())
}

pub async fn movie_exists(db: &DatabaseConnection, id: i32) -> ApiResult<bool> {
    let count = movie::Entity::find().filter(movie::Column::Id.eq(id)).count(db).await?;
    Ok(count > 0)
}

/// Duplicate guard: same lowercased title on the same calendar day.
async fn duplicate_exists(
    db: &DatabaseConnection,
    title: &str,
    release_date: DateTime<Utc>,
) -> ApiResult<bool> {
    let day_start = release_date.date_naive().and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + Duration::days(1);
    let count = movie::Entity::find()
        .filter(lower(movie::Column::Title).eq(title.to_lowercase()))
        .filter(movie::Column::ReleaseDate.gte(day_start))
        .filter(movie::Column::ReleaseDate.lt(day_end))
        .count(db)
        .await?;
    Ok(count > 0)
}

fn trimmed(s: String) -> String {
    s.trim().to_string()
}

pub async fn create_movie(
    db: &DatabaseConnection,
    req: CreateMovieRequest,
) -> ApiResult<MovieResponse> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    if duplicate_exists(db, &title, req.release_date).await? {
        return Err(ApiError::conflict(
            "A movie with this title and release date already exists",
        ));
    }

    let model = movie::ActiveModel {
        title: Set(title),
        description: Set(req.description.map(trimmed)),
        release_date: Set(req.release_date),
        director: Set(req.director.map(trimmed)),
        genre: Set(req.genre.map(trimmed)),
        runtime_minutes: Set(req.runtime_minutes),
        poster_url: Set(req.poster_url.map(trimmed)),
        trailer_url: Set(req.trailer_url.map(trimmed)),
        screenshots: Set(req.screenshots.map(Screenshots)),
        revenue: Set(req.revenue),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    get_movie(db, created.id).await
}

pub async fn update_movie(
    db: &DatabaseConnection,
    id: i32,
    req: UpdateMovieRequest,
) -> ApiResult<MovieResponse> {
    let existing = movie::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;

    let mut model: movie::ActiveModel = existing.into();
    if let Some(title) = req.title.map(trimmed).filter(|t| !t.is_empty()) {
        model.title = Set(title);
    }
    if let Some(description) = req.description {
        model.description = Set(Some(description.trim().to_string()));
    }
    if let Some(release_date) = req.release_date {
        model.release_date = Set(release_date);
    }
    if let Some(director) = req.director {
        model.director = Set(Some(director.trim().to_string()));
    }
    if let Some(genre) = req.genre {
        model.genre = Set(Some(genre.trim().to_string()));
    }
    if let Some(runtime_minutes) = req.runtime_minutes {
        model.runtime_minutes = Set(Some(runtime_minutes));
    }
    if let Some(poster_url) = req.poster_url {
        model.poster_url = Set(Some(poster_url.trim().to_string()));
    }
    if let Some(trailer_url) = req.trailer_url {
        model.trailer_url = Set(Some(trailer_url.trim().to_string()));
    }
    if let Some(screenshots) = req.screenshots {
        model.screenshots = Set(Some(Screenshots(screenshots)));
    }
    if let Some(revenue) = req.revenue {
        model.revenue = Set(Some(revenue));
    }
    let updated = model.update(db).await?;
    get_movie(db, updated.id).await
}

pub async fn delete_movie(db: &DatabaseConnection, id: i32) -> ApiResult<()> {
    let result = movie::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Movie not found"));
    }
    Ok(())
}
