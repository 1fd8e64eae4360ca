#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use cinelog::{
    accounts, catalog,
    entities::user::{self, UserRole},
    models::{CreateMovieRequest, CreateReviewRequest, MovieResponse, RegisterRequest,
        ReviewResponse},
    reviews,
};

/// Lowest cost bcrypt accepts, to keep the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Fresh in-memory database with the full schema applied. A single
/// connection is required: every sqlite `:memory:` connection is its own
/// database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect");
    cinelog::db::apply_pragmas(&db).await.expect("pragmas");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single().expect("valid date")
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    accounts::register(
        db,
        TEST_BCRYPT_COST,
        RegisterRequest {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password: "password1".to_string(),
            display_name: None,
        },
    )
    .await
    .expect("register user")
}

pub async fn seed_admin(db: &DatabaseConnection, username: &str) -> user::Model {
    let created = seed_user(db, username).await;
    let mut model: user::ActiveModel = created.into();
    model.role = Set(UserRole::Admin);
    model.update(db).await.expect("promote to admin")
}

pub fn movie_request(title: &str, year: i32) -> CreateMovieRequest {
    CreateMovieRequest {
        title: title.to_string(),
        description: None,
        release_date: date(year, 6, 15),
        director: None,
        genre: None,
        runtime_minutes: Some(120),
        poster_url: None,
        trailer_url: None,
        screenshots: None,
        revenue: None,
    }
}

pub async fn seed_movie(db: &DatabaseConnection, title: &str, year: i32) -> MovieResponse {
    catalog::create_movie(db, movie_request(title, year)).await.expect("create movie")
}

pub async fn seed_review(
    db: &DatabaseConnection,
    user_id: i32,
    movie_id: i32,
    rating: i32,
) -> ReviewResponse {
    reviews::create_review(
        db,
        user_id,
        CreateReviewRequest { movie_id, rating, review_text: None },
    )
    .await
    .expect("create review")
}

pub fn assert_avg(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("average should be present");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected average {expected}, got {actual}"
    );
}
