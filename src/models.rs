use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{movie, movie_person::PersonRole, person, user, user::UserRole},
    error::{ApiError, ApiResult},
};

// ---------------------------------------------------------------------------
// auth / users

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or username; anything containing `@` is treated as an email.
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub profile_pic_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
    pub profile_pic_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            display_name: u.display_name,
            role: u.role,
            profile_pic_url: u.profile_pic_url,
            created_at: u.created_at,
        }
    }
}

/// Public profile: everything an anonymous visitor may see. No email.
#[derive(Debug, Serialize)]
pub struct PublicUserResponse {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
    pub profile_pic_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for PublicUserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            display_name: u.display_name,
            role: u.role,
            profile_pic_url: u.profile_pic_url,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

// ---------------------------------------------------------------------------
// movies

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: Option<String>,
    pub release_date: DateTime<Utc>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub screenshots: Option<Vec<String>>,
    pub revenue: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub screenshots: Option<Vec<String>>,
    pub revenue: Option<i64>,
}

/// Movie annotated with its review aggregates; every read path returns this
/// shape so clients never have to fetch rating stats separately.
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_date: DateTime<Utc>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub screenshots: Option<Vec<String>>,
    pub revenue: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

impl MovieResponse {
    pub fn from_model(m: movie::Model, average_rating: Option<f64>, review_count: i64) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            release_date: m.release_date,
            director: m.director,
            genre: m.genre,
            runtime_minutes: m.runtime_minutes,
            poster_url: m.poster_url,
            trailer_url: m.trailer_url,
            screenshots: m.screenshots.map(|s| s.0),
            revenue: m.revenue,
            created_at: m.created_at,
            average_rating,
            review_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieSortBy {
    #[default]
    CreatedDate,
    Rating,
    ReviewCount,
    ReleaseDate,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovieQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub page: u64,
    pub page_size: u64,
    pub sort_by: MovieSortBy,
    pub sort_direction: SortDirection,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            search: None,
            genre: None,
            director: None,
            year: None,
            page: 1,
            page_size: 10,
            sort_by: MovieSortBy::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl MovieQuery {
    pub fn validate(&self) -> ApiResult<()> {
        if self.page < 1 {
            return Err(ApiError::validation("page must be at least 1"));
        }
        if !(1..=100).contains(&self.page_size) {
            return Err(ApiError::validation("page_size must be between 1 and 100"));
        }
        if let Some(year) = self.year
            && !(1..=9999).contains(&year)
        {
            return Err(ApiError::validation("year must be a four-digit year"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// pagination envelope

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, page_size: 10 }
    }
}

impl PageQuery {
    pub fn validate(&self) -> ApiResult<()> {
        if self.page < 1 {
            return Err(ApiError::validation("page must be at least 1"));
        }
        if !(1..=100).contains(&self.page_size) {
            return Err(ApiError::validation("page_size must be between 1 and 100"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> Paginated<T> {
    /// `page_size` must already be validated to be >= 1.
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(page_size);
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// people / cast & crew

#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePersonRequest {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub id: i32,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<person::Model> for PersonResponse {
    fn from(p: person::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            biography: p.biography,
            birth_date: p.birth_date,
            photo_url: p.photo_url,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieCredit {
    pub movie_id: i32,
    pub movie_title: String,
    pub role: PersonRole,
    pub character_name: Option<String>,
    pub release_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PersonWithMoviesResponse {
    pub person: PersonResponse,
    pub movies: Vec<MovieCredit>,
}

#[derive(Debug, Deserialize)]
pub struct AddCastMemberRequest {
    pub person_id: i32,
    pub role: PersonRole,
    pub character_name: Option<String>,
    pub billing_order: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CastMemberResponse {
    pub person_id: i32,
    pub person_name: String,
    pub role: PersonRole,
    pub character_name: Option<String>,
    pub billing_order: Option<i32>,
}

// ---------------------------------------------------------------------------
// reviews

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub movie_id: i32,
    pub rating: i32,
    pub review_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub review_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub user_display_name: String,
    pub user_profile_pic_url: Option<String>,
    pub movie_id: i32,
    pub movie_title: String,
    pub rating: i32,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct RatingStats {
    pub movie_id: i32,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

// ---------------------------------------------------------------------------
// watchlist

#[derive(Debug, Deserialize)]
pub struct AddToWatchlistRequest {
    pub movie_id: i32,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub movie: MovieResponse,
    pub added_at: DateTime<Utc>,
}
