use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::AppState;

mod auth;
mod movies;
mod people;
mod reviews;
mod users;
mod watchlist;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health))
        .nest("/auth", auth_routes())
        .nest("/api/movies", movie_routes())
        .nest("/api/people", people_routes())
        .nest("/api/reviews", review_routes())
        .nest("/api/watchlist", watchlist_routes())
        .nest("/api/users", user_routes())
}

async fn health() -> &'static str {
    "cinelog API running"
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile).put(auth::update_profile))
        .route("/change-password", post(auth::change_password))
}

fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route("/{id}", get(movies::get).put(movies::update).delete(movies::delete))
        .route("/{id}/people", get(movies::cast).post(movies::add_cast))
        .route("/{id}/people/{person_id}/{role}", axum::routing::delete(movies::remove_cast))
}

fn people_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(people::list).post(people::create))
        .route("/{id}", get(people::get).put(people::update).delete(people::delete))
        .route("/{id}/movies", get(people::movies))
}

fn review_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(reviews::create))
        .route("/{id}", get(reviews::get).put(reviews::update).delete(reviews::delete))
        .route("/movie/{movie_id}", get(reviews::for_movie))
        .route("/movie/{movie_id}/paginated", get(reviews::for_movie_paginated))
        .route("/movie/{movie_id}/stats", get(reviews::stats))
        .route("/user/{user_id}", get(reviews::for_user))
}

fn watchlist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(watchlist::list).post(watchlist::add))
        .route("/{movie_id}", axum::routing::delete(watchlist::remove))
}

fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(users::list))
        .route("/{id}", get(users::get).delete(users::delete))
        .route("/{id}/public", get(users::public_profile))
        .route("/{id}/role", put(users::set_role))
}
