mod common;

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Set};

use cinelog::{
    catalog,
    entities::movie,
    error::ApiError,
    models::{MovieQuery, MovieSortBy, SortDirection, UpdateMovieRequest},
};

use common::*;

#[tokio::test]
async fn empty_catalog_lists_nothing() {
    let db = setup_db().await;
    let page = catalog::list_movies(&db, &MovieQuery::default()).await.expect("list");
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 0);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn total_count_reflects_filters() {
    let db = setup_db().await;
    for (title, genre) in [("Alien", Some("Sci-Fi")), ("Blade Runner", Some("Sci-Fi")), ("Heat", Some("Crime"))] {
        let mut req = movie_request(title, 1990);
        req.genre = genre.map(str::to_string);
        catalog::create_movie(&db, req).await.expect("create");
    }

    let query = MovieQuery { genre: Some("sci-fi".to_string()), ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|m| m.genre.as_deref() == Some("Sci-Fi")));
}

#[tokio::test]
async fn pages_concatenate_to_the_full_ordered_set() {
    let db = setup_db().await;
    for (i, title) in ["Alpha", "Bravo", "Charlie", "Delta", "Echo"].iter().enumerate() {
        seed_movie(&db, title, 2000 + i as i32).await;
    }

    let mut seen = Vec::new();
    for page_no in 1..=3 {
        let query = MovieQuery {
            page: page_no,
            page_size: 2,
            sort_by: MovieSortBy::Title,
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        let page = catalog::list_movies(&db, &query).await.expect("list");
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 3);
        seen.extend(page.items.into_iter().map(|m| m.title));
    }
    assert_eq!(seen, ["Alpha", "Bravo", "Charlie", "Delta", "Echo"]);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let db = setup_db().await;
    seed_movie(&db, "Solaris", 1972).await;

    let query = MovieQuery { page: 5, page_size: 10, ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 1);
    assert!(page.has_previous_page);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn huge_page_numbers_return_an_empty_page() {
    let db = setup_db().await;
    seed_movie(&db, "Solaris", 1972).await;

    let query = MovieQuery { page: u64::MAX, page_size: 10, ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 1);
    assert!(page.has_previous_page);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn schema_rejects_duplicates_that_bypass_the_service_guard() {
    let db = setup_db().await;
    seed_movie(&db, "Dune", 2021).await;

    // straight entity insert, as a losing concurrent request would issue:
    // different case, later the same calendar day
    let dup = movie::ActiveModel {
        title: Set("DUNE".to_string()),
        release_date: Set(date(2021, 6, 15) + Duration::hours(10)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let err = dup.insert(&db).await.unwrap_err();
    assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
}

#[tokio::test]
async fn rating_sort_puts_unreviewed_movies_last() {
    let db = setup_db().await;
    let good = seed_movie(&db, "Good", 2001).await;
    let great = seed_movie(&db, "Great", 2002).await;
    let unseen = seed_movie(&db, "Unseen", 2003).await;

    let alice = seed_user(&db, "alice").await;
    seed_review(&db, alice.id, good.id, 7).await;
    seed_review(&db, alice.id, great.id, 9).await;

    let query = MovieQuery {
        sort_by: MovieSortBy::Rating,
        sort_direction: SortDirection::Descending,
        ..Default::default()
    };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    let ids: Vec<i32> = page.items.iter().map(|m| m.id).collect();
    assert_eq!(ids, [great.id, good.id, unseen.id]);
}

#[tokio::test]
async fn equal_ratings_tie_break_on_movie_id() {
    let db = setup_db().await;
    let first = seed_movie(&db, "First", 2001).await;
    let second = seed_movie(&db, "Second", 2002).await;

    let alice = seed_user(&db, "alice").await;
    seed_review(&db, alice.id, first.id, 8).await;
    seed_review(&db, alice.id, second.id, 8).await;

    let query = MovieQuery {
        sort_by: MovieSortBy::Rating,
        sort_direction: SortDirection::Descending,
        ..Default::default()
    };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    let ids: Vec<i32> = page.items.iter().map(|m| m.id).collect();
    assert_eq!(ids, [first.id, second.id]);
}

#[tokio::test]
async fn listing_carries_rating_aggregates() {
    let db = setup_db().await;
    let movie = seed_movie(&db, "Inception", 2010).await;
    assert_eq!(movie.average_rating, None);
    assert_eq!(movie.review_count, 0);

    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    seed_review(&db, alice.id, movie.id, 7).await;
    seed_review(&db, bob.id, movie.id, 9).await;

    let fetched = catalog::get_movie(&db, movie.id).await.expect("get");
    assert_avg(fetched.average_rating, 8.0);
    assert_eq!(fetched.review_count, 2);
}

#[tokio::test]
async fn duplicate_title_on_same_day_conflicts() {
    let db = setup_db().await;
    seed_movie(&db, "Dune", 2021).await;

    // case differs, same calendar day
    let err = catalog::create_movie(&db, movie_request("DUNE", 2021)).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");

    // same title a year apart is a different movie
    catalog::create_movie(&db, movie_request("Dune", 1984)).await.expect("remake");
}

#[tokio::test]
async fn search_matches_title_substring_case_insensitively() {
    let db = setup_db().await;
    let movie = seed_movie(&db, "Inception", 2010).await;
    seed_movie(&db, "Heat", 1995).await;

    let query = MovieQuery { search: Some("iNCep".to_string()), ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, movie.id);
}

#[tokio::test]
async fn search_treats_wildcard_characters_literally() {
    let db = setup_db().await;
    let percent = seed_movie(&db, "100% Wolf", 2020).await;
    seed_movie(&db, "Wolf", 2021).await;

    let query = MovieQuery { search: Some("100%".to_string()), ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, percent.id);

    let query = MovieQuery { search: Some("_".to_string()), ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn year_filter_spans_the_whole_year() {
    let db = setup_db().await;
    let mut req = movie_request("New Year", 2010);
    req.release_date = date(2010, 1, 1);
    catalog::create_movie(&db, req).await.expect("create");
    let mut req = movie_request("Year's End", 2010);
    req.release_date = date(2010, 12, 31);
    catalog::create_movie(&db, req).await.expect("create");
    seed_movie(&db, "Elsewhere", 2011).await;

    let query = MovieQuery { year: Some(2010), ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn director_filter_is_substring() {
    let db = setup_db().await;
    let mut req = movie_request("Memento", 2000);
    req.director = Some("Christopher Nolan".to_string());
    let memento = catalog::create_movie(&db, req).await.expect("create");
    seed_movie(&db, "Heat", 1995).await;

    let query = MovieQuery { director: Some("nolan".to_string()), ..Default::default() };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, memento.id);
}

#[tokio::test]
async fn blank_filters_are_ignored() {
    let db = setup_db().await;
    seed_movie(&db, "Solaris", 1972).await;

    let query = MovieQuery {
        search: Some("   ".to_string()),
        genre: Some(String::new()),
        ..Default::default()
    };
    let page = catalog::list_movies(&db, &query).await.expect("list");
    assert_eq!(page.total_count, 1);
}

#[tokio::test]
async fn invalid_query_is_rejected() {
    let db = setup_db().await;
    let query = MovieQuery { page_size: 500, ..Default::default() };
    let err = catalog::list_movies(&db, &query).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let db = setup_db().await;
    let movie = seed_movie(&db, "Blade Runner", 1982).await;

    let req = UpdateMovieRequest {
        genre: Some("Sci-Fi".to_string()),
        revenue: Some(33_800_000),
        ..Default::default()
    };
    let updated = catalog::update_movie(&db, movie.id, req).await.expect("update");
    assert_eq!(updated.title, "Blade Runner");
    assert_eq!(updated.genre.as_deref(), Some("Sci-Fi"));
    assert_eq!(updated.revenue, Some(33_800_000));
    assert_eq!(updated.runtime_minutes, movie.runtime_minutes);
}

#[tokio::test]
async fn delete_then_fetch_is_not_found() {
    let db = setup_db().await;
    let movie = seed_movie(&db, "Stalker", 1979).await;

    catalog::delete_movie(&db, movie.id).await.expect("delete");
    let err = catalog::get_movie(&db, movie.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {err:?}");
    let err = catalog::delete_movie(&db, movie.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {err:?}");
}
