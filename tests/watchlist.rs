mod common;

use cinelog::{
    accounts, catalog,
    entities::movie_person::PersonRole,
    error::ApiError,
    models::{AddCastMemberRequest, CreatePersonRequest},
    people, reviews, watchlist,
};

use common::*;

#[tokio::test]
async fn watchlist_round_trip() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    let movie = seed_movie(&db, "Dune", 2021).await;

    watchlist::add_to_watchlist(&db, alice.id, movie.id).await.expect("add");

    let listed = watchlist::user_watchlist(&db, alice.id).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].movie.id, movie.id);

    watchlist::remove_from_watchlist(&db, alice.id, movie.id).await.expect("remove");
    let listed = watchlist::user_watchlist(&db, alice.id).await.expect("list");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn duplicate_add_conflicts() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    let movie = seed_movie(&db, "Dune", 2021).await;

    watchlist::add_to_watchlist(&db, alice.id, movie.id).await.expect("add");
    let err = watchlist::add_to_watchlist(&db, alice.id, movie.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_movie_and_missing_entry_are_not_found() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    let movie = seed_movie(&db, "Dune", 2021).await;

    let err = watchlist::add_to_watchlist(&db, alice.id, 999).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {err:?}");

    let err = watchlist::remove_from_watchlist(&db, alice.id, movie.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn entries_carry_rating_aggregates() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let movie = seed_movie(&db, "Dune", 2021).await;

    seed_review(&db, alice.id, movie.id, 7).await;
    seed_review(&db, bob.id, movie.id, 9).await;
    watchlist::add_to_watchlist(&db, alice.id, movie.id).await.expect("add");

    let listed = watchlist::user_watchlist(&db, alice.id).await.expect("list");
    assert_avg(listed[0].movie.average_rating, 8.0);
    assert_eq!(listed[0].movie.review_count, 2);
}

#[tokio::test]
async fn watchlists_are_per_user() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let dune = seed_movie(&db, "Dune", 2021).await;
    let heat = seed_movie(&db, "Heat", 1995).await;

    watchlist::add_to_watchlist(&db, alice.id, dune.id).await.expect("add");
    watchlist::add_to_watchlist(&db, bob.id, heat.id).await.expect("add");

    let alices = watchlist::user_watchlist(&db, alice.id).await.expect("list");
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].movie.id, dune.id);
}

#[tokio::test]
async fn deleting_a_movie_cascades_to_dependents() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    let doomed = seed_movie(&db, "Doomed", 2020).await;
    let kept = seed_movie(&db, "Kept", 2021).await;

    seed_review(&db, alice.id, doomed.id, 5).await;
    let kept_review = seed_review(&db, alice.id, kept.id, 9).await;
    watchlist::add_to_watchlist(&db, alice.id, doomed.id).await.expect("add");
    watchlist::add_to_watchlist(&db, alice.id, kept.id).await.expect("add");

    let person = people::create_person(
        &db,
        CreatePersonRequest {
            name: "Some Director".to_string(),
            biography: None,
            birth_date: None,
            photo_url: None,
        },
    )
    .await
    .expect("person");
    people::add_cast_member(
        &db,
        doomed.id,
        AddCastMemberRequest {
            person_id: person.id,
            role: PersonRole::Director,
            character_name: None,
            billing_order: None,
        },
    )
    .await
    .expect("cast");

    catalog::delete_movie(&db, doomed.id).await.expect("delete");

    // dependents of the deleted movie are gone, everything else survives
    let listed = watchlist::user_watchlist(&db, alice.id).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].movie.id, kept.id);

    let remaining = reviews::user_reviews(&db, alice.id).await.expect("reviews");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept_review.id);

    let credits = people::person_with_movies(&db, person.id).await.expect("credits");
    assert!(credits.movies.is_empty());
}

#[tokio::test]
async fn deleting_a_user_cascades_to_their_activity() {
    let db = setup_db().await;
    let admin = seed_admin(&db, "root").await;
    let alice = seed_user(&db, "alice").await;
    let movie = seed_movie(&db, "Dune", 2021).await;

    seed_review(&db, alice.id, movie.id, 8).await;
    watchlist::add_to_watchlist(&db, alice.id, movie.id).await.expect("add");

    accounts::delete_user(&db, admin.id, alice.id).await.expect("delete");

    let stats = reviews::rating_stats(&db, movie.id).await.expect("stats");
    assert_eq!(stats.review_count, 0);
    let fetched = catalog::get_movie(&db, movie.id).await.expect("movie survives");
    assert_eq!(fetched.id, movie.id);
}
