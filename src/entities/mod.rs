pub mod movie;
pub mod movie_person;
pub mod person;
pub mod review;
pub mod user;
pub mod watchlist;
