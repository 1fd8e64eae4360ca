pub use sea_orm_migration::prelude::*;

mod m20250810_000001_create_users_movies;
mod m20250811_000001_create_reviews_watchlist;
mod m20250818_000001_create_people;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_users_movies::Migration),
            Box::new(m20250811_000001_create_reviews_watchlist::Migration),
            Box::new(m20250818_000001_create_people::Migration),
        ]
    }
}
