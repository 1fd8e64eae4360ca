use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::error::ApiResult;

const PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode=WAL",
    "PRAGMA synchronous=NORMAL",
    // cascade deletes depend on this
    "PRAGMA foreign_keys=ON",
];

pub async fn connect_and_migrate(database_url: &str) -> ApiResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    apply_pragmas(&db).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn apply_pragmas(db: &DatabaseConnection) -> ApiResult<()> {
    for pragma in PRAGMAS {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }
    Ok(())
}
