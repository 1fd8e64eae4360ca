use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email))
                    .col(string(Users::Username))
                    .col(string(Users::DisplayName))
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 16))
                    .col(string_null(Users::ProfilePicUrl))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email_unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_username_unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(string_null(Movies::Description))
                    .col(timestamp_with_time_zone(Movies::ReleaseDate))
                    .col(string_null(Movies::Director))
                    .col(string_null(Movies::Genre))
                    .col(integer_null(Movies::RuntimeMinutes))
                    .col(string_null(Movies::PosterUrl))
                    .col(string_null(Movies::TrailerUrl))
                    .col(json_null(Movies::Screenshots))
                    .col(big_integer_null(Movies::Revenue))
                    .col(timestamp_with_time_zone(Movies::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // backstop for the application-level duplicate check, normalized the
        // same way the service normalizes: lowercased title, calendar day
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_movies_title_release_unique \
                 ON movies (lower(title), date(release_date))",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    DisplayName,
    PasswordHash,
    Role,
    ProfilePicUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Description,
    ReleaseDate,
    Director,
    Genre,
    RuntimeMinutes,
    PosterUrl,
    TrailerUrl,
    Screenshots,
    Revenue,
    CreatedAt,
}
