use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(People::Table)
                    .if_not_exists()
                    .col(pk_auto(People::Id))
                    .col(string(People::Name))
                    .col(string_null(People::Biography))
                    .col(timestamp_with_time_zone_null(People::BirthDate))
                    .col(string_null(People::PhotoUrl))
                    .col(timestamp_with_time_zone(People::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_people_name_unique")
                    .table(People::Table)
                    .col(People::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoviePeople::Table)
                    .if_not_exists()
                    .col(integer(MoviePeople::MovieId))
                    .col(integer(MoviePeople::PersonId))
                    .col(integer(MoviePeople::Role))
                    .col(string_null(MoviePeople::CharacterName))
                    .col(integer_null(MoviePeople::BillingOrder))
                    .primary_key(
                        Index::create()
                            .col(MoviePeople::MovieId)
                            .col(MoviePeople::PersonId)
                            .col(MoviePeople::Role),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_people_movie")
                            .from(MoviePeople::Table, MoviePeople::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_people_person")
                            .from(MoviePeople::Table, MoviePeople::PersonId)
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_people_person_id")
                    .table(MoviePeople::Table)
                    .col(MoviePeople::PersonId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MoviePeople::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(People::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum People {
    Table,
    Id,
    Name,
    Biography,
    BirthDate,
    PhotoUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MoviePeople {
    Table,
    MovieId,
    PersonId,
    Role,
    CharacterName,
    BillingOrder,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
}
