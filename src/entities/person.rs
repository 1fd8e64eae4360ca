use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "people")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<DateTimeUtc>,
    pub photo_url: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_person::Entity")]
    MoviePeople,
}

impl Related<super::movie_person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoviePeople.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
