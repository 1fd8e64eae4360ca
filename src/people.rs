//! People and their movie credits, plus cast/crew assignment on movies.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::{Expr, Func},
};

use crate::{
    catalog,
    entities::{
        movie,
        movie_person::{self, PersonRole},
        person,
    },
    error::{ApiError, ApiResult},
    models::{
        AddCastMemberRequest, CastMemberResponse, CreatePersonRequest, MovieCredit,
        PersonResponse, PersonWithMoviesResponse, UpdatePersonRequest,
    },
};

pub async fn list_people(db: &DatabaseConnection) -> ApiResult<Vec<PersonResponse>> {
    let people = person::Entity::find()
        .order_by(person::Column::CreatedAt, Order::Desc)
        .order_by(person::Column::Id, Order::Desc)
        .all(db)
        .await?;
    Ok(people.into_iter().map(PersonResponse::from).collect())
}

pub async fn get_person(db: &DatabaseConnection, id: i32) -> ApiResult<PersonResponse> {
    let person = person::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Person not found"))?;
    Ok(person.into())
}

#[derive(Debug, FromQueryResult)]
struct CreditRow {
    movie_id: i32,
    movie_title: String,
    role: PersonRole,
    character_name: Option<String>,
    release_date: DateTime<Utc>,
}

pub async fn person_with_movies(
    db: &DatabaseConnection,
    id: i32,
) -> ApiResult<PersonWithMoviesResponse> {
    let person = get_person(db, id).await?;

    let rows = movie_person::Entity::find()
        .select_only()
        .columns([
            movie_person::Column::MovieId,
            movie_person::Column::Role,
            movie_person::Column::CharacterName,
        ])
        .column_as(movie::Column::Title, "movie_title")
        .column_as(movie::Column::ReleaseDate, "release_date")
        .join(JoinType::InnerJoin, movie_person::Relation::Movie.def())
        .filter(movie_person::Column::PersonId.eq(id))
        .order_by(movie::Column::ReleaseDate, Order::Desc)
        .order_by(movie_person::Column::MovieId, Order::Asc)
        .into_model::<CreditRow>()
        .all(db)
        .await?;

    let movies = rows
        .into_iter()
        .map(|r| MovieCredit {
            movie_id: r.movie_id,
            movie_title: r.movie_title,
            role: r.role,
            character_name: r.character_name,
            release_date: r.release_date,
        })
        .collect();

    Ok(PersonWithMoviesResponse { person, movies })
}

fn lower_name() -> Expr {
    Expr::expr(Func::lower(Expr::col((person::Entity, person::Column::Name))))
}

pub async fn create_person(
    db: &DatabaseConnection,
    req: CreatePersonRequest,
) -> ApiResult<PersonResponse> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("name is required"));
    }

    let exists = person::Entity::find()
        .filter(lower_name().eq(name.to_lowercase()))
        .count(db)
        .await?
        > 0;
    if exists {
        return Err(ApiError::conflict("A person with this name already exists"));
    }

    let model = person::ActiveModel {
        name: Set(name),
        biography: Set(req.biography.map(|b| b.trim().to_string())),
        birth_date: Set(req.birth_date),
        photo_url: Set(req.photo_url.map(|u| u.trim().to_string())),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    Ok(created.into())
}

pub async fn update_person(
    db: &DatabaseConnection,
    id: i32,
    req: UpdatePersonRequest,
) -> ApiResult<PersonResponse> {
    let existing = person::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Person not found"))?;

    let mut model: person::ActiveModel = existing.into();
    if let Some(name) = req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        model.name = Set(name);
    }
    if let Some(biography) = req.biography {
        model.biography = Set(Some(biography.trim().to_string()));
    }
    if let Some(birth_date) = req.birth_date {
        model.birth_date = Set(Some(birth_date));
    }
    if let Some(photo_url) = req.photo_url {
        model.photo_url = Set(Some(photo_url.trim().to_string()));
    }
    let updated = model.update(db).await?;
    Ok(updated.into())
}

pub async fn delete_person(db: &DatabaseConnection, id: i32) -> ApiResult<()> {
    let result = person::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Person not found"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// cast & crew

#[derive(Debug, FromQueryResult)]
struct CastRow {
    person_id: i32,
    person_name: String,
    role: PersonRole,
    character_name: Option<String>,
    billing_order: Option<i32>,
}

/// Cast and crew for a movie, ordered by role, then billing order with
/// absent billing sorted last, then person id.
pub async fn movie_cast(
    db: &DatabaseConnection,
    movie_id: i32,
) -> ApiResult<Vec<CastMemberResponse>> {
    if !catalog::movie_exists(db, movie_id).await? {
        return Err(ApiError::not_found("Movie not found"));
    }

    let rows = movie_person::Entity::find()
        .select_only()
        .columns([
            movie_person::Column::PersonId,
            movie_person::Column::Role,
            movie_person::Column::CharacterName,
            movie_person::Column::BillingOrder,
        ])
        .column_as(person::Column::Name, "person_name")
        .join(JoinType::InnerJoin, movie_person::Relation::Person.def())
        .filter(movie_person::Column::MovieId.eq(movie_id))
        .order_by(movie_person::Column::Role, Order::Asc)
        .order_by(
            Expr::col((movie_person::Entity, movie_person::Column::BillingOrder))
                .if_null(i32::MAX),
            Order::Asc,
        )
        .order_by(movie_person::Column::PersonId, Order::Asc)
        .into_model::<CastRow>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| CastMemberResponse {
            person_id: r.person_id,
            person_name: r.person_name,
            role: r.role,
            character_name: r.character_name,
            billing_order: r.billing_order,
        })
        .collect())
}

pub async fn add_cast_member(
    db: &DatabaseConnection,
    movie_id: i32,
    req: AddCastMemberRequest,
) -> ApiResult<()> {
    if !catalog::movie_exists(db, movie_id).await? {
        return Err(ApiError::not_found("Movie not found"));
    }
    let person_exists =
        person::Entity::find().filter(person::Column::Id.eq(req.person_id)).count(db).await? > 0;
    if !person_exists {
        return Err(ApiError::not_found("Person not found"));
    }

    let already_assigned = movie_person::Entity::find_by_id((movie_id, req.person_id, req.role))
        .one(db)
        .await?
        .is_some();
    if already_assigned {
        return Err(ApiError::conflict(
            "This person is already added to the movie in this role",
        ));
    }

    let model = movie_person::ActiveModel {
        movie_id: Set(movie_id),
        person_id: Set(req.person_id),
        role: Set(req.role),
        character_name: Set(req.character_name.map(|c| c.trim().to_string())),
        billing_order: Set(req.billing_order),
    };
    model.insert(db).await?;
    Ok(())
}

pub async fn remove_cast_member(
    db: &DatabaseConnection,
    movie_id: i32,
    person_id: i32,
    role: PersonRole,
) -> ApiResult<()> {
    let result =
        movie_person::Entity::delete_by_id((movie_id, person_id, role)).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Person not found in movie cast/crew"));
    }
    Ok(())
}
