use entity::employees::{ActiveModel, Column, Entity, Model};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    prelude::Json,
};

use crate::DbResult;

/// Row to insert; `password_hash` must already be a PHC hash string.
#[derive(Clone, Debug)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
    pub position: String,
    pub skills: Vec<String>,
}

pub async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> DbResult<Option<Model>> {
    let found = Entity::find()
        .filter(Column::Email.eq(email))
        .one(conn)
        .await?;
    Ok(found)
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> DbResult<Option<Model>> {
    Ok(Entity::find_by_id(id).one(conn).await?)
}

/// Every employee in insertion order.
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> DbResult<Vec<Model>> {
    Ok(Entity::find().order_by_asc(Column::Id).all(conn).await?)
}

pub async fn count<C: ConnectionTrait>(conn: &C) -> DbResult<u64> {
    Ok(Entity::find().count(conn).await?)
}

pub async fn insert<C: ConnectionTrait>(conn: &C, employee: NewEmployee) -> DbResult<Model> {
    let model = ActiveModel {
        id: NotSet,
        name: Set(employee.name),
        email: Set(employee.email),
        password_hash: Set(employee.password_hash),
        avatar: Set(employee.avatar),
        position: Set(employee.position),
        skills: Set(Json::from(employee.skills)),
    }
    .insert(conn)
    .await?;
    Ok(model)
}
