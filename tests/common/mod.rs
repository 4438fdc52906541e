use anyhow::Result;
use entity::employees;
use migration::{Migrator, MigratorTrait};
use platform_authn::hash_password;
use platform_db::DbPool;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Database, Set, prelude::Json};

/// Fresh in-memory database with the schema applied and no rows.
pub async fn empty_pool() -> Result<DbPool> {
    let pool = Database::connect("sqlite::memory:").await?;
    Migrator::up(&pool, None).await?;
    Ok(pool)
}

/// Fresh in-memory database holding the three sample employees.
pub async fn seeded_pool() -> Result<DbPool> {
    let pool = empty_pool().await?;
    products_hr::seed_directory(&pool).await?;
    Ok(pool)
}

/// Inserts a row with the skills column exactly as given, bypassing the
/// storage helpers so tests can control the stored shape.
pub async fn insert_raw(pool: &DbPool, email: &str, skills: Json) -> Result<employees::Model> {
    let row = employees::ActiveModel {
        id: NotSet,
        name: Set(format!("Raw {email}")),
        email: Set(email.to_string()),
        password_hash: Set(hash_password("hunter2")?),
        avatar: Set("https://api.dicebear.com/7.x/avataaars/svg?seed=Raw".to_string()),
        position: Set("Analyst".to_string()),
        skills: Set(skills),
    };
    Ok(row.insert(pool).await?)
}
