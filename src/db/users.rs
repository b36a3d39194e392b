//! Credential store

use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub access_level: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
}

/// Create a user with the default "user" access level. The duplicate-email
/// check and the insert run in one transaction; the unique index backstops
/// the race, so a concurrent duplicate also comes back as `None`.
pub async fn create(pool: &PgPool, user: &NewUser) -> Result<Option<i32>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&user.email)
        .fetch_one(&mut *tx)
        .await?;
    if exists {
        return Ok(None);
    }

    let inserted: Result<(i32,), sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO users (first_name, last_name, phone, email, password_hash, access_level, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 'user', now(), now())
        RETURNING id
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(&user.email)
    .bind(&user.password_hash)
    .fetch_one(&mut *tx)
    .await;

    match inserted {
        Ok((id,)) => {
            tx.commit().await?;
            Ok(Some(id))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Fetch the full user row for credential validation.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, first_name, last_name, phone, email, password_hash, access_level
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}
