//! User and token repository.
//!
//! Identity management (registration, password reset, social login) is an
//! external collaborator; this repository only resolves opaque bearer tokens
//! to principals and creates the rows the seed tooling and tests need.

use orderflow_core::{UserId, UserRole};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::Principal;

/// Resolve a bearer token to the principal it authenticates.
///
/// Returns `None` for unknown tokens.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
pub async fn principal_by_token(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<Principal>, RepositoryError> {
    let row: Option<(i64, String, String, String)> = sqlx::query_as(
        r"
        SELECT u.id, u.name, u.email, u.role
        FROM auth_token t
        JOIN user u ON u.id = t.user_id
        WHERE t.token = ?1
        ",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((id, name, email, role)) => {
            let role: UserRole = role.parse().map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
            })?;

            Ok(Some(Principal {
                user_id: UserId::new(id),
                name,
                email,
                role,
            }))
        }
        None => Ok(None),
    }
}

/// Create a user.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email already exists.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    role: UserRole,
) -> Result<UserId, RepositoryError> {
    let result = sqlx::query("INSERT INTO user (email, name, role) VALUES (?1, ?2, ?3)")
        .bind(email)
        .bind(name)
        .bind(role.as_str())
        .execute(pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already exists"))?;

    Ok(UserId::new(result.last_insert_rowid()))
}

/// Issue a fresh bearer token for a user.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn issue_token(pool: &SqlitePool, user_id: UserId) -> Result<String, RepositoryError> {
    let token = Uuid::new_v4().simple().to_string();

    sqlx::query("INSERT INTO auth_token (token, user_id) VALUES (?1, ?2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(token)
}
