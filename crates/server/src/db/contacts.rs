//! Contact repository. Every query is scoped to the owning buyer.

use orderflow_core::{ContactId, UserId};
use sqlx::{FromRow, SqlitePool};

use super::RepositoryError;
use crate::models::{Contact, CreateContactInput, UpdateContactInput};

#[derive(Debug, FromRow)]
struct ContactRow {
    id: i64,
    user_id: i64,
    phone: String,
    city: String,
    street: String,
    house: Option<String>,
    structure: Option<String>,
    building: Option<String>,
    apartment: Option<String>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: ContactId::new(row.id),
            user_id: UserId::new(row.user_id),
            phone: row.phone,
            city: row.city,
            street: row.street,
            house: row.house,
            structure: row.structure,
            building: row.building,
            apartment: row.apartment,
        }
    }
}

const CONTACT_SELECT: &str = r"
    SELECT id, user_id, phone, city, street, house, structure, building, apartment
    FROM contact
";

/// All contacts owned by `user_id`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: UserId,
) -> Result<Vec<Contact>, RepositoryError> {
    let rows: Vec<ContactRow> =
        sqlx::query_as(&format!("{CONTACT_SELECT} WHERE user_id = ?1 ORDER BY id"))
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(Contact::from).collect())
}

/// A contact by id, only if `user_id` owns it.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_owned(
    pool: &SqlitePool,
    user_id: UserId,
    contact_id: ContactId,
) -> Result<Option<Contact>, RepositoryError> {
    let row: Option<ContactRow> =
        sqlx::query_as(&format!("{CONTACT_SELECT} WHERE id = ?1 AND user_id = ?2"))
            .bind(contact_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(Contact::from))
}

/// Create a contact for `user_id`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create(
    pool: &SqlitePool,
    user_id: UserId,
    input: &CreateContactInput,
) -> Result<Contact, RepositoryError> {
    let result = sqlx::query(
        r"
        INSERT INTO contact (user_id, phone, city, street, house, structure, building, apartment)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ",
    )
    .bind(user_id)
    .bind(&input.phone)
    .bind(&input.city)
    .bind(&input.street)
    .bind(&input.house)
    .bind(&input.structure)
    .bind(&input.building)
    .bind(&input.apartment)
    .execute(pool)
    .await?;

    Ok(Contact {
        id: ContactId::new(result.last_insert_rowid()),
        user_id,
        phone: input.phone.clone(),
        city: input.city.clone(),
        street: input.street.clone(),
        house: input.house.clone(),
        structure: input.structure.clone(),
        building: input.building.clone(),
        apartment: input.apartment.clone(),
    })
}

/// Partially update an owned contact. Absent fields keep their value.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the contact does not exist or is
/// owned by someone else.
pub async fn update(
    pool: &SqlitePool,
    user_id: UserId,
    contact_id: ContactId,
    input: &UpdateContactInput,
) -> Result<Contact, RepositoryError> {
    let mut tx = pool.begin().await?;

    let row: Option<ContactRow> =
        sqlx::query_as(&format!("{CONTACT_SELECT} WHERE id = ?1 AND user_id = ?2"))
            .bind(contact_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = Contact::from(row.ok_or(RepositoryError::NotFound)?);

    let merged = Contact {
        id: current.id,
        user_id: current.user_id,
        phone: input.phone.clone().unwrap_or(current.phone),
        city: input.city.clone().unwrap_or(current.city),
        street: input.street.clone().unwrap_or(current.street),
        house: input.house.clone().or(current.house),
        structure: input.structure.clone().or(current.structure),
        building: input.building.clone().or(current.building),
        apartment: input.apartment.clone().or(current.apartment),
    };

    sqlx::query(
        r"
        UPDATE contact
        SET phone = ?1, city = ?2, street = ?3, house = ?4,
            structure = ?5, building = ?6, apartment = ?7
        WHERE id = ?8 AND user_id = ?9
        ",
    )
    .bind(&merged.phone)
    .bind(&merged.city)
    .bind(&merged.street)
    .bind(&merged.house)
    .bind(&merged.structure)
    .bind(&merged.building)
    .bind(&merged.apartment)
    .bind(contact_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(merged)
}

/// Delete an owned contact.
///
/// Returns `true` if a row was deleted.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete(
    pool: &SqlitePool,
    user_id: UserId,
    contact_id: ContactId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM contact WHERE id = ?1 AND user_id = ?2")
        .bind(contact_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
