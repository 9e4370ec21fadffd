//! Delivery contact domain types.

use orderflow_core::{ContactId, UserId};
use serde::{Deserialize, Serialize};

/// A buyer's delivery address and phone.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    /// Unique contact ID.
    pub id: ContactId,
    /// Owning buyer.
    pub user_id: UserId,
    /// Contact phone number.
    pub phone: String,
    /// City.
    pub city: String,
    /// Street.
    pub street: String,
    /// House number.
    pub house: Option<String>,
    /// Housing block.
    pub structure: Option<String>,
    /// Building.
    pub building: Option<String>,
    /// Apartment.
    pub apartment: Option<String>,
}

/// Input for creating a contact.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactInput {
    pub phone: String,
    pub city: String,
    pub street: String,
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub apartment: Option<String>,
}

/// Input for partially updating a contact. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactInput {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub apartment: Option<String>,
}
