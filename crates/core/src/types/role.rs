//! User roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown role string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);

/// Role of an authenticated principal.
///
/// Shops publish stock and see incoming orders; buyers own baskets, contacts
/// and placed orders. The identity collaborator decides the role; this crate
/// only carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A shop owner.
    Shop,
    /// A buyer.
    #[default]
    Buyer,
}

impl UserRole {
    /// The canonical string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shop => "shop",
            Self::Buyer => "buyer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseUserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shop" => Ok(Self::Shop),
            "buyer" => Ok(Self::Buyer),
            other => Err(ParseUserRoleError(other.to_owned())),
        }
    }
}
