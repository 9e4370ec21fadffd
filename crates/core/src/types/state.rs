//! The order lifecycle state machine.
//!
//! An order starts life as a buyer's mutable `basket`. Checkout flips it to
//! `new`; everything after that is an administrative progression handled
//! outside this system (`confirmed` → `assembled` → `sent` → `delivered`),
//! with `canceled` as the administrative terminal escape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown order state string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order state: {0}")]
pub struct ParseOrderStateError(pub String);

/// Lifecycle state of an [`Order`](crate::OrderId).
///
/// Only the `Basket` → `New` transition is reachable through the basket and
/// checkout services; the rest of the progression belongs to fulfillment
/// tooling outside this codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// Mutable pre-purchase line collection; at most one per buyer.
    #[default]
    Basket,
    /// Placed order with immutable line composition.
    New,
    /// Accepted by the shop.
    Confirmed,
    /// Picked and packed.
    Assembled,
    /// Handed to delivery.
    Sent,
    /// Received by the buyer.
    Delivered,
    /// Terminal administrative cancellation.
    Canceled,
}

impl OrderState {
    /// The canonical string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basket => "basket",
            Self::New => "new",
            Self::Confirmed => "confirmed",
            Self::Assembled => "assembled",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// `Canceled` is reachable from any non-terminal state; `Delivered` and
    /// `Canceled` are terminal.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Basket, Self::New)
                | (Self::New, Self::Confirmed)
                | (Self::Confirmed, Self::Assembled)
                | (Self::Assembled, Self::Sent)
                | (Self::Sent, Self::Delivered)
        ) || (next == Self::Canceled && !self.is_terminal())
    }

    /// Whether this state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Canceled)
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderState {
    type Err = ParseOrderStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basket" => Ok(Self::Basket),
            "new" => Ok(Self::New),
            "confirmed" => Ok(Self::Confirmed),
            "assembled" => Ok(Self::Assembled),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            other => Err(ParseOrderStateError(other.to_owned())),
        }
    }
}
