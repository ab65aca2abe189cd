//! Order Status
//!
//! The legal order states and the edges between them. Legality lives in one
//! table ([`OrderStatus::allowed_next`]) so the rule can be audited and
//! tested as data rather than scattered through callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection of an illegal status edge.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot move an order from {from} to {attempted}")]
pub struct InvalidTransitionError {
    /// Status the order was in.
    pub from: OrderStatus,

    /// Status the caller tried to move to.
    pub attempted: OrderStatus,
}

/// Where an order is in its life.
///
/// Orders move forward one state at a time; cancellation is only possible
/// before the kitchen starts preparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    Pending,

    /// Accepted by the store.
    Confirmed,

    /// In the kitchen.
    Preparing,

    /// Out with the courier (or ready at the counter).
    Delivering,

    /// Handed over. Terminal.
    Delivered,

    /// Called off before preparation. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in forward order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The statuses this status may move to. One row per state; terminal
    /// states have empty rows.
    #[must_use]
    pub fn allowed_next(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Delivering],
            OrderStatus::Delivering => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    /// Whether the table has an edge from this status to `target`.
    #[must_use]
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_next().contains(&target)
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };

        f.write_str(name)
    }
}
