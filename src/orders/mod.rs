//! Orders
//!
//! An order is an immutable priced snapshot of a cart. After placement the
//! lines and total never change; the only mutation an order admits is a
//! status transition along the edges in [`OrderStatus::allowed_next`].

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use tracing::info;

use crate::{
    cart::{Cart, CartLine},
    summary::OrderSummary,
};

pub mod status;

pub use status::{InvalidTransitionError, OrderStatus};

new_key_type! {
    /// Order Key
    pub struct OrderKey;
}

/// A placed order.
#[derive(Debug, Clone)]
pub struct Order<'a> {
    key: OrderKey,
    lines: Vec<CartLine<'a>>,
    status: OrderStatus,
    total: Money<'a, Currency>,
    placed_at: Timestamp,
}

impl<'a> Order<'a> {
    /// Place an order from a cart and its priced summary.
    ///
    /// The order takes its own copy of the priced lines; the live cart stays
    /// independent and can be cleared or mutated freely afterwards. Edits to
    /// a placed order mean placing a new one.
    #[must_use]
    pub fn place(
        key: OrderKey,
        cart: &Cart<'a>,
        summary: &OrderSummary<'a>,
        placed_at: Timestamp,
    ) -> Self {
        Self {
            key,
            lines: cart.iter().copied().collect(),
            status: OrderStatus::Pending,
            total: summary.total(),
            placed_at,
        }
    }

    /// Returns the order key.
    #[must_use]
    pub fn key(&self) -> OrderKey {
        self.key
    }

    /// Returns the priced lines as captured at placement.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the payable total as captured at placement.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Returns when the order was placed.
    #[must_use]
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    /// Move the order to `target`.
    ///
    /// Legality comes from the status table alone. On success the new status
    /// is recorded and announced as a `tracing` event; on failure the order
    /// is left exactly as it was.
    ///
    /// Callers that persist orders must serialize transitions per order;
    /// the check-then-set here is not atomic across concurrent callers.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransitionError`] if the table has no edge from the
    /// current status to `target`.
    pub fn transition(&mut self, target: OrderStatus) -> Result<(), InvalidTransitionError> {
        if !self.status.can_transition_to(target) {
            return Err(InvalidTransitionError {
                from: self.status,
                attempted: target,
            });
        }

        let from = self.status;

        self.status = target;

        info!(order = ?self.key, %from, %target, "order status changed");

        Ok(())
    }
}
