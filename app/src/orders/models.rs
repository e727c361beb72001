use std::fmt;

use chrono::{DateTime, Utc};
use err_derive::Error;
use serde::{Deserialize, Serialize};

use infra::documents::{DocMeta, HasMeta};
use infra::ids::{Entity, Id};

use crate::catalog::{MenuItem, Restaurant};
use crate::session::User;

/// Lifecycle of a placed order. Forward progress is strictly sequential;
/// `Cancelled` is the one escape hatch, reachable from any non-terminal
/// status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        match self {
            OrderStatus::Delivered | OrderStatus::Cancelled => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out for delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(fmt, "{}", s)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error(display = "cannot move from {} to {}", from, to)]
    NotNext { from: OrderStatus, to: OrderStatus },
    #[error(display = "order is already {}", status)]
    Terminal { status: OrderStatus },
    #[error(display = "no such order: {}", id)]
    UnknownOrder { id: Id<Order> },
}

/// One step of an order's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
}

/// A line of a placed order; a frozen copy of the cart line it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub item_id: Id<MenuItem>,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(flatten)]
    pub(crate) meta: DocMeta<Order>,
    pub user_id: Id<User>,
    pub restaurant_id: Id<Restaurant>,
    pub restaurant_name: String,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    status_history: Vec<StatusEntry>,
}

impl Order {
    pub(super) fn place(
        id: Id<Order>,
        user_id: Id<User>,
        restaurant_id: Id<Restaurant>,
        restaurant_name: &str,
        items: Vec<OrderItem>,
        total_price: f64,
        delivery_address: &str,
        at: DateTime<Utc>,
    ) -> Self {
        Order {
            meta: DocMeta::new_with_id(id),
            user_id,
            restaurant_id,
            restaurant_name: restaurant_name.to_string(),
            items,
            total_price,
            delivery_address: delivery_address.to_string(),
            created_at: at,
            status_history: vec![StatusEntry {
                status: OrderStatus::Pending,
                at,
            }],
        }
    }

    /// Append-only history, oldest first. Always has at least the
    /// `Pending` entry stamped at creation.
    pub fn status_history(&self) -> &[StatusEntry] {
        &self.status_history
    }

    pub fn current_status(&self) -> StatusEntry {
        *self
            .status_history
            .last()
            .expect("an order always has at least its pending entry")
    }

    /// Move to `target`, which must be the immediate successor of the
    /// current status, or `Cancelled` while not yet terminal.
    pub fn advance(
        &mut self,
        target: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        let current = self.current_status();
        if current.status.is_terminal() {
            return Err(TransitionError::Terminal {
                status: current.status,
            });
        }
        let permitted = match target {
            OrderStatus::Cancelled => true,
            t => current.status.successor() == Some(t),
        };
        if !permitted {
            return Err(TransitionError::NotNext {
                from: current.status,
                to: target,
            });
        }
        // History time never goes backwards, whatever clock the caller had.
        let at = at.max(current.at);
        self.status_history.push(StatusEntry { status: target, at });
        Ok(())
    }
}

impl Entity for Order {
    const PREFIX: &'static str = "order";
}

impl HasMeta for Order {
    fn meta(&self) -> &DocMeta<Order> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut DocMeta<Order> {
        &mut self.meta
    }
}
