use std::collections::HashSet;

use log::*;

use infra::documents::HasMeta;
use infra::ids::Id;

use crate::catalog::{MenuItem, Restaurant};

mod models;

pub use self::models::{CartLine, CartTotals};

const DELIVERY_FEE: f64 = 2.99;
const TAX_RATE: f64 = 0.07;

/// The active session's shopping cart. At most one line per menu item;
/// adding an item already present merges into the existing line.
///
/// None of the operations here fail: removing an absent line is a no-op,
/// and a zero quantity adds nothing.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn add_item(&mut self, item: &MenuItem, restaurant: &Restaurant, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.line_mut(item.id()) {
            line.quantity += quantity;
            debug!("Bumped {} to x{}", line.name, line.quantity);
        } else {
            let line = CartLine::snapshot(item, restaurant, quantity);
            debug!("Added {} x{}", line.name, line.quantity);
            self.lines.push(line);
        }
    }

    pub fn remove_item(&mut self, item_id: Id<MenuItem>) {
        self.lines.retain(|line| line.item_id != item_id);
    }

    pub fn update_quantity(&mut self, item_id: Id<MenuItem>, quantity: u32) {
        if quantity == 0 {
            self.remove_item(item_id);
            return;
        }
        if let Some(line) = self.line_mut(item_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The distinct restaurants represented in the cart. Checkout refuses
    /// to proceed when there is more than one.
    pub fn restaurant_ids(&self) -> HashSet<Id<Restaurant>> {
        self.lines.iter().map(|line| line.restaurant_id).collect()
    }

    pub fn totals(&self) -> CartTotals {
        let subtotal: f64 = self
            .lines
            .iter()
            .map(|line| line.price * f64::from(line.quantity))
            .sum();
        let delivery_fee = if subtotal > 0.0 { DELIVERY_FEE } else { 0.0 };
        let tax = subtotal * TAX_RATE;
        CartTotals {
            subtotal,
            delivery_fee,
            tax,
            total: subtotal + delivery_fee + tax,
        }
    }

    fn line_mut(&mut self, item_id: Id<MenuItem>) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id == item_id)
    }
}
