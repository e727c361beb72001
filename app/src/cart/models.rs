use serde::{Deserialize, Serialize};

use infra::documents::HasMeta;
use infra::ids::Id;

use crate::catalog::{MenuItem, Restaurant};

/// One cart entry. Everything except `quantity` is a snapshot taken when
/// the item went into the cart, so later catalog edits cannot reprice a
/// cart behind the customer's back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub item_id: Id<MenuItem>,
    pub name: String,
    pub price: f64,
    pub restaurant_id: Id<Restaurant>,
    pub restaurant_name: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn snapshot(item: &MenuItem, restaurant: &Restaurant, quantity: u32) -> Self {
        CartLine {
            item_id: item.id(),
            name: item.name.clone(),
            price: item.price,
            restaurant_id: item.restaurant_id,
            restaurant_name: restaurant.name.clone(),
            quantity,
        }
    }
}

/// Derived pricing for the whole cart. Never stored; recomputed from the
/// lines on every read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
}
