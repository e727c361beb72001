use chrono::Utc;
use log::*;

use infra::documents::HasMeta;
use infra::ids::{Id, IdGen};

use crate::services::{Commandable, Queryable, Request};
use crate::session::User;

mod models;

pub use self::models::{Order, OrderItem, OrderStatus, StatusEntry, TransitionError};

use crate::catalog::Restaurant;

/// System of record for placed orders. Orders are appended in placement
/// order and never removed; ids come out of the generator sequentially.
#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: Vec<Order>,
    idgen: IdGen,
}

/// Walk an order one step onwards (or cancel it).
#[derive(Debug, Clone, Copy)]
pub struct AdvanceOrder {
    pub order_id: Id<Order>,
    pub target: OrderStatus,
}

/// A single order, by id.
#[derive(Debug, Clone, Copy)]
pub struct ShowOrder {
    pub order_id: Id<Order>,
}

/// Everything a customer has ordered, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct OrderHistory {
    pub user_id: Id<User>,
}

impl OrderLedger {
    pub fn new() -> Self {
        OrderLedger::default()
    }

    /// Record a new order. The caller (checkout) has already validated the
    /// cart contents and address; the ledger just stamps and stores.
    pub fn create_order(
        &mut self,
        user_id: Id<User>,
        restaurant_id: Id<Restaurant>,
        restaurant_name: &str,
        items: Vec<OrderItem>,
        total_price: f64,
        delivery_address: &str,
    ) -> &Order {
        let id = self.idgen.generate();
        let order = Order::place(
            id,
            user_id,
            restaurant_id,
            restaurant_name,
            items,
            total_price,
            delivery_address,
            Utc::now(),
        );
        info!(
            "Placed {} at {} for {}: {} items, total {:.2}",
            id,
            restaurant_name,
            user_id,
            order.items.len(),
            total_price
        );
        self.orders.push(order);
        self.orders.last().expect("order just appended")
    }

    pub fn order_by_id(&self, id: Id<Order>) -> Option<&Order> {
        self.orders.iter().find(|order| order.id() == id)
    }

    pub fn orders_by_user(&self, user_id: Id<User>) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .collect()
    }

    pub fn advance(
        &mut self,
        id: Id<Order>,
        target: OrderStatus,
    ) -> Result<(), TransitionError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id() == id)
            .ok_or(TransitionError::UnknownOrder { id })?;
        order.advance(target, Utc::now())?;
        info!("Order {} is now {}", id, target);
        Ok(())
    }
}

impl Request for AdvanceOrder {
    type Resp = ();
}

impl Commandable<AdvanceOrder> for OrderLedger {
    fn execute(&mut self, req: AdvanceOrder) -> anyhow::Result<()> {
        self.advance(req.order_id, req.target)?;
        Ok(())
    }
}

impl Request for ShowOrder {
    type Resp = Option<Order>;
}

impl Queryable<ShowOrder> for OrderLedger {
    fn query(&self, req: ShowOrder) -> anyhow::Result<Option<Order>> {
        Ok(self.order_by_id(req.order_id).cloned())
    }
}

impl Request for OrderHistory {
    type Resp = Vec<Order>;
}

impl Queryable<OrderHistory> for OrderLedger {
    fn query(&self, req: OrderHistory) -> anyhow::Result<Vec<Order>> {
        Ok(self
            .orders_by_user(req.user_id)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn a_user() -> Id<User> {
        Id::hashed(&"hungry@example.com")
    }

    fn place(ledger: &mut OrderLedger, user: Id<User>) -> Id<Order> {
        let restaurant = Restaurant::id_for("Burger Palace");
        ledger
            .create_order(
                user,
                restaurant,
                "Burger Palace",
                vec![OrderItem {
                    item_id: Id::hashed(&"a burger"),
                    name: "Classic Cheeseburger".to_string(),
                    price: 8.99,
                    quantity: 1,
                }],
                12.61,
                "123 Main St",
            )
            .id()
    }

    #[test]
    fn assigns_sequential_ids() {
        let mut ledger = OrderLedger::new();
        let user = a_user();

        let first = place(&mut ledger, user);
        let second = place(&mut ledger, user);

        assert!(first < second);
        assert_ne!(first, second);
    }

    #[test]
    fn finds_orders_by_id() {
        let mut ledger = OrderLedger::new();
        let id = place(&mut ledger, a_user());

        let order = ledger.order_by_id(id).expect("order");
        assert_eq!(order.restaurant_name, "Burger Palace");

        assert!(ledger.order_by_id(Id::hashed(&"no such order")).is_none());
    }

    #[test]
    fn lists_a_users_orders_oldest_first() {
        let mut ledger = OrderLedger::new();
        let user = a_user();
        let other = Id::hashed(&"other@example.com");

        let first = place(&mut ledger, user);
        place(&mut ledger, other);
        let third = place(&mut ledger, user);

        let mine: Vec<_> = ledger
            .orders_by_user(user)
            .into_iter()
            .map(|order| order.id())
            .collect();
        assert_eq!(mine, vec![first, third]);
    }

    #[test]
    fn a_user_with_no_orders_gets_an_empty_list() {
        let ledger = OrderLedger::new();

        assert!(ledger.orders_by_user(a_user()).is_empty());
    }

    #[test]
    fn advancing_an_unknown_order_fails() {
        let mut ledger = OrderLedger::new();
        let id = Id::hashed(&"no such order");

        assert_eq!(
            ledger.advance(id, OrderStatus::Confirmed),
            Err(TransitionError::UnknownOrder { id })
        );
    }

    #[test]
    fn advance_command_walks_the_ledgered_order() {
        let mut ledger = OrderLedger::new();
        let order_id = place(&mut ledger, a_user());

        ledger
            .execute(AdvanceOrder {
                order_id,
                target: OrderStatus::Confirmed,
            })
            .expect("advance");

        let order = ledger
            .query(ShowOrder { order_id })
            .expect("query")
            .expect("order");
        assert_eq!(order.current_status().status, OrderStatus::Confirmed);
        assert_eq!(order.status_history().len(), 2);
    }
}
