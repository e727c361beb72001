use anyhow::{Context, Result};
use err_derive::Error;
use log::*;

use infra::documents::HasMeta;
use infra::ids::Id;

pub mod cart;
pub mod catalog;
pub mod config;
pub mod orders;
pub mod services;
pub mod session;

use crate::cart::Cart;
use crate::catalog::{Catalog, Restaurant};
use crate::orders::{Order, OrderItem, OrderLedger, OrderStatus};
use crate::services::{Commandable, Request};
use crate::session::Session;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error(display = "sign in to place an order")]
    NotSignedIn,
    #[error(display = "a delivery address is required")]
    MissingAddress,
    #[error(display = "the cart is empty")]
    EmptyCart,
    #[error(display = "please place separate orders for different restaurants")]
    MultipleRestaurants,
}

/// Turn the current cart into an order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub delivery_address: String,
}

/// The storefront: one customer session's worth of state, wired together
/// at startup. The catalog is read-only; the cart and order ledger are
/// owned here and live for the life of the process.
#[derive(Debug)]
pub struct QuickBite {
    catalog: Catalog,
    cart: Cart,
    orders: OrderLedger,
    session: Session,
}

impl QuickBite {
    pub fn new(config: &config::Config) -> Result<Self> {
        let session = Session::restore(&config.session)?;
        Ok(QuickBite::with_catalog(Catalog::demo(), session))
    }

    pub fn with_catalog(catalog: Catalog, session: Session) -> Self {
        QuickBite {
            catalog,
            cart: Cart::new(),
            orders: OrderLedger::new(),
            session,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn orders(&self) -> &OrderLedger {
        &self.orders
    }

    pub fn orders_mut(&mut self) -> &mut OrderLedger {
        &mut self.orders
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The one multi-step workflow in the system. Validations run before
    /// anything mutates, so a failed checkout leaves the cart exactly as
    /// it was; a successful one empties it and hands back the order id.
    pub fn checkout(&mut self, delivery_address: &str) -> Result<Id<Order>, CheckoutError> {
        let user_id = match self.session.current_user() {
            Some(user) => user.id(),
            None => return Err(CheckoutError::NotSignedIn),
        };
        let delivery_address = delivery_address.trim();
        if delivery_address.is_empty() {
            return Err(CheckoutError::MissingAddress);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let restaurants = self.cart.restaurant_ids();
        if restaurants.len() > 1 {
            warn!("Checkout refused: cart spans {} restaurants", restaurants.len());
            return Err(CheckoutError::MultipleRestaurants);
        }

        let restaurant_id = restaurants
            .into_iter()
            .next()
            .expect("a non-empty cart names a restaurant");
        let restaurant_name = self.cart.lines()[0].restaurant_name.clone();
        let items: Vec<OrderItem> = self
            .cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                item_id: line.item_id,
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
            })
            .collect();
        let totals = self.cart.totals();

        let order_id = self
            .orders
            .create_order(
                user_id,
                restaurant_id,
                &restaurant_name,
                items,
                totals.total,
                delivery_address,
            )
            .id();

        self.cart.clear();
        Ok(order_id)
    }

    /// Stock the order ledger with the signed-in customer's demo history:
    /// a delivered burger order and a sushi order still in the kitchen.
    /// Seeded orders run through the ordinary checkout and transition
    /// path, so their histories obey the same rules as live ones. The
    /// active cart is left exactly as it was.
    pub fn seed_demo_orders(&mut self) -> Result<()> {
        let stashed = std::mem::take(&mut self.cart);
        let seeded = self.seed_history();
        self.cart = stashed;
        seeded
    }

    fn seed_history(&mut self) -> Result<()> {
        self.seed_order(
            "Burger Palace",
            &[("Classic Cheeseburger", 2), ("Truffle Fries", 1)],
            OrderStatus::Delivered,
        )?;
        self.seed_order(
            "Sushi Express",
            &[
                ("California Roll", 1),
                ("Salmon Nigiri", 2),
                ("Miso Soup", 1),
            ],
            OrderStatus::Preparing,
        )?;
        Ok(())
    }

    fn seed_order(
        &mut self,
        restaurant_name: &str,
        picks: &[(&str, u32)],
        up_to: OrderStatus,
    ) -> Result<()> {
        let restaurant = self
            .catalog
            .restaurant_by_id(Restaurant::id_for(restaurant_name))
            .with_context(|| format!("seed restaurant {:?}", restaurant_name))?
            .clone();
        for &(name, quantity) in picks {
            let item = self
                .catalog
                .menu_for(restaurant.id())
                .into_iter()
                .find(|item| item.name == name)
                .with_context(|| format!("seed dish {:?} at {:?}", name, restaurant_name))?
                .clone();
            self.cart.add_item(&item, &restaurant, quantity);
        }

        let order_id = self.checkout("123 Main St, Apt 4B, Anytown, USA")?;
        let mut status = OrderStatus::Pending;
        while status != up_to {
            status = status
                .successor()
                .with_context(|| format!("no route from {} to {}", status, up_to))?;
            self.orders.advance(order_id, status)?;
        }
        Ok(())
    }
}

impl Request for PlaceOrder {
    type Resp = Id<Order>;
}

impl Commandable<PlaceOrder> for QuickBite {
    fn execute(&mut self, req: PlaceOrder) -> Result<Id<Order>> {
        Ok(self.checkout(&req.delivery_address)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn storefront() -> QuickBite {
        let path = std::env::temp_dir()
            .join(format!("quickbite-checkout-{:x}", rand::random::<u64>()))
            .join("user.json");
        let session = Session::restore(&SessionConfig { path }).expect("restore");
        QuickBite::with_catalog(Catalog::demo(), session)
    }

    fn signed_in() -> QuickBite {
        let mut qb = storefront();
        qb.session_mut()
            .login("dave@example.com", "correct-horse")
            .expect("login");
        qb
    }

    fn fill_cart(qb: &mut QuickBite, restaurant: &str, item_name: &str, quantity: u32) {
        let catalog = qb.catalog().clone();
        let restaurant = catalog
            .restaurant_by_id(Restaurant::id_for(restaurant))
            .expect("restaurant");
        let item = catalog
            .menu_for(restaurant.id())
            .into_iter()
            .find(|item| item.name == item_name)
            .expect("menu item");
        qb.cart_mut().add_item(item, restaurant, quantity);
    }

    #[test]
    fn checkout_requires_a_session() {
        let mut qb = storefront();
        fill_cart(&mut qb, "Burger Palace", "Classic Cheeseburger", 1);

        assert_eq!(
            qb.checkout("123 Main St"),
            Err(CheckoutError::NotSignedIn)
        );
        assert_eq!(qb.cart().lines().len(), 1, "cart left untouched");
    }

    #[test]
    fn checkout_requires_an_address() {
        let mut qb = signed_in();
        fill_cart(&mut qb, "Burger Palace", "Classic Cheeseburger", 1);

        assert_eq!(qb.checkout("   "), Err(CheckoutError::MissingAddress));
        assert_eq!(qb.cart().lines().len(), 1, "cart left untouched");
    }

    #[test]
    fn checkout_requires_a_non_empty_cart() {
        let mut qb = signed_in();

        assert_eq!(qb.checkout("123 Main St"), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn checkout_refuses_mixed_restaurant_carts() {
        let mut qb = signed_in();
        fill_cart(&mut qb, "Burger Palace", "Classic Cheeseburger", 1);
        fill_cart(&mut qb, "Pizza Heaven", "Margherita Pizza", 1);

        assert_eq!(
            qb.checkout("123 Main St"),
            Err(CheckoutError::MultipleRestaurants)
        );
        assert!(
            qb.orders().orders_by_user(qb.session().current_user().unwrap().id()).is_empty(),
            "no order was created"
        );
        assert_eq!(qb.cart().lines().len(), 2, "cart left untouched");
    }

    #[test]
    fn checkout_snapshots_the_cart_and_clears_it() {
        let mut qb = signed_in();
        fill_cart(&mut qb, "Burger Palace", "Classic Cheeseburger", 2);
        fill_cart(&mut qb, "Burger Palace", "Truffle Fries", 1);
        let quoted = qb.cart().totals();

        let order_id = qb.checkout("123 Main St, Apt 4B").expect("checkout");

        assert!(qb.cart().is_empty());

        let order = qb.orders().order_by_id(order_id).expect("order");
        assert_eq!(order.restaurant_name, "Burger Palace");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.delivery_address, "123 Main St, Apt 4B");
        assert!((order.total_price - quoted.total).abs() < 1e-9);
        assert_eq!(order.current_status().status, OrderStatus::Pending);
        assert_eq!(order.status_history().len(), 1);
    }

    #[test]
    fn seeding_fills_the_demo_order_history() {
        let mut qb = signed_in();

        qb.seed_demo_orders().expect("seed");

        let user_id = qb.session().current_user().expect("signed in").id();
        let orders = qb.orders().orders_by_user(user_id);
        assert_eq!(orders.len(), 2);

        let delivered = orders[0];
        assert_eq!(delivered.restaurant_name, "Burger Palace");
        assert_eq!(delivered.current_status().status, OrderStatus::Delivered);
        assert_eq!(delivered.status_history().len(), 5);
        assert!((delivered.total_price - 27.6679).abs() < 1e-9);

        let preparing = orders[1];
        assert_eq!(preparing.restaurant_name, "Sushi Express");
        assert_eq!(preparing.current_status().status, OrderStatus::Preparing);
        assert_eq!(preparing.status_history().len(), 3);
    }

    #[test]
    fn seeding_requires_a_session() {
        let mut qb = storefront();

        assert!(qb.seed_demo_orders().is_err());
    }

    #[test]
    fn seeding_leaves_the_active_cart_alone() {
        let mut qb = signed_in();
        fill_cart(&mut qb, "Taco Town", "Street Tacos", 2);

        qb.seed_demo_orders().expect("seed");

        assert_eq!(qb.cart().lines().len(), 1);
        assert_eq!(qb.cart().lines()[0].name, "Street Tacos");
        assert_eq!(qb.cart().lines()[0].quantity, 2);
    }

    #[test]
    fn place_order_command_reports_domain_failures() {
        let mut qb = signed_in();

        let err = qb
            .execute(PlaceOrder {
                delivery_address: "123 Main St".to_string(),
            })
            .expect_err("empty cart should fail");
        assert_eq!(
            err.downcast_ref::<CheckoutError>(),
            Some(&CheckoutError::EmptyCart)
        );
    }
}
