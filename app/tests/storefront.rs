use anyhow::Result;

use infra::documents::HasMeta;
use infra::ids::Id;
use quickbite::catalog::{Catalog, Restaurant};
use quickbite::config::SessionConfig;
use quickbite::orders::{Order, OrderStatus};
use quickbite::session::{Session, User};
use quickbite::{CheckoutError, QuickBite};

struct StorefrontScenario {
    qb: QuickBite,
}

impl StorefrontScenario {
    fn new() -> Result<Self> {
        env_logger::builder().is_test(true).try_init().ok();

        let path = std::env::temp_dir()
            .join(format!("quickbite-scenario-{:x}", rand::random::<u64>()))
            .join("user.json");
        let session = Session::restore(&SessionConfig { path })?;
        Ok(StorefrontScenario {
            qb: QuickBite::with_catalog(Catalog::demo(), session),
        })
    }

    fn customer_signs_up(&mut self, name: &str, email: &str) -> Result<Id<User>> {
        let user = self.qb.session_mut().register(name, email, "letmein-please")?;
        Ok(user.id())
    }

    fn customer_orders_lunch_at(&mut self, restaurant_name: &str) -> Result<Id<Order>> {
        let catalog = self.qb.catalog().clone();
        let restaurant = catalog
            .restaurant_by_id(Restaurant::id_for(restaurant_name))
            .expect("a restaurant the customer heard about");
        for item in catalog.menu_for(restaurant.id()) {
            self.qb.cart_mut().add_item(item, restaurant, 1);
        }

        Ok(self.qb.checkout("123 Main St, Apt 4B, Anytown, USA")?)
    }

    fn kitchen_works_the_order(&mut self, order_id: Id<Order>) -> Result<()> {
        for target in &[
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            self.qb.orders_mut().advance(order_id, *target)?;
        }
        Ok(())
    }

    fn customer_checks_on(&self, order_id: Id<Order>) -> &Order {
        self.qb
            .orders()
            .order_by_id(order_id)
            .expect("the order is on the ledger")
    }
}

#[test]
fn should_deliver_lunch() {
    let mut scenario = StorefrontScenario::new().expect("new scenario");

    scenario
        .customer_signs_up("Dave", "dave@example.com")
        .expect("signs up");
    let order_id = scenario
        .customer_orders_lunch_at("Burger Palace")
        .expect("orders lunch");

    assert!(scenario.qb.cart().is_empty(), "checkout empties the cart");
    assert_eq!(
        scenario.customer_checks_on(order_id).current_status().status,
        OrderStatus::Pending
    );

    scenario
        .kitchen_works_the_order(order_id)
        .expect("kitchen works the order");

    let order = scenario.customer_checks_on(order_id);
    assert_eq!(order.current_status().status, OrderStatus::Delivered);
    assert_eq!(order.status_history().len(), 5);
    let times: Vec<_> = order.status_history().iter().map(|e| e.at).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted, "history is stamped in order");
}

#[test]
fn should_list_the_customers_orders_oldest_first() {
    let mut scenario = StorefrontScenario::new().expect("new scenario");

    let user_id = scenario
        .customer_signs_up("Dave", "dave@example.com")
        .expect("signs up");

    assert!(
        scenario.qb.orders().orders_by_user(user_id).is_empty(),
        "no orders yet is an empty list, not an error"
    );

    let first = scenario
        .customer_orders_lunch_at("Burger Palace")
        .expect("first order");
    let second = scenario
        .customer_orders_lunch_at("Pizza Heaven")
        .expect("second order");

    let ids: Vec<_> = scenario
        .qb
        .orders()
        .orders_by_user(user_id)
        .into_iter()
        .map(|order| order.id())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn should_refuse_a_cart_spanning_two_restaurants() {
    let mut scenario = StorefrontScenario::new().expect("new scenario");

    scenario
        .customer_signs_up("Dave", "dave@example.com")
        .expect("signs up");

    let catalog = scenario.qb.catalog().clone();
    for name in &["Burger Palace", "Pizza Heaven"] {
        let restaurant = catalog
            .restaurant_by_id(Restaurant::id_for(name))
            .expect("restaurant");
        let item = catalog.menu_for(restaurant.id())[0];
        scenario.qb.cart_mut().add_item(item, restaurant, 1);
    }

    assert_eq!(
        scenario.qb.checkout("123 Main St"),
        Err(CheckoutError::MultipleRestaurants)
    );
}

#[test]
fn should_cancel_an_order_still_in_the_kitchen() {
    let mut scenario = StorefrontScenario::new().expect("new scenario");

    scenario
        .customer_signs_up("Dave", "dave@example.com")
        .expect("signs up");
    let order_id = scenario
        .customer_orders_lunch_at("Sushi Express")
        .expect("orders lunch");

    scenario
        .qb
        .orders_mut()
        .advance(order_id, OrderStatus::Confirmed)
        .expect("confirm");
    scenario
        .qb
        .orders_mut()
        .advance(order_id, OrderStatus::Cancelled)
        .expect("cancel");

    let order = scenario.customer_checks_on(order_id);
    assert_eq!(order.current_status().status, OrderStatus::Cancelled);
    assert!(
        scenario
            .qb
            .orders_mut()
            .advance(order_id, OrderStatus::Preparing)
            .is_err(),
        "a cancelled order stays cancelled"
    );
}
