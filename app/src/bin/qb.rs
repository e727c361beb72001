use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use structopt::StructOpt;

use infra::documents::HasMeta;
use quickbite::catalog::{Restaurant, ShowMenu, ShowRestaurants};
use quickbite::orders::{AdvanceOrder, OrderHistory, OrderStatus, ShowOrder};
use quickbite::services::{Commandable, Queryable};
use quickbite::{PlaceOrder, QuickBite};

#[derive(Debug, StructOpt)]
#[structopt(name = "qb", about = "QuickBite CLI")]
struct Opt {
    /// Config file
    #[structopt(parse(from_os_str))]
    config: PathBuf,
    #[structopt(subcommand)]
    command: Commands,
}

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(name = "show-restaurants", about = "List the restaurants")]
    ShowRestaurants,
    #[structopt(name = "show-menu", about = "List a restaurant's menu")]
    ShowMenu {
        /// Restaurant name, e.g. "Burger Palace"
        restaurant: String,
    },
    #[structopt(
        name = "demo",
        about = "Walk an order from login to delivery and print its history"
    )]
    Demo,
}

#[derive(Deserialize, Debug)]
struct Config {
    #[serde(flatten)]
    quickbite: quickbite::config::Config,
    env_logger: quickbite::config::EnvLogger,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    let mut config_buf = String::new();
    File::open(&opt.config)?.read_to_string(&mut config_buf)?;
    let config: Config = toml::from_str(&config_buf)?;

    config.env_logger.builder().init();

    let mut qb = QuickBite::new(&config.quickbite)?;

    match opt.command {
        Commands::ShowRestaurants => {
            let list = qb.catalog().query(ShowRestaurants)?;
            for restaurant in list {
                println!(
                    "{}: {} ({}, {}, delivery {})",
                    restaurant.id(),
                    restaurant.name,
                    restaurant.cuisine,
                    restaurant.rating,
                    restaurant.delivery_fee
                );
            }
        }
        Commands::ShowMenu { restaurant } => {
            let menu = qb.catalog().query(ShowMenu {
                restaurant_id: Restaurant::id_for(&restaurant),
            })?;
            if menu.is_empty() {
                println!("No menu found for {:?}", restaurant);
            }
            for item in menu {
                println!("{}: {} ${:.2}", item.id(), item.name, item.price);
            }
        }
        Commands::Demo => demo(&mut qb)?,
    }

    Ok(())
}

/// Scripted happy path: sign in, seed some past orders, fill a cart at
/// the first restaurant, check out, then walk the new order to delivered.
fn demo(qb: &mut QuickBite) -> Result<()> {
    qb.session_mut().login("demo@example.com", "letmein-please")?;
    qb.seed_demo_orders()?;

    let catalog = qb.catalog().clone();
    let restaurant = catalog
        .restaurants()
        .first()
        .expect("the demo catalog is not empty");
    for item in catalog.menu_for(restaurant.id()) {
        qb.cart_mut().add_item(item, restaurant, 1);
    }

    let totals = qb.cart().totals();
    println!(
        "Cart at {}: subtotal ${:.2}, delivery ${:.2}, tax ${:.2}, total ${:.2}",
        restaurant.name, totals.subtotal, totals.delivery_fee, totals.tax, totals.total
    );

    let order_id = qb.execute(PlaceOrder {
        delivery_address: "123 Main St, Apt 4B, Anytown, USA".to_string(),
    })?;
    println!("Placed {}", order_id);

    for target in &[
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ] {
        qb.orders_mut().execute(AdvanceOrder {
            order_id,
            target: *target,
        })?;
    }

    let order = qb
        .orders()
        .query(ShowOrder { order_id })?
        .expect("the order we just placed");
    println!("History for {}:", order_id);
    for entry in order.status_history() {
        println!("  {} {}", entry.at.format("%H:%M:%S%.3f"), entry.status);
    }

    let user = qb.session().current_user().expect("signed in above");
    let user_id = user.id();
    let history = qb.orders().query(OrderHistory { user_id })?;
    println!("{} has {} order(s) on file:", user.email, history.len());
    for order in history {
        println!(
            "  {} {} - {}",
            order.id(),
            order.restaurant_name,
            order.current_status().status
        );
    }

    Ok(())
}
