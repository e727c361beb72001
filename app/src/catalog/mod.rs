use log::*;

use infra::documents::HasMeta;
use infra::ids::Id;

use crate::services::{Queryable, Request};

mod models;

pub use self::models::{MenuItem, Restaurant};

/// Read-only restaurant/menu store. Built once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
    items: Vec<MenuItem>,
}

/// List every restaurant, in catalog order.
#[derive(Debug, Clone, Copy)]
pub struct ShowRestaurants;

/// List a single restaurant's menu, in catalog order.
#[derive(Debug, Clone, Copy)]
pub struct ShowMenu {
    pub restaurant_id: Id<Restaurant>,
}

impl Catalog {
    pub fn new(restaurants: Vec<Restaurant>, items: Vec<MenuItem>) -> Self {
        debug!(
            "Catalog with {} restaurants, {} items",
            restaurants.len(),
            items.len()
        );
        Catalog { restaurants, items }
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn restaurant_by_id(&self, id: Id<Restaurant>) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| r.id() == id)
    }

    pub fn menu_for(&self, restaurant_id: Id<Restaurant>) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| item.restaurant_id == restaurant_id)
            .collect()
    }

    pub fn item_by_id(&self, id: Id<MenuItem>) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// The built-in dataset the storefront demo runs against.
    pub fn demo() -> Self {
        let mut restaurants = Vec::new();
        let mut items = Vec::new();

        let burgers = demo_restaurant(
            "Burger Palace",
            "American",
            4.5,
            "25-35 min",
            "$2.99",
            "123 Main St, Anytown, USA",
            "(555) 123-4567",
            "10:00 AM - 10:00 PM",
        );
        let burgers_id = burgers.id();
        restaurants.push(burgers);
        items.push(MenuItem::new(
            burgers_id,
            "Classic Cheeseburger",
            "Juicy beef patty with cheddar, lettuce, tomato, and house sauce",
            8.99,
            "/img/classic-cheeseburger.jpg",
        ));
        items.push(MenuItem::new(
            burgers_id,
            "Bacon Deluxe Burger",
            "Angus patty with crispy bacon, swiss, and caramelized onions",
            10.99,
            "/img/bacon-deluxe.jpg",
        ));
        items.push(MenuItem::new(
            burgers_id,
            "Truffle Fries",
            "Crispy fries tossed in truffle oil and parmesan",
            4.99,
            "/img/truffle-fries.jpg",
        ));
        items.push(MenuItem::new(
            burgers_id,
            "Chocolate Milkshake",
            "Creamy chocolate milkshake topped with whipped cream",
            5.49,
            "/img/chocolate-milkshake.jpg",
        ));

        let pizza = demo_restaurant(
            "Pizza Heaven",
            "Italian",
            4.7,
            "30-45 min",
            "$1.99",
            "456 Elm St, Anytown, USA",
            "(555) 987-6543",
            "11:00 AM - 11:00 PM",
        );
        let pizza_id = pizza.id();
        restaurants.push(pizza);
        items.push(MenuItem::new(
            pizza_id,
            "Margherita Pizza",
            "Tomato sauce, mozzarella, fresh basil, and olive oil",
            12.99,
            "/img/margherita.jpg",
        ));
        items.push(MenuItem::new(
            pizza_id,
            "Pepperoni Pizza",
            "Tomato sauce, mozzarella, and pepperoni slices",
            14.99,
            "/img/pepperoni.jpg",
        ));
        items.push(MenuItem::new(
            pizza_id,
            "Garlic Bread",
            "Warm bread with garlic butter and herbs",
            3.99,
            "/img/garlic-bread.jpg",
        ));
        items.push(MenuItem::new(
            pizza_id,
            "Caesar Salad",
            "Romaine, croutons, parmesan, and Caesar dressing",
            7.99,
            "/img/caesar-salad.jpg",
        ));

        let sushi = demo_restaurant(
            "Sushi Express",
            "Japanese",
            4.8,
            "40-55 min",
            "$3.99",
            "789 Oak Ave, Anytown, USA",
            "(555) 234-5678",
            "12:00 PM - 9:30 PM",
        );
        let sushi_id = sushi.id();
        restaurants.push(sushi);
        items.push(MenuItem::new(
            sushi_id,
            "California Roll",
            "Crab, avocado, cucumber, and tobiko",
            8.99,
            "/img/california-roll.jpg",
        ));
        items.push(MenuItem::new(
            sushi_id,
            "Salmon Nigiri",
            "Fresh salmon slices on seasoned rice (2 pieces)",
            6.99,
            "/img/salmon-nigiri.jpg",
        ));
        items.push(MenuItem::new(
            sushi_id,
            "Spicy Tuna Roll",
            "Spicy tuna, cucumber, and spring onion",
            9.99,
            "/img/spicy-tuna-roll.jpg",
        ));
        items.push(MenuItem::new(
            sushi_id,
            "Miso Soup",
            "Tofu, seaweed, and green onion",
            3.49,
            "/img/miso-soup.jpg",
        ));

        let tacos = demo_restaurant(
            "Taco Town",
            "Mexican",
            4.3,
            "20-30 min",
            "$2.49",
            "101 Pine Rd, Anytown, USA",
            "(555) 345-6789",
            "11:00 AM - 10:00 PM",
        );
        let tacos_id = tacos.id();
        restaurants.push(tacos);
        items.push(MenuItem::new(
            tacos_id,
            "Street Tacos",
            "Three corn tortillas with seasoned beef, onion, cilantro, and lime",
            7.99,
            "/img/street-tacos.jpg",
        ));
        items.push(MenuItem::new(
            tacos_id,
            "Chicken Quesadilla",
            "Flour tortilla filled with grilled chicken, cheese, and peppers",
            9.99,
            "/img/chicken-quesadilla.jpg",
        ));
        items.push(MenuItem::new(
            tacos_id,
            "Nachos Supreme",
            "Tortilla chips with beans, cheese, jalapenos, sour cream, and guacamole",
            8.49,
            "/img/nachos-supreme.jpg",
        ));
        items.push(MenuItem::new(
            tacos_id,
            "Churros",
            "Fried dough pastry with cinnamon sugar and chocolate dipping sauce",
            4.99,
            "/img/churros.jpg",
        ));

        let curry = demo_restaurant(
            "Curry House",
            "Indian",
            4.6,
            "35-50 min",
            "$2.99",
            "202 Cedar Blvd, Anytown, USA",
            "(555) 456-7890",
            "12:00 PM - 10:30 PM",
        );
        let curry_id = curry.id();
        restaurants.push(curry);
        items.push(MenuItem::new(
            curry_id,
            "Butter Chicken",
            "Tender chicken in a creamy tomato sauce with aromatic spices",
            14.99,
            "/img/butter-chicken.jpg",
        ));
        items.push(MenuItem::new(
            curry_id,
            "Vegetable Biryani",
            "Fragrant basmati rice with mixed vegetables and aromatic spices",
            11.99,
            "/img/vegetable-biryani.jpg",
        ));
        items.push(MenuItem::new(
            curry_id,
            "Garlic Naan",
            "Soft Indian bread with garlic and butter",
            3.49,
            "/img/garlic-naan.jpg",
        ));
        items.push(MenuItem::new(
            curry_id,
            "Mango Lassi",
            "Yogurt drink with mango puree and cardamom",
            4.49,
            "/img/mango-lassi.jpg",
        ));

        Catalog::new(restaurants, items)
    }
}

fn demo_restaurant(
    name: &str,
    cuisine: &str,
    rating: f32,
    delivery_time: &str,
    delivery_fee: &str,
    address: &str,
    phone: &str,
    open_hours: &str,
) -> Restaurant {
    Restaurant {
        meta: infra::documents::DocMeta::new_with_id(Restaurant::id_for(name)),
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        rating,
        delivery_time: delivery_time.to_string(),
        delivery_fee: delivery_fee.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        open_hours: open_hours.to_string(),
        image_url: format!("/img/{}.jpg", slug(name)),
        cover_image_url: format!("/img/{}-cover.jpg", slug(name)),
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

impl Request for ShowRestaurants {
    type Resp = Vec<Restaurant>;
}

impl Queryable<ShowRestaurants> for Catalog {
    fn query(&self, _: ShowRestaurants) -> anyhow::Result<Vec<Restaurant>> {
        Ok(self.restaurants.clone())
    }
}

impl Request for ShowMenu {
    type Resp = Vec<MenuItem>;
}

impl Queryable<ShowMenu> for Catalog {
    fn query(&self, req: ShowMenu) -> anyhow::Result<Vec<MenuItem>> {
        Ok(self
            .menu_for(req.restaurant_id)
            .into_iter()
            .cloned()
            .collect())
    }
}
