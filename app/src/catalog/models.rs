use serde::{Deserialize, Serialize};

use infra::documents::{DocMeta, HasMeta};
use infra::ids::{Entity, Id};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    #[serde(flatten)]
    pub(crate) meta: DocMeta<Restaurant>,
    pub name: String,
    pub cuisine: String,
    pub rating: f32,
    pub delivery_time: String,
    pub delivery_fee: String,
    pub address: String,
    pub phone: String,
    pub open_hours: String,
    pub image_url: String,
    pub cover_image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    #[serde(flatten)]
    pub(crate) meta: DocMeta<MenuItem>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub restaurant_id: Id<Restaurant>,
}

impl Restaurant {
    /// Restaurants are content-addressed by name; the catalog never holds
    /// two with the same name.
    pub fn id_for(name: &str) -> Id<Restaurant> {
        Id::hashed(&name)
    }
}

impl MenuItem {
    pub fn new(
        restaurant_id: Id<Restaurant>,
        name: &str,
        description: &str,
        price: f64,
        image_url: &str,
    ) -> Self {
        // Hashed on (restaurant, name) so the same dish name at two
        // restaurants stays distinct.
        let id = Id::hashed(&(restaurant_id, name));
        MenuItem {
            meta: DocMeta::new_with_id(id),
            name: name.to_string(),
            description: description.to_string(),
            price,
            image_url: image_url.to_string(),
            restaurant_id,
        }
    }
}

impl Entity for Restaurant {
    const PREFIX: &'static str = "restaurant";
}

impl HasMeta for Restaurant {
    fn meta(&self) -> &DocMeta<Restaurant> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut DocMeta<Restaurant> {
        &mut self.meta
    }
}

impl Entity for MenuItem {
    const PREFIX: &'static str = "item";
}

impl HasMeta for MenuItem {
    fn meta(&self) -> &DocMeta<MenuItem> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut DocMeta<MenuItem> {
        &mut self.meta
    }
}
