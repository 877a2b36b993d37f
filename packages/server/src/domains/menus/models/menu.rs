use serde::{Deserialize, Serialize};

/// A named price alternative attached to an item.
///
/// `price_adj` is the absolute price for size tiers and the extra cost for
/// add-ons and priced choices. Unpriced choices carry 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuVariation {
    pub name: String,
    pub price_adj: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: String,
    /// Always >= 0. Unresolved prices are 0.
    pub price: f64,
    pub currency: String,
    pub variations: Vec<MenuVariation>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub section_name: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub menu_name: String,
    pub sections: Vec<MenuSection>,
}

/// Extracted menus for one restaurant page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuResult {
    pub restaurant_name: String,
    /// ISO-8601 timestamp
    pub last_updated: String,
    pub menus: Vec<Menu>,
}
