//! Flat wire shape the model is asked to produce.
//!
//! The natural menu → section → item → variation nesting is deeper than the
//! model interface accepts for `responseSchema`, so every item carries its own
//! menu and section labels instead. These types never leave the reconciler.

use schemars::JsonSchema;
use serde::Deserialize;

/// Fallback when the model reports no restaurant name.
pub const UNKNOWN_RESTAURANT: &str = "Not Found";

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatVariation {
    /// Variation label, e.g. "Large", "Add Bacon", "Choice: Salmon"
    pub name: String,
    /// Absolute price for size tiers; extra cost for add-ons and choices
    pub price_adj: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatMenuItem {
    /// Name of the menu this item belongs to, e.g. "Dinner"
    pub menu_name: String,
    /// Name of the section within the menu, e.g. "Appetizers"
    pub section_name: String,
    /// Item name
    pub name: String,
    /// Plain-text description without markup
    pub description: Option<String>,
    /// Base price as a number, 0 when not found
    pub price: f64,
    /// ISO 4217 code, "USD" unless another is explicit
    pub currency: String,
    /// Absolute image URL
    pub image_url: Option<String>,
    pub variations: Option<Vec<FlatVariation>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatMenuResponse {
    /// Restaurant name, "Not Found" when no menu is detected
    pub restaurant_name: Option<String>,
    /// ISO-8601 timestamp of extraction
    pub last_updated: Option<String>,
    /// One entry per menu item, in page order
    pub items: Vec<FlatMenuItem>,
}
