//! Turn raw model text into the nested `MenuResult`.
//!
//! Validation runs over the parsed `serde_json::Value` rather than through
//! `serde` so that every bad field is reported in one pass, with a JSON path.
//! Grouping keeps first-appearance order at every level.

use chrono::{DateTime, SecondsFormat, Utc};
use gemini_client::strip_code_blocks;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::common::{FieldViolation, MalformedResponseError, PipelineError, SchemaValidationError};
use crate::domains::menus::models::{
    FlatMenuItem, FlatMenuResponse, FlatVariation, Menu, MenuItem, MenuResult, MenuSection,
    MenuVariation, UNKNOWN_RESTAURANT,
};

/// Used when the model leaves `currency` blank.
pub const DEFAULT_CURRENCY: &str = "USD";

const MISSING: &str = "missing required field";

/// Reconcile using the current time as the fallback `last_updated`.
pub fn reconcile(raw: &str) -> Result<MenuResult, PipelineError> {
    reconcile_at(raw, Utc::now())
}

/// Reconcile with an explicit clock.
pub fn reconcile_at(raw: &str, now: DateTime<Utc>) -> Result<MenuResult, PipelineError> {
    let cleaned = strip_code_blocks(raw);
    let value: Value = serde_json::from_str(cleaned).map_err(MalformedResponseError::from)?;
    let response = validate_flat_response(&value)?;
    Ok(rebuild_menus(response, now))
}

/// Check the parsed value against the flat shape, collecting every violation.
pub fn validate_flat_response(value: &Value) -> Result<FlatMenuResponse, SchemaValidationError> {
    let Some(root) = value.as_object() else {
        return Err(SchemaValidationError {
            violations: vec![FieldViolation::new("$", "expected object")],
        });
    };

    let mut checks = Checks::default();
    let restaurant_name = checks.optional_string(root, "restaurantName", "");
    let last_updated = checks.optional_string(root, "lastUpdated", "");

    let items = match root.get("items") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| checks.item(index, item))
            .collect(),
        Some(_) => {
            checks.push("items", "expected array");
            Vec::new()
        }
        None => {
            checks.push("items", MISSING);
            Vec::new()
        }
    };

    if !checks.violations.is_empty() {
        return Err(SchemaValidationError {
            violations: checks.violations,
        });
    }

    Ok(FlatMenuResponse {
        restaurant_name,
        last_updated,
        items,
    })
}

#[derive(Default)]
struct Checks {
    violations: Vec<FieldViolation>,
}

fn join(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Checks {
    fn push(&mut self, path: impl Into<String>, problem: impl Into<String>) {
        self.violations.push(FieldViolation::new(path, problem));
    }

    fn required_string(
        &mut self,
        obj: &Map<String, Value>,
        field: &str,
        parent: &str,
    ) -> Option<String> {
        match obj.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.push(
                    join(parent, field),
                    format!("expected string, got {}", type_name(other)),
                );
                None
            }
            None => {
                self.push(join(parent, field), MISSING);
                None
            }
        }
    }

    fn optional_string(
        &mut self,
        obj: &Map<String, Value>,
        field: &str,
        parent: &str,
    ) -> Option<String> {
        match obj.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.push(
                    join(parent, field),
                    format!("expected string or null, got {}", type_name(other)),
                );
                None
            }
        }
    }

    /// Required non-negative number; an explicit null means "not found" and becomes 0.
    fn amount(
        &mut self,
        obj: &Map<String, Value>,
        field: &str,
        parent: &str,
        allow_negative: bool,
    ) -> Option<f64> {
        match obj.get(field) {
            Some(Value::Null) => Some(0.0),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(amount) if amount < 0.0 && !allow_negative => {
                    self.push(join(parent, field), "must not be negative");
                    None
                }
                Some(amount) => Some(amount),
                None => {
                    self.push(join(parent, field), "not representable as a number");
                    None
                }
            },
            Some(other) => {
                self.push(
                    join(parent, field),
                    format!("expected number, got {}", type_name(other)),
                );
                None
            }
            None => {
                self.push(join(parent, field), MISSING);
                None
            }
        }
    }

    fn item(&mut self, index: usize, value: &Value) -> Option<FlatMenuItem> {
        let path = format!("items[{}]", index);
        let Some(obj) = value.as_object() else {
            self.push(path, format!("expected object, got {}", type_name(value)));
            return None;
        };

        let menu_name = self.required_string(obj, "menuName", &path);
        let section_name = self.required_string(obj, "sectionName", &path);
        let name = self.required_string(obj, "name", &path);
        let description = self.optional_string(obj, "description", &path);
        let price = self.amount(obj, "price", &path, false);
        let currency = self.required_string(obj, "currency", &path);
        let image_url = self.optional_string(obj, "imageUrl", &path);
        let variations = self.variations(obj, &path);

        Some(FlatMenuItem {
            menu_name: menu_name?,
            section_name: section_name?,
            name: name?,
            description,
            price: price?,
            currency: currency?,
            image_url,
            variations: variations?,
        })
    }

    fn variations(
        &mut self,
        obj: &Map<String, Value>,
        parent: &str,
    ) -> Option<Option<Vec<FlatVariation>>> {
        let list = match obj.get("variations") {
            None | Some(Value::Null) => return Some(None),
            Some(Value::Array(list)) => list,
            Some(other) => {
                self.push(
                    join(parent, "variations"),
                    format!("expected array or null, got {}", type_name(other)),
                );
                return None;
            }
        };

        let mut parsed = Vec::with_capacity(list.len());
        let mut valid = true;
        for (index, value) in list.iter().enumerate() {
            let path = format!("{}.variations[{}]", parent, index);
            let Some(variation) = value.as_object() else {
                self.push(path, format!("expected object, got {}", type_name(value)));
                valid = false;
                continue;
            };

            let name = self.required_string(variation, "name", &path);
            // Add-on and choice deltas may legitimately be negative (e.g. "no cheese -1")
            let price_adj = self.amount(variation, "priceAdj", &path, true);
            match (name, price_adj) {
                (Some(name), Some(price_adj)) => parsed.push(FlatVariation { name, price_adj }),
                _ => valid = false,
            }
        }

        valid.then_some(Some(parsed))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Group flat items into menus and sections, preserving first-appearance order.
pub fn rebuild_menus(response: FlatMenuResponse, now: DateTime<Utc>) -> MenuResult {
    let mut grouped: IndexMap<String, IndexMap<String, Vec<MenuItem>>> = IndexMap::new();

    for item in response.items {
        let FlatMenuItem {
            menu_name,
            section_name,
            name,
            description,
            price,
            currency,
            image_url,
            variations,
        } = item;

        let menu_item = MenuItem {
            name,
            description: description.unwrap_or_default(),
            price,
            currency: non_blank(Some(currency)).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            variations: variations
                .unwrap_or_default()
                .into_iter()
                .map(|v| MenuVariation {
                    name: v.name,
                    price_adj: v.price_adj,
                })
                .collect(),
            image_url: non_blank(image_url),
        };

        grouped
            .entry(menu_name.trim().to_string())
            .or_default()
            .entry(section_name.trim().to_string())
            .or_default()
            .push(menu_item);
    }

    let menus = grouped
        .into_iter()
        .map(|(menu_name, sections)| Menu {
            menu_name,
            sections: sections
                .into_iter()
                .map(|(section_name, items)| MenuSection { section_name, items })
                .collect(),
        })
        .collect();

    MenuResult {
        restaurant_name: non_blank(response.restaurant_name)
            .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string()),
        last_updated: non_blank(response.last_updated)
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        menus,
    }
}
