//! Canned pages and model payloads.

use serde_json::{json, Value};

/// Flat model payload with one item per `(menu, section, name, price)`.
pub fn flat_menu(restaurant: &str, items: &[(&str, &str, &str, f64)]) -> Value {
    json!({
        "restaurantName": restaurant,
        "items": items
            .iter()
            .map(|(menu, section, name, price)| json!({
                "menuName": menu,
                "sectionName": section,
                "name": name,
                "price": price,
                "currency": "USD"
            }))
            .collect::<Vec<_>>()
    })
}

/// Single-item menu for `restaurant`.
pub fn simple_menu(restaurant: &str) -> String {
    flat_menu(restaurant, &[("Menu", "Mains", "House Special", 14.0)]).to_string()
}

/// Minimal page whose body mentions `marker`, so a routed mock can tell pages apart.
pub fn page(marker: &str) -> String {
    format!(
        "<html><head><title>{0}</title></head><body><h1>{0}</h1><p>Noodles $12</p></body></html>",
        marker
    )
}

/// Page carrying a JSON-LD restaurant block.
pub fn ld_json_page(name: &str) -> String {
    format!(
        r#"<html><head><script type="application/ld+json">{{"@type":"Restaurant","name":"{}","hasMenu":{{"@type":"Menu","name":"Dinner"}}}}</script></head><body><p>ignored body</p></body></html>"#,
        name
    )
}

/// Gemini `generateContent` success envelope around `text`.
pub fn gemini_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 20, "totalTokenCount": 30 }
    })
}
