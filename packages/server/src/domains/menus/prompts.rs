//! Model instructions for menu extraction.
//!
//! The system instruction is fixed; the user prompt carries the reduced page.

use super::actions::ReducedContent;

/// Fixed instruction sent as the system turn of every extraction call.
pub const MENU_EXTRACTION_INSTRUCTION: &str = r#"You extract restaurant menus from web pages. You receive either cleaned page HTML or a JSON-LD (application/ld+json) document taken from the page, and you return one JSON object that follows the response schema exactly.

## What to extract
- Work only from the main content. Skip site navigation, headers, footers, cookie banners and advertising.
- If JSON-LD is given, use its restaurant name and any Menu / MenuSection / MenuItem data it contains.
- A menu is a titled collection of sections (for example "Lunch", "Dinner", "Drinks"). When the page shows a single unnamed menu, use "Menu" as its name.
- A section is a titled group of items inside a menu (for example "Appetizers"). When items have no section heading, use "Menu Items".
- An item is a name paired with a price or a "Market Price" marker.

## Output shape
Return a flat list. Every entry in `items` is one dish and repeats the `menuName` and `sectionName` it belongs to. Keep the order in which items appear on the page. Set `restaurantName` to the restaurant's name, or "Not Found" when no menu is present (and return an empty `items` list). Set `lastUpdated` only when the page states when the menu was last updated, as an ISO-8601 timestamp; otherwise omit it.

## Field rules
- price: a plain number ("$12.99" becomes 12.99). Use the lowest price when several sizes are listed. Use 0 when no price is shown.
- currency: an ISO 4217 code. Use "USD" unless the page clearly shows another currency.
- description: plain text with markup removed and whitespace collapsed. Leave out size, add-on and choice text; those belong in variations. Omit when there is none.
- imageUrl: absolute URL of the item's image from an <img> tag or a background-image style inside the item. Omit when there is none.

## Variations
Fill `variations` whenever an item shows any of the following; leave it out only when none apply.
- Size tiers (Small / Medium / Large, Half / Full, Regular, Family, XL, 1/2 lb, per pound or per kg, or several prices on one item): one variation per tier, and `priceAdj` is the ABSOLUTE price of that tier, not a difference.
- Add-ons ("Add", "Extra", "+$", "supplement", "optional"): `name` is the add-on, `priceAdj` is the extra cost as a positive number.
- Choices ("Choice of", "Choose", "Select", "Served with", "Option", "A or B", modifier groups, radio buttons, dropdowns): name them "Choice: <option>". `priceAdj` is the extra cost over the base price, or 0 when the choice costs nothing extra.
Structural hints: nested lists inside an item, classes containing modifier / option / variant / addon / size / choice / extra, data-price or data-option attributes, tables with several price columns, repeated price patterns such as "$10 / $14 / $18".

Return only the JSON object. Do not wrap it in Markdown code fences and do not add any explanation."#;

/// User turn for the given reduced content.
pub fn build_user_prompt(content: &ReducedContent) -> String {
    match content {
        ReducedContent::Structured { payload } => {
            let json =
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
            format!(
                "Extract the menu from this JSON-LD document found on the page.\n\n### JSON-LD\n{}",
                json
            )
        }
        ReducedContent::Markup { content, truncated } => {
            let note = if *truncated {
                "\n\nThe HTML was cut off at a size limit; extract what is present and do not invent the rest."
            } else {
                ""
            };
            format!(
                "Extract the menu from this page HTML.{}\n\n### HTML\n{}",
                note, content
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_prompt_embeds_html() {
        let prompt = build_user_prompt(&ReducedContent::Markup {
            content: "<h2>Soups</h2>".into(),
            truncated: false,
        });

        assert!(prompt.contains("### HTML\n<h2>Soups</h2>"));
        assert!(!prompt.contains("cut off"));
    }

    #[test]
    fn truncated_markup_is_flagged() {
        let prompt = build_user_prompt(&ReducedContent::Markup {
            content: "<p>x</p>...[truncated]".into(),
            truncated: true,
        });

        assert!(prompt.contains("cut off"));
    }

    #[test]
    fn structured_prompt_embeds_json() {
        let prompt = build_user_prompt(&ReducedContent::Structured {
            payload: serde_json::json!({"@type": "Restaurant", "name": "Luigi's"}),
        });

        assert!(prompt.contains("### JSON-LD"));
        assert!(prompt.contains("\"name\": \"Luigi's\""));
    }

    #[test]
    fn instruction_fixes_size_tier_semantics() {
        assert!(MENU_EXTRACTION_INSTRUCTION.contains("ABSOLUTE price"));
        assert!(MENU_EXTRACTION_INSTRUCTION.contains("\"USD\""));
    }
}
