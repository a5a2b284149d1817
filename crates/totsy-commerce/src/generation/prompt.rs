//! Prompt text sent to the generation service.

use crate::generation::service::ExplanationRequest;

/// Categories the list prompt suggests; the service may pick others.
const EXAMPLE_CATEGORIES: &[&str] = &[
    "Feeding",
    "Sleep",
    "Diapering",
    "Travel",
    "Safety",
    "Clothing",
    "Bath Time",
    "Play & Development",
    "Nursery Setup",
    "Postpartum Care",
];

/// Most items requested per category.
pub const MAX_ITEMS_PER_CATEGORY: usize = 10;

/// Prompt asking for a complete, categorized product list as JSON.
pub fn build_list_prompt(user_input: &str) -> String {
    let request = quote(user_input);
    format!(
        r#"You are TotsyList, a baby product shopping expert and a parent's best friend. Build one comprehensive list of everything they need to buy for: "{request}"

Return ONLY valid JSON, no markdown and no extra text, with this structure:
{{
  "summary": {{
    "due_date": "one line naming the parent's situation, e.g. 'Baby shower' or 'First month with newborn'",
    "budget": "budget | midtier | premium",
    "key_prefs": ["preferences taken from the request"],
    "disclaimers": ["Generated recommendations based on the parent's needs"]
  }},
  "categories": [
    {{
      "category": "Category Name",
      "priority": "essential",
      "items": [
        {{
          "name": "Product Name",
          "brand": "Brand Name",
          "why": "Brief reason this product fits their needs",
          "eco_friendly": true,
          "est_price_usd": 25,
          "url": "https://retailer.example/product"
        }}
      ]
    }}
  ]
}}

Rules:
- Create 3 to 5 categories that best match the request. Examples: {categories}.
- Rank products in each category from most to least necessary and return at most {max_items}.
- Give every product a direct purchase link from a major retailer.
- Respect any budget and preferences in the request.
- Mark each category "essential" or "nice_to_have".

Return ONLY the JSON."#,
        request = request,
        categories = EXAMPLE_CATEGORIES.join(", "),
        max_items = MAX_ITEMS_PER_CATEGORY,
    )
}

/// Prompt asking why a specific recommendation fits the request.
pub fn build_explanation_prompt(request: &ExplanationRequest) -> String {
    let user_input = quote(&request.user_input);
    format!(
        r#"You are TotsyList, a baby product expert. A parent asked: "{user_input}"

You recommended "{product}" by {brand} in the {category} category because: "{why}"

In 2-3 sentences, explain why THIS product fits THEIR situation:
1. Which part of "{user_input}" led to this choice.
2. What makes it the best fit among options in this category.
3. How it addresses their stated needs or preferences.

Be direct and specific. Avoid generic product benefits."#,
        user_input = user_input,
        product = quote(&request.product_name),
        brand = quote(&request.brand),
        category = quote(&request.category),
        why = quote(&request.why),
    )
}

/// Keep user text from closing the surrounding quotes.
fn quote(text: &str) -> String {
    text.trim().replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_prompt_embeds_request() {
        let prompt = build_list_prompt("  Twins due in March, small \"apartment\" ");
        assert!(prompt.contains(r#"for: "Twins due in March, small 'apartment'""#));
        assert!(prompt.contains("\"summary\": {"));
        assert!(prompt.contains("at most 10"));
    }

    #[test]
    fn test_explanation_prompt_names_product() {
        let request = ExplanationRequest {
            product_name: "Hatch Rest".into(),
            brand: "Hatch".into(),
            category: "Sleep".into(),
            user_input: "light sleeper".into(),
            why: "Sound and light in one".into(),
        };
        let prompt = build_explanation_prompt(&request);
        assert!(prompt.contains("\"Hatch Rest\" by Hatch in the Sleep category"));
        assert!(prompt.contains("A parent asked: \"light sleeper\""));
    }
}
