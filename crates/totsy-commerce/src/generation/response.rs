//! Parsing of generated shopping lists.
//!
//! The generation service is an untrusted producer. Only `name`, `why` and
//! `eco_friendly` are required on items, and `category`, `priority` and
//! `items` on categories; everything else falls back to a default.

use crate::error::GenerationError;
use crate::lists::NewItem;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Spending tier reported in the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Budget,
    Midtier,
    Premium,
    /// Missing or not one of the known tiers.
    #[default]
    Unknown,
}

impl BudgetTier {
    fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "budget" => BudgetTier::Budget,
            "midtier" | "mid-tier" | "mid tier" => BudgetTier::Midtier,
            "premium" => BudgetTier::Premium,
            _ => BudgetTier::Unknown,
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetTier::Budget => "budget",
            BudgetTier::Midtier => "midtier",
            BudgetTier::Premium => "premium",
            BudgetTier::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Accepts any JSON value; non-string or unrecognized values become `Unknown`.
fn lenient_budget<'de, D>(deserializer: D) -> Result<BudgetTier, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .map(BudgetTier::from_label)
        .unwrap_or_default())
}

/// How important a category is for the parent's situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Essential,
    NiceToHave,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Essential => f.write_str("essential"),
            Priority::NiceToHave => f.write_str("nice to have"),
        }
    }
}

/// Summary block of a generated list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListSummary {
    /// Despite the name, the service puts a one-line description of the
    /// parent's situation here (e.g. "Baby shower").
    #[serde(default)]
    pub due_date: String,
    #[serde(default, deserialize_with = "lenient_budget")]
    pub budget: BudgetTier,
    #[serde(default)]
    pub key_prefs: Vec<String>,
    #[serde(default)]
    pub disclaimers: Vec<String>,
}

/// A generated product suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_price_usd: Option<f64>,
    pub why: String,
    pub eco_friendly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&ProductItem> for NewItem {
    fn from(item: &ProductItem) -> Self {
        NewItem {
            name: item.name.clone(),
            brand: item.brand.clone(),
            why: item.why.clone(),
            eco_friendly: item.eco_friendly,
            est_price_usd: item.est_price_usd,
            url: item.url.clone(),
        }
    }
}

/// A group of generated items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBlock {
    pub category: String,
    pub priority: Priority,
    pub items: Vec<ProductItem>,
}

/// A generated shopping list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedList {
    #[serde(default)]
    pub summary: ListSummary,
    #[serde(default)]
    pub categories: Vec<CategoryBlock>,
}

impl GeneratedList {
    /// The structurally valid, empty list shown when generation fails.
    pub fn fallback(error: &GenerationError) -> Self {
        let mut disclaimer = format!("Generation service error: {}.", error);
        if error.is_credential_problem() {
            disclaimer.push_str(" Please check your API key.");
        }

        Self {
            summary: ListSummary {
                due_date: "Error occurred".to_string(),
                budget: BudgetTier::Unknown,
                key_prefs: Vec::new(),
                disclaimers: vec![disclaimer],
            },
            categories: Vec::new(),
        }
    }

    /// Every item across all categories, in order.
    pub fn items(&self) -> impl Iterator<Item = &ProductItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Total number of items.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Copies of every item, ready to add to a user list.
    pub fn saved_items(&self) -> Vec<NewItem> {
        self.items().map(NewItem::from).collect()
    }

    /// Categories marked essential.
    pub fn essentials(&self) -> impl Iterator<Item = &CategoryBlock> {
        self.categories
            .iter()
            .filter(|c| c.priority == Priority::Essential)
    }
}

/// Remove a Markdown code fence (```` ```json ```` or bare ```` ``` ````)
/// wrapped around a response.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[newline + 1..]
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse raw service output into a [`GeneratedList`].
pub fn parse_generated_list(text: &str) -> Result<GeneratedList, GenerationError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "summary": {
            "due_date": "Baby shower",
            "budget": "midtier",
            "key_prefs": ["eco"],
            "disclaimers": ["Generated recommendations based on the parent's needs"]
        },
        "categories": [
            {
                "category": "Feeding",
                "priority": "essential",
                "items": [
                    {"name": "Bottle", "brand": "Comotomo", "why": "Easy latch", "eco_friendly": true, "est_price_usd": 25},
                    {"name": "Bibs", "why": "Messy", "eco_friendly": false}
                ]
            },
            {
                "category": "Play",
                "priority": "nice_to_have",
                "items": [{"name": "Play mat", "why": "Tummy time", "eco_friendly": false, "age_range": "0-6m"}]
            }
        ]
    }"#;

    #[test]
    fn test_parse_full_document() {
        let list = parse_generated_list(SAMPLE).unwrap();
        assert_eq!(list.summary.due_date, "Baby shower");
        assert_eq!(list.summary.budget, BudgetTier::Midtier);
        assert_eq!(list.categories.len(), 2);
        assert_eq!(list.item_count(), 3);
        assert_eq!(list.essentials().count(), 1);
        assert_eq!(list.categories[1].priority, Priority::NiceToHave);
    }

    #[test]
    fn test_code_fences_stripped() {
        let fenced = format!("```json\n{}\n```", SAMPLE);
        assert_eq!(parse_generated_list(&fenced).unwrap().item_count(), 3);

        let bare = format!("  ```\n{}\n```  ", SAMPLE);
        assert_eq!(parse_generated_list(&bare).unwrap().item_count(), 3);

        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{}"), "{}");
    }

    #[test]
    fn test_optional_fields_default() {
        let list = parse_generated_list(r#"{"categories": []}"#).unwrap();
        assert_eq!(list.summary, ListSummary::default());

        let freeform = r#"{"summary": {"budget": "around $500"}, "categories": []}"#;
        let list = parse_generated_list(freeform).unwrap();
        assert_eq!(list.summary.budget, BudgetTier::Unknown);

        let numeric = r#"{"summary": {"budget": 500}}"#;
        assert_eq!(parse_generated_list(numeric).unwrap().summary.budget, BudgetTier::Unknown);
    }

    #[test]
    fn test_required_item_fields_enforced() {
        let missing_why = r#"{"categories": [{"category": "Bath", "priority": "essential",
            "items": [{"name": "Tub", "eco_friendly": true}]}]}"#;
        assert!(matches!(
            parse_generated_list(missing_why),
            Err(GenerationError::Malformed(_))
        ));

        let bad_priority = r#"{"categories": [{"category": "Bath", "priority": "urgent", "items": []}]}"#;
        assert!(parse_generated_list(bad_priority).is_err());
    }

    #[test]
    fn test_garbage_and_empty() {
        assert!(matches!(
            parse_generated_list("Sure! Here is your list"),
            Err(GenerationError::Malformed(_))
        ));
        assert_eq!(parse_generated_list("```\n```"), Err(GenerationError::EmptyResponse));
        assert_eq!(parse_generated_list("   "), Err(GenerationError::EmptyResponse));
    }

    #[test]
    fn test_saved_items_copy_values() {
        let list = parse_generated_list(SAMPLE).unwrap();
        let items = list.saved_items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].brand.as_deref(), Some("Comotomo"));
        assert_eq!(items[0].est_price_usd, Some(25.0));
        assert!(items[0].eco_friendly);
        assert_eq!(items[1].brand, None);
    }

    #[test]
    fn test_fallback_shape() {
        let fallback = GeneratedList::fallback(&GenerationError::MissingCredential(
            "GENERATION_API_KEY not set".into(),
        ));
        assert_eq!(fallback.summary.due_date, "Error occurred");
        assert_eq!(fallback.summary.budget, BudgetTier::Unknown);
        assert!(fallback.categories.is_empty());
        assert!(fallback.summary.disclaimers[0].ends_with("Please check your API key."));

        let json = serde_json::to_value(&fallback).unwrap();
        assert_eq!(json["summary"]["budget"], "unknown");

        let timeout = GeneratedList::fallback(&GenerationError::Transport("timed out".into()));
        assert!(!timeout.summary.disclaimers[0].contains("API key"));
    }
}
