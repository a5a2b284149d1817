//! User list, item, vote and comment types.
//!
//! Field names serialize in the same shape the web client keeps in local
//! storage (camelCase lists and votes, snake_case item fields), so
//! snapshots written by either side load in the other.

use crate::catalog::Product;
use crate::ids::{CommentId, ItemId, ListId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Author label used when none is given for a list.
pub const DEFAULT_LIST_AUTHOR: &str = "User";

/// Author label used when none is given for a comment.
pub const DEFAULT_COMMENT_AUTHOR: &str = "Anonymous User";

/// A vote direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "up",
            Vote::Down => "down",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "+" | "+1" => Ok(Vote::Up),
            "down" | "-" | "-1" => Ok(Vote::Down),
            other => Err(format!("unknown vote direction: {}", other)),
        }
    }
}

/// Vote tally for one item plus this client's active vote.
///
/// Invariant: each counter equals the number of times its direction was
/// the active vote recorded by this client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Votes {
    #[serde(default)]
    pub thumbs_up: u32,
    #[serde(default)]
    pub thumbs_down: u32,
    #[serde(default)]
    pub user_vote: Option<Vote>,
}

impl Votes {
    /// Make `vote` the active vote.
    ///
    /// Re-voting the active direction changes nothing and returns `false`.
    /// Otherwise the previous direction (if any) is retracted, the new one
    /// counted, and `true` returned.
    pub fn apply(&mut self, vote: Vote) -> bool {
        if self.user_vote == Some(vote) {
            return false;
        }

        match self.user_vote {
            Some(Vote::Up) => self.thumbs_up = self.thumbs_up.saturating_sub(1),
            Some(Vote::Down) => self.thumbs_down = self.thumbs_down.saturating_sub(1),
            None => {}
        }

        match vote {
            Vote::Up => self.thumbs_up = self.thumbs_up.saturating_add(1),
            Vote::Down => self.thumbs_down = self.thumbs_down.saturating_add(1),
        }
        self.user_vote = Some(vote);
        true
    }

    /// Net score (up minus down).
    pub fn net(&self) -> i64 {
        i64::from(self.thumbs_up) - i64::from(self.thumbs_down)
    }
}

/// A comment on a saved item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// An item saved into a user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedListItem {
    /// Unique within the owning list.
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Why the item is on the list.
    pub why: String,
    pub eco_friendly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_price_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub votes: Votes,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl SavedListItem {
    /// Create an item with no votes and no comments.
    pub fn from_new(id: ItemId, item: NewItem) -> Self {
        Self {
            id,
            name: item.name,
            brand: item.brand,
            why: item.why,
            eco_friendly: item.eco_friendly,
            est_price_usd: item.est_price_usd,
            url: item.url,
            votes: Votes::default(),
            comments: Vec::new(),
        }
    }
}

/// A user-created list.
///
/// The serialized form is the persisted snapshot, so it carries
/// `shareCode` even while the list is private: the code is generated once
/// and must survive reloads. Use [`UserList::public_view`] before handing a
/// list to anything outside the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    pub id: ListId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<SavedListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,
    /// Generated once; persisted while the list is private, but only
    /// exposed through [`UserList::share_code`] while it is public.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_code: Option<String>,
    #[serde(default = "default_list_author")]
    pub author: String,
}

fn default_list_author() -> String {
    DEFAULT_LIST_AUTHOR.to_string()
}

impl UserList {
    /// Get an item by ID.
    pub fn item(&self, item_id: &ItemId) -> Option<&SavedListItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: &ItemId) -> Option<&mut SavedListItem> {
        self.items.iter_mut().find(|i| &i.id == item_id)
    }

    /// The share code, only while the list is public.
    pub fn share_code(&self) -> Option<&str> {
        if self.is_public {
            self.share_code.as_deref()
        } else {
            None
        }
    }

    /// Copy for display or export, without the share code while private.
    pub fn public_view(&self) -> UserList {
        let mut view = self.clone();
        if !view.is_public {
            view.share_code = None;
        }
        view
    }

    /// Read-view path for a public list.
    pub fn share_path(&self) -> Option<String> {
        self.share_code().map(|code| format!("/shared/{}", code))
    }

    /// Sum of the known estimated prices.
    pub fn estimated_total(&self) -> f64 {
        self.items.iter().filter_map(|i| i.est_price_usd).sum()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fields supplied when creating a list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewList {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub author: String,
}

impl NewList {
    /// A private list by the default author.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_public: false,
            author: DEFAULT_LIST_AUTHOR.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

/// Fields supplied when adding an item; votes and comments start empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub brand: Option<String>,
    pub why: String,
    pub eco_friendly: bool,
    pub est_price_usd: Option<f64>,
    pub url: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, why: impl Into<String>, eco_friendly: bool) -> Self {
        Self {
            name: name.into(),
            brand: None,
            why: why.into(),
            eco_friendly,
            est_price_usd: None,
            url: None,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.est_price_usd = Some(price);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl From<&Product> for NewItem {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: Some(product.brand.clone()),
            why: format!("Top {} suggestion", product.category.to_lowercase()),
            eco_friendly: false,
            est_price_usd: Some(product.price),
            url: product.url.clone(),
        }
    }
}

/// Partial update of a list's own fields.
///
/// `None` leaves a field untouched. Items, votes and comments are only
/// changed through their dedicated store operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    pub author: Option<String>,
}

impl ListUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_public.is_none()
            && self.author.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_up_twice_counts_once() {
        let mut votes = Votes::default();
        assert!(votes.apply(Vote::Up));
        assert!(!votes.apply(Vote::Up));
        assert_eq!(votes.thumbs_up, 1);
        assert_eq!(votes.user_vote, Some(Vote::Up));
    }

    #[test]
    fn test_vote_switch_moves_count() {
        let mut votes = Votes {
            thumbs_up: 4,
            thumbs_down: 2,
            user_vote: None,
        };
        votes.apply(Vote::Up);
        votes.apply(Vote::Down);

        assert_eq!(votes.thumbs_up, 4);
        assert_eq!(votes.thumbs_down, 3);
        assert_eq!(votes.user_vote, Some(Vote::Down));
        assert_eq!(votes.net(), 1);
    }

    #[test]
    fn test_vote_never_underflows() {
        let mut votes = Votes {
            thumbs_up: 0,
            thumbs_down: 0,
            user_vote: Some(Vote::Up),
        };
        votes.apply(Vote::Down);
        assert_eq!(votes.thumbs_up, 0);
        assert_eq!(votes.thumbs_down, 1);
    }

    #[test]
    fn test_vote_from_str() {
        assert_eq!("UP".parse::<Vote>(), Ok(Vote::Up));
        assert_eq!("-1".parse::<Vote>(), Ok(Vote::Down));
        assert!("sideways".parse::<Vote>().is_err());
    }

    #[test]
    fn test_votes_wire_shape() {
        let votes = Votes {
            thumbs_up: 1,
            thumbs_down: 0,
            user_vote: None,
        };
        let json = serde_json::to_value(votes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"thumbsUp": 1, "thumbsDown": 0, "userVote": null})
        );
    }

    #[test]
    fn test_list_reads_web_client_snapshot() {
        let json = r#"{
            "id": "1718000000000",
            "name": "Shower",
            "items": [{
                "id": "1718000000001",
                "name": "Bottle",
                "why": "x",
                "eco_friendly": true,
                "votes": {"thumbsUp": 1, "thumbsDown": 0, "userVote": "up"},
                "comments": []
            }],
            "createdAt": "2024-06-10T06:13:20.000Z",
            "updatedAt": "2024-06-10T06:13:20.000Z",
            "isPublic": true,
            "shareCode": "AB12CD",
            "author": "User"
        }"#;

        let list: UserList = serde_json::from_str(json).unwrap();
        assert_eq!(list.share_code(), Some("AB12CD"));
        assert_eq!(list.share_path().as_deref(), Some("/shared/AB12CD"));
        assert_eq!(list.items[0].votes.user_vote, Some(Vote::Up));
    }

    #[test]
    fn test_private_list_hides_share_code() {
        let json = r#"{
            "id": "1", "name": "n", "createdAt": "2024-06-10T06:13:20Z",
            "updatedAt": "2024-06-10T06:13:20Z", "isPublic": false, "shareCode": "AB12CD"
        }"#;
        let list: UserList = serde_json::from_str(json).unwrap();
        assert_eq!(list.share_code(), None);
        assert_eq!(list.author, DEFAULT_LIST_AUTHOR);
    }

    #[test]
    fn test_public_view_drops_private_share_code() {
        let json = r#"{
            "id": "1", "name": "n", "createdAt": "2024-06-10T06:13:20Z",
            "updatedAt": "2024-06-10T06:13:20Z", "isPublic": false, "shareCode": "AB12CD"
        }"#;
        let mut list: UserList = serde_json::from_str(json).unwrap();

        let snapshot = serde_json::to_value(&list).unwrap();
        assert_eq!(snapshot["shareCode"], "AB12CD");

        let view = serde_json::to_value(list.public_view()).unwrap();
        assert!(view.get("shareCode").is_none());
        assert_eq!(list.share_code.as_deref(), Some("AB12CD"));

        list.is_public = true;
        let view = serde_json::to_value(list.public_view()).unwrap();
        assert_eq!(view["shareCode"], "AB12CD");
    }

    #[test]
    fn test_new_item_from_product() {
        let product = Product::new("seat-nuna", "Nuna PIPA RX", "Nuna", "Car Seat", 399.0, 0.86);
        let item = NewItem::from(&product);
        assert_eq!(item.brand.as_deref(), Some("Nuna"));
        assert_eq!(item.est_price_usd, Some(399.0));
        assert_eq!(item.why, "Top car seat suggestion");
    }

    #[test]
    fn test_list_update_builder() {
        assert!(ListUpdate::new().is_empty());
        let update = ListUpdate::new().name("Renamed").clear_description();
        assert_eq!(update.name.as_deref(), Some("Renamed"));
        assert_eq!(update.description, Some(None));
    }
}
