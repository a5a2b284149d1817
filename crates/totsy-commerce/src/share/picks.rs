//! Products picked from suggestions, with purchase tracking.

use crate::catalog::Product;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Purchase progress of a picked product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickStatus {
    #[default]
    None,
    Ordered,
    Purchased,
    Received,
}

impl PickStatus {
    pub const ALL: [PickStatus; 4] = [
        PickStatus::None,
        PickStatus::Ordered,
        PickStatus::Purchased,
        PickStatus::Received,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PickStatus::None => "None",
            PickStatus::Ordered => "Ordered",
            PickStatus::Purchased => "Purchased",
            PickStatus::Received => "Received",
        }
    }
}

impl fmt::Display for PickStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PickStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}

/// A picked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub status: PickStatus,
    /// Included in a voting link.
    #[serde(default)]
    pub selected: bool,
}

impl Pick {
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }
}

/// The working set of picks and co-owners behind a share link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickBoard {
    picks: Vec<Pick>,
    co_owners: Vec<String>,
}

impl PickBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a board from already-made picks and co-owners.
    pub fn from_parts(picks: Vec<Pick>, co_owners: Vec<String>) -> Self {
        let mut board = Self::new();
        for pick in picks {
            if !board.contains(pick.id()) {
                board.picks.push(pick);
            }
        }
        for owner in co_owners {
            board.add_co_owner(&owner);
        }
        board
    }

    /// Pick a product. Picking the same product id twice is a no-op.
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.picks.push(Pick {
            product: product.clone(),
            status: PickStatus::None,
            selected: false,
        });
        true
    }

    pub fn set_status(&mut self, id: &ProductId, status: PickStatus) -> bool {
        match self.get_mut(id) {
            Some(pick) => {
                pick.status = status;
                true
            }
            None => false,
        }
    }

    /// Flip whether the pick goes into voting links.
    pub fn toggle_selected(&mut self, id: &ProductId) -> bool {
        match self.get_mut(id) {
            Some(pick) => {
                pick.selected = !pick.selected;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.picks.len();
        self.picks.retain(|p| p.id() != id);
        self.picks.len() != before
    }

    /// Add a co-owner. Blank and repeated entries are ignored.
    pub fn add_co_owner(&mut self, owner: &str) -> bool {
        let owner = owner.trim();
        if owner.is_empty() || self.co_owners.iter().any(|o| o == owner) {
            return false;
        }
        self.co_owners.push(owner.to_string());
        true
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.picks.iter().any(|p| p.id() == id)
    }

    pub fn get(&self, id: &ProductId) -> Option<&Pick> {
        self.picks.iter().find(|p| p.id() == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut Pick> {
        self.picks.iter_mut().find(|p| p.id() == id)
    }

    /// Picks in the order they were made.
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    /// Picks flagged for voting.
    pub fn selected(&self) -> impl Iterator<Item = &Pick> {
        self.picks.iter().filter(|p| p.selected)
    }

    pub fn co_owners(&self) -> &[String] {
        &self.co_owners
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn nanit() -> Product {
        Catalog::builtin()
            .get(&ProductId::new("monitor-nanit"))
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_add_is_deduplicated() {
        let mut board = PickBoard::new();
        assert!(board.add(&nanit()));
        assert!(!board.add(&nanit()));
        assert_eq!(board.len(), 1);
        assert_eq!(board.picks()[0].status, PickStatus::None);
    }

    #[test]
    fn test_status_select_remove() {
        let mut board = PickBoard::new();
        let id = nanit().id;
        board.add(&nanit());

        assert!(board.set_status(&id, PickStatus::Ordered));
        assert!(board.toggle_selected(&id));
        assert_eq!(board.selected().count(), 1);
        assert!(board.toggle_selected(&id));
        assert_eq!(board.selected().count(), 0);

        assert!(!board.set_status(&ProductId::new("ghost"), PickStatus::Received));
        assert!(board.remove(&id));
        assert!(!board.remove(&id));
    }

    #[test]
    fn test_co_owners_trimmed_and_unique() {
        let mut board = PickBoard::new();
        assert!(board.add_co_owner("  sam@example.com "));
        assert!(!board.add_co_owner("sam@example.com"));
        assert!(!board.add_co_owner("   "));
        assert_eq!(board.co_owners(), ["sam@example.com"]);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("purchased".parse::<PickStatus>(), Ok(PickStatus::Purchased));
        assert!("lost".parse::<PickStatus>().is_err());
    }

    #[test]
    fn test_pick_wire_shape_is_flat() {
        let pick = Pick {
            product: nanit(),
            status: PickStatus::Ordered,
            selected: true,
        };
        let json = serde_json::to_value(&pick).unwrap();
        assert_eq!(json["id"], "monitor-nanit");
        assert_eq!(json["status"], "Ordered");
        assert_eq!(json["selected"], true);
    }
}
