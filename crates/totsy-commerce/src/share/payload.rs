//! Link-based sharing of picks.
//!
//! The payload travels as URL-encoded JSON in the `data` query parameter,
//! so a link carries everything needed to rebuild the board without a
//! server round trip.

use crate::error::CommerceError;
use crate::share::picks::{Pick, PickBoard};
use crate::suggest::SuggestionQuery;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query parameter holding the payload.
pub const SHARE_PARAM: &str = "data";

/// What a share link is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareMode {
    /// Only the picks selected for voting.
    Voting,
    /// Every pick.
    #[default]
    Registry,
}

impl fmt::Display for ShareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareMode::Voting => f.write_str("voting"),
            ShareMode::Registry => f.write_str("registry"),
        }
    }
}

impl FromStr for ShareMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voting" | "vote" => Ok(ShareMode::Voting),
            "registry" => Ok(ShareMode::Registry),
            other => Err(format!("unknown share mode: {}", other)),
        }
    }
}

/// Everything a share link carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharePayload {
    pub picks: Vec<Pick>,
    pub co_owners: Vec<String>,
    pub location: String,
    pub due_date: String,
    pub terms_raw: String,
    pub mode: ShareMode,
}

impl SharePayload {
    /// Snapshot a board for the given mode.
    pub fn from_board(board: &PickBoard, mode: ShareMode) -> Self {
        let picks = match mode {
            ShareMode::Voting => board.selected().cloned().collect(),
            ShareMode::Registry => board.picks().to_vec(),
        };
        Self {
            picks,
            co_owners: board.co_owners().to_vec(),
            mode,
            ..Self::default()
        }
    }

    /// Carry the query that produced the suggestions.
    pub fn with_query(mut self, location: &str, due_date: &str, terms_raw: &str) -> Self {
        self.location = location.to_string();
        self.due_date = due_date.to_string();
        self.terms_raw = terms_raw.to_string();
        self
    }

    /// The suggestion query encoded in the link.
    pub fn query(&self) -> SuggestionQuery {
        SuggestionQuery::new()
            .with_location(self.location.as_str())
            .with_due_date(self.due_date.as_str())
            .with_terms_raw(&self.terms_raw)
    }

    /// Rebuild the pick board the link was made from.
    pub fn to_board(&self) -> PickBoard {
        PickBoard::from_parts(self.picks.clone(), self.co_owners.clone())
    }

    /// Build a link to `base` carrying this payload.
    pub fn share_url(&self, base: &str) -> Result<String, CommerceError> {
        let json = serde_json::to_string(self)?;
        let base = base.split('#').next().unwrap_or(base);
        let joiner = match base.find('?') {
            None => "?",
            Some(_) if base.ends_with('?') || base.ends_with('&') => "",
            Some(_) => "&",
        };
        Ok(format!(
            "{}{}{}={}",
            base,
            joiner,
            SHARE_PARAM,
            urlencoding::encode(&json)
        ))
    }

    /// Read the payload out of a full link.
    ///
    /// Returns `None` if the link has no payload or it is malformed.
    pub fn from_url(url: &str) -> Option<Self> {
        let without_fragment = url.split('#').next()?;
        let (_, query) = without_fragment.split_once('?')?;
        Self::from_query(query)
    }

    /// Read the payload out of a raw query string (without the `?`).
    pub fn from_query(query: &str) -> Option<Self> {
        let raw = query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == SHARE_PARAM).then_some(value)
        })?;

        let spaced = raw.replace('+', " ");
        let decoded = urlencoding::decode(&spaced).ok()?;
        serde_json::from_str(&decoded).ok()
    }
}

/// Build a share link for a board.
pub fn share_url(base: &str, payload: &SharePayload) -> Result<String, CommerceError> {
    payload.share_url(base)
}
