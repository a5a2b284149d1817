//! Picks and share links.

mod payload;
mod picks;

pub use payload::{share_url, ShareMode, SharePayload, SHARE_PARAM};
pub use picks::{Pick, PickBoard, PickStatus};
