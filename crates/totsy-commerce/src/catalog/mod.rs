//! Catalog module.
//!
//! The fixed, read-only product records the suggestion ranker scores.

mod product;

pub use product::{Catalog, Product};
