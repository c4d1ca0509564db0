//! Product catalog module.
//!
//! Contains the three product lines, the `Offer` trait the listing engines
//! read them through, and the loader that normalizes backend records.

mod internet_box;
mod loader;
mod mobile_plan;
mod offer;
mod phone;

pub use internet_box::InternetBox;
pub use loader::{load_boxes, load_phones, load_plans, LoadReport};
pub use mobile_plan::MobilePlan;
pub use offer::{CatalogItem, Dimension, Flag, ItemSource, Offer};
pub use phone::Phone;
