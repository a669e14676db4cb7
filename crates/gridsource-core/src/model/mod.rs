//! Property model: how entity properties are addressed from filters, sorts,
//! and aggregations.

pub mod property;


pub use property::PropertyPath;
