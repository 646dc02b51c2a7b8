pub mod ability;
pub mod catalog;
pub mod validate;

pub use ability::{AbilityCategory, AbilityRecord};
pub use catalog::{AbilityCatalog, CatalogError, CatalogSource};
