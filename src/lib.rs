//! Gumshoe character creator: ability catalogs, point-buy rules, the creation
//! wizard and printable sheets, served over a small HTTP API.

pub mod cli;
pub mod config;
pub mod creation;
pub mod data;
pub mod rules;
pub mod server;
pub mod sheet;
