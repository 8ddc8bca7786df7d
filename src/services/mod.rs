pub mod controller;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use controller::{ItemCard, SearchController, SearchOutcome, ViewSnapshot};
