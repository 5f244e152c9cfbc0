//! # Space Weather
//!
//! The data crate for storm dossiers. It holds the event records, the static
//! catalog of event types and their categories, and the in-memory event store
//! that the dossier crate queries. This crate contains no scoring or narrative
//! logic.

pub mod config;
pub mod error;
pub mod events;
pub mod store;
pub mod time;

pub use config::*;
pub use error::*;
pub use events::*;
pub use store::*;
