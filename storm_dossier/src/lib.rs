//! # Storm Dossier
//!
//! Builds a dossier for a geomagnetic storm. Starting from a root event, the
//! linkage walker collects every event reachable through linked-event
//! references. The classifier scores the cluster into a dominant cause and
//! consequence tags, and the narrative renderer turns the result into
//! persona-driven story beats.
//!
//! ## Core Components
//!
//! - **linkage**: transitive closure over linked-event references
//! - **selector**: picks one of the strongest storms of a year
//! - **dossier**: deterministic classification and scoring
//! - **narrative**: pure text rendering of a dossier
//! - **survey**: store-wide cause frequencies and storms per year
//! - **archive**: store snapshot holder and story-package assembly

pub mod archive;
pub mod config;
pub mod dossier;
pub mod error;
pub mod linkage;
pub mod narrative;
pub mod selector;
pub mod survey;

pub use archive::*;
pub use config::*;
pub use dossier::*;
pub use error::*;
pub use linkage::*;
pub use narrative::*;
pub use selector::*;
pub use survey::*;
