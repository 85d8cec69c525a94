//! School Journey - a short level-by-level trip to school for kids
//!
//! Core modules:
//! - `catalog`: Level data loading and typed level descriptors
//! - `queue`: Per-session play queue (tiered, shuffled)
//! - `store`: Observable UI state cells
//! - `session`: Menu → game → results flow over the store
//! - `config`: Free-form settings held in the store
//! - `manifest`: Installable web app metadata

pub mod catalog;
pub mod config;
pub mod manifest;
pub mod queue;
pub mod session;
pub mod store;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{CatalogError, LevelCatalog, LevelDescriptor, LevelId, Tier};
pub use config::GameConfig;
pub use queue::{PlayQueue, generate_queue, generate_queue_seeded, generate_queue_with_rng};
pub use session::{Orientation, Outcome, Progress, Session};
pub use store::{GameStore, Screen, StateCell, Subscription};

/// Game configuration constants
pub mod consts {
    /// Hearts at the start of a session
    pub const DEFAULT_HEARTS: u32 = 3;
    /// Outfit the character wears until the player picks one
    pub const DEFAULT_OUTFIT: &str = "pajamas";
    /// Level type that gets a fixed slot at the end of tier 1
    pub const MAZE_TYPE: &str = "maze";
}
