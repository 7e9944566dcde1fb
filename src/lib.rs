// Dozerball: an interactive 3D arena simulator where player-driven dozers
// push balls toward goal cylinders.

pub mod app;
pub mod assets;
pub mod config;
pub mod rendering;
pub mod utils;
pub mod world;

// Re-export commonly used types for convenience
pub use config::SimSettings;
pub use world::{Simulation, World};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
