//! Core game logic
//!
//! Everything in here is free of I/O and rendering dependencies: the host
//! shell drives it through commands and ticks and reads it back through
//! snapshots and events.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod snake;
pub mod world;

// Re-export commonly used types
pub use config::StartConfig;
pub use engine::{Game, GameState, Snapshot, VoxelRole};
pub use error::GameError;
pub use events::{GameEvents, NullEvents};
pub use grid::{step, Coord, Direction};
pub use snake::Snake;
pub use world::World;
