//! Voxel Snake - a host-agnostic snake game engine
//!
//! This library provides:
//! - Core game logic: grid, snake, world and the lifecycle state machine
//!   (game module)
//! - A cancelable periodic tick source with adjustable speed levels
//!   (scheduler module)
//! - Session play statistics usable as an event sink (metrics module)
//!
//! The engine renders nothing and reads no input devices. A host embeds
//! it by wiring the scheduler signal to [`game::Game::on_tick`], feeding
//! directional commands in, and drawing [`game::Game::snapshot`] however
//! it likes.

pub mod game;
pub mod metrics;
pub mod scheduler;
