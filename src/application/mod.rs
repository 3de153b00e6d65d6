//! # Application Layer
//!
//! Contains the core logic of the bot.
//! This includes command routing, parameter extraction, per-room context and reply rendering.

pub mod context;
pub mod params;
pub mod render;
pub mod router;
