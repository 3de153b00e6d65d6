//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, Brain, GitlabApi).

pub mod brain;
pub mod gitlab;
pub mod matrix;
