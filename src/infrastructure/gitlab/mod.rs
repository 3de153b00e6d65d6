//! # GitLab Infrastructure
//!
//! REST v4 implementation of the `GitlabApi` / `GitlabConnector` traits.

pub mod client;

pub use client::{GitlabClient, HttpConnector};
