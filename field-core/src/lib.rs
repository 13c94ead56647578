//! Headless 2-D point-field simulation library.
//!
//! Main components:
//! - [`config`] — settings, validated updates and settings files.
//! - [`point`] — the pulsing point entity.
//! - [`field`] — the point arena, hit testing and neighbour lookup.
//! - [`links`] — per-frame proximity links.
//! - [`phases`] — motion, link and fluid-interaction phases.
//! - [`render`] — backend-independent draw lists.
//! - [`sim`] — the [`sim::Simulator`] that input events drive.
//! - [`cloud`] — sine-wave vertex clouds for point-cloud viewers.
//! - [`error`] — error types.
//! - [`types`] — shared type aliases and IDs.

pub mod cloud;
pub mod config;
pub mod error;
pub mod field;
pub mod links;
pub mod phases;
pub mod point;
pub mod render;
pub mod sim;
pub mod types;
