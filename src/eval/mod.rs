//! Position evaluation.
//!
//! Builds the threat heat maps the AI planner scores destinations with.

pub mod heatmap;

pub use heatmap::{attack_opportunity_map, attack_setup_map, foresight, HeatMap};
