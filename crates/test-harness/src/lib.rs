//! Test harness for the level compiler.
//!
//! Builds synthetic levels and texture archives in memory and checks compiled output.
//!
//! # Key Components
//!
//! - [`fixtures`]: box brushes, level documents and checker-texture archives
//! - [`helpers`]: error type and mesh math (volume, area, winding)
//! - [`assertions`]: assertion helpers that report the level's diagnostics

pub mod assertions;
pub mod fixtures;
pub mod helpers;

pub use fixtures::{box_brush, box_brush_valve, checker_wad, LevelBuilder};
pub use helpers::HarnessError;
