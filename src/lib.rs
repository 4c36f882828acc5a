//! Umbrella crate for the atlas workspace.
//!
//! Re-exports [`atlas_core`] so the demos under `demos/` can be run from the
//! workspace root with `cargo run --example <name>`.

pub use atlas_core::*;
