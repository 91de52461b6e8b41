//! Core 3-D category clustering library.
//!
//! Entities of the same category are pulled a fixed step per tick towards
//! their category's centroid, and entities that have converged are removed.
//!
//! Main components:
//! - [`entity`]: entities and the fixed category set.
//! - [`partition`]: per-tick index of entity ids by category.
//! - [`store`]: the entity population with an injected random source.
//! - [`phases`]: attraction and pruning phases of a tick.
//! - [`simulator`]: [`simulator::ClusterSimulator`], which runs the phases.
//! - [`overlay`]: all-pairs connection lines within each category.
//! - [`command`]: host commands applied between ticks.
//! - [`config`]: tunable constants, loadable from JSON.
//! - [`geometry`]: centroid and guarded direction helpers.
//! - [`error`]: boundary error types.
//! - [`types`]: shared type aliases and IDs.

pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod partition;
pub mod phases;
pub mod simulator;
pub mod store;
pub mod types;

pub use entity::{Category, Entity};
pub use simulator::{ClusterSimulator, StepReport};
pub use store::EntityStore;
