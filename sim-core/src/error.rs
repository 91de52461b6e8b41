//! Error types for the clustering core.
//!
//! The simulation step itself never fails. Errors only come from the
//! boundaries: turning raw codes or names into a [`Category`], and
//! loading or validating a [`crate::config::Config`].

use thiserror::Error;

use crate::entity::Category;

/// A value that does not name one of the fixed categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// Numeric category code outside `0..Category::COUNT`.
    #[error("unknown category code {0} (expected 0..{max})", max = Category::COUNT)]
    UnknownCode(u8),

    /// Name that matches neither a shape label nor a letter `a`-`d`.
    #[error("unknown category name {0:?}")]
    UnknownName(String),
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the simulator cannot run with.
    #[error("invalid config value for `{field}`: {value} ({reason})")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
        /// What the field requires.
        reason: &'static str,
    },

    /// The JSON document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Umbrella error for hosts that drive the core.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
