//! Common utilities module
//!
//! Shared error and configuration types used across the FLIM pipeline.

pub mod config;
pub mod error;

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_CUBE_SHAPE};
pub use error::{ConversionError, Result};
