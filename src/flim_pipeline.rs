//! FLIM conversion pipeline module
//!
//! This module provides a structured approach to converting decay-curve
//! containers, with separate modules for SDT reading, cube reordering,
//! B64 writing, and conversion orchestration.

pub mod b64;
pub mod common;
pub mod conversions;
pub mod sdt;
pub mod transform;

pub use common::{
    ConversionConfig,
    ConversionConfigBuilder,
    ConversionError,
    DEFAULT_CUBE_SHAPE,
    Result,
};

pub use sdt::{
    DecayContainer,
    DecayReader,
    DecayRecord,
    SampleData,
    SdtReader,
};

pub use b64::{
    CubeWriter,
    SimfcsB64Writer,
};

pub use conversions::{
    FolderReport,
    SdtToB64Pipeline,
};
