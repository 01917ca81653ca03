//! SDT container reading module
//!
//! Decodes Becker & Hickl SPC `.sdt` files into decay-curve records behind
//! the `DecayReader` / `DecayContainer` contract.

mod reader;
mod sdt_reader;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use reader::{DecayContainer, DecayReader};
pub use sdt_reader::{SdtFile, SdtReader};
pub use types::{BlockHeader, BlockType, DecayRecord, FileHeader, MeasureInfo, SampleData, SampleKind};
