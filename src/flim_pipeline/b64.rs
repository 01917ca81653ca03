//! B64 writing module
//!
//! Encodes (time, y, x) `i16` cubes into the SimFCS `.B64` layout: a
//! little-endian `u32` image size followed by the samples.

mod reader;
mod simfcs_writer;
mod writer;


pub use reader::{decode_b64, read_b64};
pub use simfcs_writer::SimfcsB64Writer;
pub use writer::CubeWriter;
