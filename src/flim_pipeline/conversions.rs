//! Pipeline conversions module
//!
//! Orchestrates decoding, shape validation, reordering and encoding of
//! whole files and folders.

mod sdt_to_b64;


pub use sdt_to_b64::{FolderReport, SdtToB64Pipeline, output_path};
