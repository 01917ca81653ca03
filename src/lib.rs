//! Conversion of Becker & Hickl `.sdt` FLIM recordings into SimFCS `.B64` files.

pub mod flim_pipeline;
pub mod logger;
pub mod selector;
