use std::path::Path;

use crate::flim_pipeline::common::error::Result;
use crate::flim_pipeline::sdt::types::DecayRecord;

/// Opens decay-curve containers.
pub trait DecayReader {
    fn open(&self, path: &Path) -> Result<Box<dyn DecayContainer>>;
}

/// An open container. Dropping it releases the underlying file.
pub trait DecayContainer {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes the record at `index`, in the order the container stores them.
    fn record(&mut self, index: usize) -> Result<DecayRecord>;
}
