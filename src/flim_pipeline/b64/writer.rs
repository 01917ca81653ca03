use std::io::Write;

use ndarray::Array3;

use crate::flim_pipeline::common::error::Result;

pub trait CubeWriter {
    fn write_cube(&self, cube: &Array3<i16>, output: &mut dyn Write) -> Result<()>;
}
