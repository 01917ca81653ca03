use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use ndarray::Array3;
use tracing::debug;

use crate::flim_pipeline::b64::writer::CubeWriter;
use crate::flim_pipeline::common::error::{ConversionError, Result};

/// Samples encoded per `write_all` call.
const CHUNK_SAMPLES: usize = 1 << 16;

/// Writer for SimFCS `.B64` image stacks.
///
/// The format stores square images only, so the last two axes of the cube
/// must have the same length.
pub struct SimfcsB64Writer;

impl CubeWriter for SimfcsB64Writer {
    fn write_cube(&self, cube: &Array3<i16>, output: &mut dyn Write) -> Result<()> {
        let (planes, height, width) = cube.dim();
        if height != width {
            return Err(ConversionError::EncodeError(format!(
                "images must be square, got {height}x{width}"
            )));
        }
        let size = u32::try_from(width).map_err(|_| {
            ConversionError::EncodeError(format!("image size {width} does not fit the header"))
        })?;

        debug!(planes, size, "Encoding B64 cube");

        output.write_u32::<LittleEndian>(size)?;

        let cube = cube.as_standard_layout();
        let samples = cube
            .as_slice()
            .ok_or_else(|| ConversionError::EncodeError("cube is not contiguous".to_string()))?;

        let mut buffer = vec![0u8; CHUNK_SAMPLES.min(samples.len()) * 2];
        for chunk in samples.chunks(CHUNK_SAMPLES) {
            let bytes = &mut buffer[..chunk.len() * 2];
            LittleEndian::write_i16_into(chunk, bytes);
            output.write_all(bytes)?;
        }

        debug!("B64 encoding complete");
        Ok(())
    }
}
