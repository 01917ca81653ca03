use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array3;

use crate::flim_pipeline::common::error::{ConversionError, Result};

const HEADER_LEN: usize = 4;

/// Reads a `.B64` file back into a (planes, size, size) cube.
pub fn read_b64(path: impl AsRef<Path>) -> Result<Array3<i16>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        ConversionError::InputReadError(format!("{}: {}", path.display(), e))
    })?;
    decode_b64(&bytes)
}

pub fn decode_b64(bytes: &[u8]) -> Result<Array3<i16>> {
    if bytes.len() < HEADER_LEN {
        return Err(ConversionError::DecodeError("B64 header is truncated".to_string()));
    }
    let size = LittleEndian::read_u32(&bytes[..HEADER_LEN]) as usize;
    let body = &bytes[HEADER_LEN..];

    let plane_bytes = size
        .checked_mul(size)
        .and_then(|n| n.checked_mul(2))
        .unwrap_or(0);
    if plane_bytes == 0 || body.len() % plane_bytes != 0 {
        return Err(ConversionError::DecodeError(format!(
            "{} data bytes do not hold whole {size}x{size} images",
            body.len()
        )));
    }

    let mut samples = vec![0i16; body.len() / 2];
    LittleEndian::read_i16_into(body, &mut samples);
    Array3::from_shape_vec((body.len() / plane_bytes, size, size), samples)
        .map_err(|e| ConversionError::DecodeError(e.to_string()))
}
