//! Cube reordering and sample narrowing
//!
//! Records arrive as (y, x, time) cubes of their native sample type and
//! leave as standard-layout (time, y, x) cubes of `i16`.

mod narrow;


use ndarray::{Array3, Zip};

use crate::flim_pipeline::common::error::{ConversionError, Result};
use crate::flim_pipeline::sdt::SampleData;

pub use narrow::NarrowToI16;

/// Moves the last axis of a cube to the front without copying.
pub fn move_last_axis_to_front<A>(cube: Array3<A>) -> Array3<A> {
    cube.permuted_axes([2, 0, 1])
}

/// Builds the (time, y, x) `i16` cube from samples stored in (y, x, time) order.
pub fn to_time_major(shape: [usize; 3], samples: SampleData) -> Result<Array3<i16>> {
    match samples {
        SampleData::U16(values) => reorder_and_narrow(shape, values),
        SampleData::U32(values) => reorder_and_narrow(shape, values),
        SampleData::F64(values) => reorder_and_narrow(shape, values),
    }
}

fn reorder_and_narrow<A: NarrowToI16>(shape: [usize; 3], values: Vec<A>) -> Result<Array3<i16>> {
    let cube = Array3::from_shape_vec((shape[0], shape[1], shape[2]), values)
        .map_err(|e| ConversionError::DecodeError(format!("{shape:?}: {e}")))?;
    let reordered = move_last_axis_to_front(cube);

    let mut out = Array3::<i16>::zeros(reordered.raw_dim());
    Zip::from(&mut out)
        .and(&reordered)
        .for_each(|dst, &src| *dst = src.narrow());
    Ok(out)
}
