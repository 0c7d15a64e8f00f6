//! Temporal aggregation
//!
//! Reduces a stack of repeated observations (annual SST rasters) to one
//! mean raster, and converts units.

use aquasite_core::raster::{Raster, RasterStack};
use aquasite_core::{Error, Result};
use ndarray::Array2;
use rayon::prelude::*;

/// Kelvin to Celsius offset
pub const KELVIN_OFFSET: f64 = 273.15;

/// Cell-wise arithmetic mean across all layers of a stack.
///
/// A cell's mean is taken over the subset of layers holding data there;
/// layers with no-data at that cell are left out of both sum and count.
/// A cell with no data in any layer is no-data in the result.
pub fn temporal_mean(stack: &RasterStack) -> Result<Raster<f64>> {
    let template = stack.template()?;
    let (rows, cols) = template.shape();
    let layers: Vec<&Raster<f64>> = stack.iter().collect();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let mut sum = 0.0;
                let mut count = 0usize;
                for layer in &layers {
                    let val = unsafe { layer.get_unchecked(row, col) };
                    if layer.is_nodata(val) {
                        continue;
                    }
                    sum += val;
                    count += 1;
                }
                if count > 0 {
                    row_data[col] = sum / count as f64;
                }
            }
            row_data
        })
        .collect();

    let mut output = template.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

/// Convert a temperature raster from Kelvin to Celsius.
///
/// No-data cells are preserved.
pub fn kelvin_to_celsius(raster: &Raster<f64>) -> Result<Raster<f64>> {
    let (rows, cols) = raster.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let val = unsafe { raster.get_unchecked(row, col) };
                if raster.is_nodata(val) {
                    continue;
                }
                row_data[col] = val - KELVIN_OFFSET;
            }
            row_data
        })
        .collect();

    let mut output = raster.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}
