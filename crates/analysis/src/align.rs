//! Grid alignment
//!
//! Snaps a raster of arbitrary resolution/extent onto a reference grid:
//! reproject (through a collaborator), crop to the reference extent, and
//! resample with nearest-neighbor sampling. Nearest-neighbor is fixed
//! here: the target raster (bathymetry) is a physical quantity whose cell
//! values must survive untouched, not get averaged across depth
//! discontinuities.

use aquasite_core::crs::Crs;
use aquasite_core::raster::Raster;
use aquasite_core::{Error, Result};
use ndarray::Array2;
use rayon::prelude::*;

/// Reprojection collaborator.
///
/// CRS transformation machinery is outside this crate; callers supply an
/// implementation (or [`IdentityReprojector`] when all inputs already share
/// one CRS, as the OISST/GEBCO West Coast sources do).
pub trait Reprojector {
    /// Return `raster` expressed in `target` coordinates.
    fn reproject(&self, raster: &Raster<f64>, target: &Crs) -> Result<Raster<f64>>;
}

/// Pass-through reprojector for inputs already in the target CRS.
///
/// Fails with `Error::CrsMismatch` when an actual reprojection would be
/// required.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityReprojector;

impl Reprojector for IdentityReprojector {
    fn reproject(&self, raster: &Raster<f64>, target: &Crs) -> Result<Raster<f64>> {
        match raster.crs() {
            Some(crs) if crs.is_equivalent(target) => Ok(raster.clone()),
            Some(crs) => Err(Error::CrsMismatch(
                crs.identifier(),
                target.identifier(),
            )),
            None => Err(Error::MissingCrs("target")),
        }
    }
}

/// Align `target` onto `reference`'s grid.
///
/// The result shares the reference's CRS, extent, resolution, and
/// alignment. Each output cell takes the value of the target cell
/// containing the output cell's center (nearest-neighbor); cells falling
/// outside the target, or on target no-data, come back as no-data.
///
/// Fails with `Error::MissingCrs` when either raster lacks CRS metadata
/// and with `Error::NoOverlap` when the extents are disjoint.
pub fn align_to(
    target: &Raster<f64>,
    reference: &Raster<f64>,
    reprojector: &impl Reprojector,
) -> Result<Raster<f64>> {
    let ref_crs = reference.crs().ok_or(Error::MissingCrs("reference"))?;
    let target_crs = target.crs().ok_or(Error::MissingCrs("target"))?;

    let reprojected;
    let target = if target_crs.is_equivalent(ref_crs) {
        target
    } else {
        reprojected = reprojector.reproject(target, ref_crs)?;
        &reprojected
    };

    let (min_x, min_y, max_x, max_y) = reference.bounds();
    let (t_min_x, t_min_y, t_max_x, t_max_y) = target.bounds();
    if min_x >= t_max_x || max_x <= t_min_x || min_y >= t_max_y || max_y <= t_min_y {
        return Err(Error::NoOverlap);
    }

    let (rows, cols) = reference.shape();
    let t_rows = target.rows();
    let t_cols = target.cols();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let (x, y) = reference.pixel_to_geo(col, row);
                let (tc, tr) = target.geo_to_pixel(x, y);
                let (tc, tr) = (tc.floor(), tr.floor());

                if tc < 0.0 || tr < 0.0 {
                    continue;
                }
                let (tc, tr) = (tc as usize, tr as usize);
                if tr >= t_rows || tc >= t_cols {
                    continue;
                }

                let val = unsafe { target.get_unchecked(tr, tc) };
                if target.is_nodata(val) {
                    continue;
                }
                row_data[col] = val;
            }
            row_data
        })
        .collect();

    let mut output = reference.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}
