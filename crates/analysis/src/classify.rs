//! Suitability classification
//!
//! Reclassifies a continuous raster into a binary suitability mask: cells
//! inside a species' tolerance range become 1, everything else becomes
//! no-data.

use aquasite_core::raster::Raster;
use aquasite_core::{Error, Result};
use ndarray::Array2;
use rayon::prelude::*;

/// Cell value marking a suitable cell in a mask
pub const SUITABLE: f64 = 1.0;

/// An inclusive tolerance range [min, max].
///
/// Depth ranges follow the negative-down convention: depths below sea
/// level are negative, so "0 to 70 m deep" is the range [-70, 0]. Bounds
/// are taken as given; a sign-inconsistent range (e.g. a positive depth
/// bound against a negative-valued raster) matches nothing and silently
/// produces an all-no-data mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceRange {
    pub min: f64,
    pub max: f64,
}

impl ToleranceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether a value falls inside the range (closed on both ends)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A reclassification entry mapping a closed interval [min, max] to an
/// output value, or to no-data when `value` is `None`.
#[derive(Debug, Clone, Copy)]
pub struct ReclassEntry {
    pub min: f64,
    pub max: f64,
    pub value: Option<f64>,
}

impl ReclassEntry {
    /// Map [min, max] to an output value
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        Self {
            min,
            max,
            value: Some(value),
        }
    }

    /// Map [min, max] to no-data
    pub fn nodata(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            value: None,
        }
    }

    fn matches(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Reclassify raster values against an ordered entry table.
///
/// Entries are evaluated in order and the first match wins, so a value on
/// a boundary shared by two entries belongs to the earlier one. Cells
/// matching no entry, matching a no-data entry, or holding no-data input
/// come back as no-data.
pub fn reclassify(raster: &Raster<f64>, entries: &[ReclassEntry]) -> Result<Raster<f64>> {
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

                for entry in entries {
                    if entry.matches(val) {
                        if let Some(output) = entry.value {
                            row_data[col] = output;
                        }
                        break;
                    }
                }
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

/// Build a binary suitability mask from a tolerance range.
///
/// The three-interval table [min, max] → 1, (−∞, min) → no-data,
/// (max, +∞) → no-data, with the suitable interval evaluated first so
/// values exactly at min or max classify as suitable.
pub fn suitability_mask(raster: &Raster<f64>, range: ToleranceRange) -> Result<Raster<f64>> {
    let entries = [
        ReclassEntry::new(range.min, range.max, SUITABLE),
        ReclassEntry::nodata(f64::NEG_INFINITY, range.min),
        ReclassEntry::nodata(range.max, f64::INFINITY),
    ];
    reclassify(raster, &entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquasite_core::crs::Crs;
    use aquasite_core::raster::GeoTransform;

    fn sst_raster(values: Vec<f64>, rows: usize, cols: usize) -> Raster<f64> {
        let mut r = Raster::from_vec(values, rows, cols).unwrap();
        r.set_transform(GeoTransform::new(-125.0, 45.0, 1.0, -1.0));
        r.set_crs(Some(Crs::wgs84()));
        r.set_nodata(Some(f64::NAN));
        r
    }

    #[test]
    fn test_mask_closed_interval_boundaries() {
        // Oyster thermal range: exactly 11.0 and 30.0 are suitable,
        // 10.999 and 30.001 are not
        let raster = sst_raster(vec![11.0, 30.0, 10.999, 30.001, 15.0, 40.0], 2, 3);
        let mask = suitability_mask(&raster, ToleranceRange::new(11.0, 30.0)).unwrap();

        assert_eq!(mask.get(0, 0).unwrap(), SUITABLE);
        assert_eq!(mask.get(0, 1).unwrap(), SUITABLE);
        assert!(mask.get(0, 2).unwrap().is_nan());
        assert!(mask.get(1, 0).unwrap().is_nan());
        assert_eq!(mask.get(1, 1).unwrap(), SUITABLE);
        assert!(mask.get(1, 2).unwrap().is_nan());
    }

    #[test]
    fn test_mask_depth_sign_convention() {
        // Depths are negative below sea level; 0 to 70 m is [-70, 0]
        let raster = sst_raster(vec![0.0, -70.0, -70.001, -30.0, 5.0, -100.0], 2, 3);
        let mask = suitability_mask(&raster, ToleranceRange::new(-70.0, 0.0)).unwrap();

        assert_eq!(mask.get(0, 0).unwrap(), SUITABLE);
        assert_eq!(mask.get(0, 1).unwrap(), SUITABLE);
        assert!(mask.get(0, 2).unwrap().is_nan());
        assert_eq!(mask.get(1, 0).unwrap(), SUITABLE);
        assert!(mask.get(1, 1).unwrap().is_nan());
        assert!(mask.get(1, 2).unwrap().is_nan());
    }

    #[test]
    fn test_mask_sign_inconsistent_bounds_all_nodata() {
        // Positive depth bounds against a negative-valued raster match
        // nothing; the mask is silently all-no-data
        let raster = sst_raster(vec![-10.0, -30.0, -50.0, -70.0], 2, 2);
        let mask = suitability_mask(&raster, ToleranceRange::new(0.0, 70.0)).unwrap();

        for row in 0..2 {
            for col in 0..2 {
                assert!(mask.get(row, col).unwrap().is_nan());
            }
        }
    }

    #[test]
    fn test_mask_propagates_input_nodata() {
        let raster = sst_raster(vec![15.0, f64::NAN, 20.0, 25.0], 2, 2);
        let mask = suitability_mask(&raster, ToleranceRange::new(11.0, 30.0)).unwrap();

        assert_eq!(mask.get(0, 0).unwrap(), SUITABLE);
        assert!(mask.get(0, 1).unwrap().is_nan());
    }

    #[test]
    fn test_mask_is_binary() {
        let raster = sst_raster((0..9).map(|v| v as f64 * 5.0).collect(), 3, 3);
        let mask = suitability_mask(&raster, ToleranceRange::new(11.0, 30.0)).unwrap();

        for &v in mask.data().iter() {
            assert!(v.is_nan() || v == SUITABLE, "unexpected mask value {v}");
        }
    }

    #[test]
    fn test_reclassify_first_match_wins() {
        let raster = sst_raster(vec![5.0, 10.0, 15.0, 20.0], 2, 2);
        // 10.0 sits on the boundary of both entries; the first one wins
        let entries = [
            ReclassEntry::new(0.0, 10.0, 1.0),
            ReclassEntry::new(10.0, 20.0, 2.0),
        ];
        let out = reclassify(&raster, &entries).unwrap();

        assert_eq!(out.get(0, 0).unwrap(), 1.0);
        assert_eq!(out.get(0, 1).unwrap(), 1.0);
        assert_eq!(out.get(1, 0).unwrap(), 2.0);
        assert_eq!(out.get(1, 1).unwrap(), 2.0);
    }

    #[test]
    fn test_reclassify_unmatched_is_nodata() {
        let raster = sst_raster(vec![-5.0, 5.0, 25.0, 50.0], 2, 2);
        let entries = [ReclassEntry::new(0.0, 10.0, 1.0)];
        let out = reclassify(&raster, &entries).unwrap();

        assert!(out.get(0, 0).unwrap().is_nan());
        assert_eq!(out.get(0, 1).unwrap(), 1.0);
        assert!(out.get(1, 0).unwrap().is_nan());
        assert!(out.get(1, 1).unwrap().is_nan());
    }
}
