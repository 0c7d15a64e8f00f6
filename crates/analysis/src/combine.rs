//! Mask combination
//!
//! Intersects binary suitability masks cell-wise. Logical AND is numeric
//! multiplication here: 1×1 = 1, and no-data in any operand propagates
//! to the result.

use aquasite_core::raster::Raster;
use aquasite_core::{Error, Result};
use ndarray::Array2;
use rayon::prelude::*;

/// Combine two or more suitability masks into one.
///
/// All masks must share identical grid geometry. A cell is suitable in
/// the result only when it is suitable in every input; the operation is
/// commutative and associative, so input order never changes the result.
pub fn combine_masks(masks: &[&Raster<f64>]) -> Result<Raster<f64>> {
    let first = match masks.first() {
        Some(first) => *first,
        None => return Err(Error::Algorithm("no masks to combine".into())),
    };
    if masks.len() < 2 {
        return Err(Error::Algorithm(
            "combining masks requires at least two inputs".into(),
        ));
    }
    for mask in &masks[1..] {
        first.ensure_same_grid(*mask)?;
    }

    let (rows, cols) = first.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            'cell: for col in 0..cols {
                let mut product = 1.0;
                for mask in masks {
                    let val = unsafe { mask.get_unchecked(row, col) };
                    if mask.is_nodata(val) {
                        continue 'cell;
                    }
                    product *= val;
                }
                row_data[col] = product;
            }
            row_data
        })
        .collect();

    let mut output = first.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SUITABLE;
    use aquasite_core::crs::Crs;
    use aquasite_core::raster::GeoTransform;

    fn mask(values: Vec<f64>) -> Raster<f64> {
        let mut r = Raster::from_vec(values, 2, 2).unwrap();
        r.set_transform(GeoTransform::new(-125.0, 45.0, 1.0, -1.0));
        r.set_crs(Some(Crs::wgs84()));
        r.set_nodata(Some(f64::NAN));
        r
    }

    fn all_suitable() -> Raster<f64> {
        mask(vec![SUITABLE; 4])
    }

    fn all_nodata() -> Raster<f64> {
        mask(vec![f64::NAN; 4])
    }

    #[test]
    fn test_and_semantics() {
        // all-1 AND all-no-data = all-no-data
        let a = all_suitable();
        let b = all_nodata();
        let combined = combine_masks(&[&a, &b]).unwrap();

        for &v in combined.data().iter() {
            assert!(v.is_nan());
        }
    }

    #[test]
    fn test_intersection() {
        let a = mask(vec![SUITABLE, SUITABLE, f64::NAN, f64::NAN]);
        let b = mask(vec![SUITABLE, f64::NAN, SUITABLE, f64::NAN]);
        let combined = combine_masks(&[&a, &b]).unwrap();

        assert_eq!(combined.get(0, 0).unwrap(), SUITABLE);
        assert!(combined.get(0, 1).unwrap().is_nan());
        assert!(combined.get(1, 0).unwrap().is_nan());
        assert!(combined.get(1, 1).unwrap().is_nan());
    }

    #[test]
    fn test_commutative() {
        let a = mask(vec![SUITABLE, f64::NAN, SUITABLE, f64::NAN]);
        let b = mask(vec![SUITABLE, SUITABLE, f64::NAN, f64::NAN]);

        let ab = combine_masks(&[&a, &b]).unwrap();
        let ba = combine_masks(&[&b, &a]).unwrap();

        for row in 0..2 {
            for col in 0..2 {
                let x = ab.get(row, col).unwrap();
                let y = ba.get(row, col).unwrap();
                assert!(x == y || (x.is_nan() && y.is_nan()));
            }
        }
    }

    #[test]
    fn test_three_masks() {
        let a = all_suitable();
        let b = all_suitable();
        let mut c = all_suitable();
        c.set(1, 1, f64::NAN).unwrap();

        let combined = combine_masks(&[&a, &b, &c]).unwrap();
        assert_eq!(combined.get(0, 0).unwrap(), SUITABLE);
        assert!(combined.get(1, 1).unwrap().is_nan());
    }

    #[test]
    fn test_too_few_masks() {
        let a = all_suitable();
        assert!(combine_masks(&[]).is_err());
        assert!(combine_masks(&[&a]).is_err());
    }

    #[test]
    fn test_grid_mismatch_fails() {
        let a = all_suitable();
        let mut b = all_suitable();
        b.set_transform(GeoTransform::new(-120.0, 45.0, 1.0, -1.0));
        assert!(combine_masks(&[&a, &b]).is_err());
    }
}
