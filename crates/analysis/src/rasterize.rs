//! Zone rasterization
//!
//! Burns vector zone polygons onto a raster grid so suitability cells can
//! be grouped by zone. Cell IDs are 1-based positions in the zone layer;
//! 0 marks cells outside every zone.

use aquasite_core::raster::Raster;
use aquasite_core::vector::ZoneLayer;
use aquasite_core::{Error, Result};
use geo::{BoundingRect, Intersects};
use geo_types::{coord, Rect};

/// Rasterize a zone layer onto the grid of `template`.
///
/// A cell is assigned to a zone when its footprint rectangle intersects
/// the zone geometry ("touches" semantics), so cells only partially
/// covered by a zone still count toward it. A cell touched by several
/// zones keeps the first zone in layer order. Cells outside all zones
/// hold 0, the zone raster's no-data value.
///
/// Fails with `Error::CrsMismatch` when layer and template carry
/// different EPSG codes.
pub fn rasterize_zones(zones: &ZoneLayer, template: &Raster<f64>) -> Result<Raster<i32>> {
    if let (Some(zone_crs), Some(grid_crs)) = (zones.crs(), template.crs()) {
        if let (Some(a), Some(b)) = (zone_crs.epsg(), grid_crs.epsg()) {
            if a != b {
                return Err(Error::CrsMismatch(
                    zone_crs.identifier(),
                    grid_crs.identifier(),
                ));
            }
        }
    }

    let (rows, cols) = template.shape();
    let mut output = template.with_same_meta::<i32>(rows, cols);
    output.set_nodata(Some(0));

    for (index, zone) in zones.iter().enumerate() {
        let id = index as i32 + 1;

        let bbox = match zone.geometry.bounding_rect() {
            Some(bbox) => bbox,
            None => continue,
        };

        // Candidate cells from the zone's bounding box
        let (c0, r0) = template.geo_to_pixel(bbox.min().x, bbox.max().y);
        let (c1, r1) = template.geo_to_pixel(bbox.max().x, bbox.min().y);
        let col_start = c0.floor().max(0.0) as usize;
        let row_start = r0.floor().max(0.0) as usize;
        let col_end = (c1.ceil().max(0.0) as usize).min(cols);
        let row_end = (r1.ceil().max(0.0) as usize).min(rows);

        for row in row_start..row_end {
            for col in col_start..col_end {
                if output.get(row, col)? != 0 {
                    continue;
                }

                let (x0, y0) = template.transform().pixel_to_geo_corner(col, row);
                let (x1, y1) = template.transform().pixel_to_geo_corner(col + 1, row + 1);
                let cell = Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
                    .to_polygon();

                if zone.geometry.intersects(&cell) {
                    output.set(row, col, id)?;
                }
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquasite_core::crs::Crs;
    use aquasite_core::raster::GeoTransform;
    use aquasite_core::vector::Zone;
    use geo_types::{polygon, MultiPolygon};

    /// 3x3 grid at 1° resolution: x in [-125, -122], y in [42, 45]
    fn template() -> Raster<f64> {
        let mut r = Raster::filled(3, 3, 1.0);
        r.set_transform(GeoTransform::new(-125.0, 45.0, 1.0, -1.0));
        r.set_crs(Some(Crs::wgs84()));
        r
    }

    fn rect_zone(key: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Zone {
        let geometry = MultiPolygon(vec![polygon![
            (x: min_x, y: min_y),
            (x: max_x, y: min_y),
            (x: max_x, y: max_y),
            (x: min_x, y: max_y),
            (x: min_x, y: min_y),
        ]]);
        Zone::new(key, key, 0.0, geometry)
    }

    #[test]
    fn test_full_cover_zone() {
        let mut zones = ZoneLayer::new(Some(Crs::wgs84()));
        zones.push(rect_zone("Z1", -125.0, 42.0, -122.0, 45.0));

        let raster = rasterize_zones(&zones, &template()).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(raster.get(row, col).unwrap(), 1);
            }
        }
    }

    #[test]
    fn test_touches_semantics() {
        // Zone covers x in [-125, -123.5]: column 0 fully, column 1 only
        // halfway. Both count; column 2 stays outside.
        let mut zones = ZoneLayer::new(Some(Crs::wgs84()));
        zones.push(rect_zone("Z1", -125.0, 42.0, -123.5, 45.0));

        let raster = rasterize_zones(&zones, &template()).unwrap();
        for row in 0..3 {
            assert_eq!(raster.get(row, 0).unwrap(), 1);
            assert_eq!(raster.get(row, 1).unwrap(), 1);
            assert_eq!(raster.get(row, 2).unwrap(), 0);
        }
    }

    #[test]
    fn test_outside_zone_is_nodata() {
        let mut zones = ZoneLayer::new(Some(Crs::wgs84()));
        zones.push(rect_zone("Z1", -60.0, 0.0, -50.0, 10.0));

        let raster = rasterize_zones(&zones, &template()).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(raster.get(row, col).unwrap(), 0);
            }
        }
        assert_eq!(raster.nodata(), Some(0));
    }

    #[test]
    fn test_zone_ids_follow_layer_order() {
        let mut zones = ZoneLayer::new(Some(Crs::wgs84()));
        zones.push(rect_zone("N", -125.0, 44.0, -122.0, 45.0));
        zones.push(rect_zone("S", -125.0, 42.0, -122.0, 43.0));

        let raster = rasterize_zones(&zones, &template()).unwrap();
        assert_eq!(raster.get(0, 0).unwrap(), 1);
        assert_eq!(raster.get(2, 0).unwrap(), 2);
    }

    #[test]
    fn test_overlap_keeps_first_zone() {
        let mut zones = ZoneLayer::new(Some(Crs::wgs84()));
        zones.push(rect_zone("A", -125.0, 42.0, -122.0, 45.0));
        zones.push(rect_zone("B", -125.0, 42.0, -122.0, 45.0));

        let raster = rasterize_zones(&zones, &template()).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(raster.get(row, col).unwrap(), 1);
            }
        }
    }

    #[test]
    fn test_epsg_mismatch_fails() {
        let mut zones = ZoneLayer::new(Some(Crs::from_epsg(3857)));
        zones.push(rect_zone("Z1", -125.0, 42.0, -122.0, 45.0));
        assert!(matches!(
            rasterize_zones(&zones, &template()),
            Err(Error::CrsMismatch(_, _))
        ));
    }
}
