//! Zonal area aggregation
//!
//! Computes per-cell geodesic areas, masks them by suitability, sums the
//! result per zone, and joins the sums back to the zone layer's nominal
//! areas to produce the final report.

use aquasite_core::raster::Raster;
use aquasite_core::vector::ZoneLayer;
use aquasite_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// WGS84 authalic sphere radius in metres
pub const EARTH_AUTHALIC_RADIUS_M: f64 = 6_371_007.181;

/// Per-cell area raster in km², matching the input grid.
///
/// On a geographic grid cell area shrinks with latitude:
/// `R² · Δλ · (sin φ_top − sin φ_bottom)` per cell, constant along a row.
/// On a projected grid (units assumed metres) every cell has the same
/// `|pixel_width · pixel_height|`.
pub fn cell_area(raster: &Raster<f64>) -> Result<Raster<f64>> {
    let crs = raster.crs().ok_or(Error::MissingCrs("input"))?;
    let (rows, cols) = raster.shape();
    let gt = *raster.transform();

    let mut output = raster.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));

    if crs.is_geographic() {
        let width_rad = gt.cell_width().to_radians();
        for row in 0..rows {
            let (top, bottom) = gt.row_edges_y(row);
            let band = (top.to_radians().sin() - bottom.to_radians().sin()).abs();
            let area_km2 =
                EARTH_AUTHALIC_RADIUS_M * EARTH_AUTHALIC_RADIUS_M * width_rad * band / 1e6;
            for col in 0..cols {
                output.set(row, col, area_km2)?;
            }
        }
    } else {
        let area_km2 = gt.cell_width() * gt.cell_height() / 1e6;
        for row in 0..rows {
            for col in 0..cols {
                output.set(row, col, area_km2)?;
            }
        }
    }

    Ok(output)
}

/// Sum suitable area per zone ID.
///
/// A cell contributes its area when the suitability mask holds data
/// there and the cell lies inside a zone (ID ≠ 0). Returns only zones
/// that accumulated area; absent zones mean zero suitable cells, which
/// the report join fills in.
pub fn suitable_area_by_zone(
    mask: &Raster<f64>,
    zones: &Raster<i32>,
    area: &Raster<f64>,
) -> Result<HashMap<i32, f64>> {
    mask.ensure_same_grid(zones)?;
    mask.ensure_same_grid(area)?;

    let (rows, cols) = mask.shape();
    let mut sums: HashMap<i32, f64> = HashMap::new();

    for row in 0..rows {
        for col in 0..cols {
            let zone = unsafe { zones.get_unchecked(row, col) };
            if zone == 0 {
                continue;
            }
            let suitable = unsafe { mask.get_unchecked(row, col) };
            if mask.is_nodata(suitable) {
                continue;
            }
            let cell = unsafe { area.get_unchecked(row, col) };
            if area.is_nodata(cell) {
                continue;
            }
            *sums.entry(zone).or_insert(0.0) += cell;
        }
    }

    Ok(sums)
}

/// One report row per zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSuitability {
    /// Zone key (short code)
    pub key: String,
    /// Display name
    pub name: String,
    /// Nominal zone area in km²
    pub zone_area_km2: f64,
    /// Suitable area inside the zone in km²
    pub suitable_area_km2: f64,
    /// Suitable area as a percentage of the nominal zone area
    pub percent_suitable: f64,
}

/// Suitability aggregated over all zones for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityReport {
    pub species: String,
    pub zones: Vec<ZoneSuitability>,
}

/// Join per-zone sums back onto the zone layer.
///
/// Left join over the layer: every zone appears exactly once, in layer
/// order, and zones without rasterized suitable cells report 0 km² / 0 %.
/// Zone IDs in `sums` are 1-based layer positions, as produced by the
/// rasterizer.
pub fn suitability_report(
    species: impl Into<String>,
    layer: &ZoneLayer,
    sums: &HashMap<i32, f64>,
) -> SuitabilityReport {
    let zones = layer
        .iter()
        .enumerate()
        .map(|(index, zone)| {
            let suitable_area_km2 = sums.get(&(index as i32 + 1)).copied().unwrap_or(0.0);
            let percent_suitable = if zone.area_km2 > 0.0 {
                suitable_area_km2 / zone.area_km2 * 100.0
            } else {
                0.0
            };
            ZoneSuitability {
                key: zone.key.clone(),
                name: zone.name.clone(),
                zone_area_km2: zone.area_km2,
                suitable_area_km2,
                percent_suitable,
            }
        })
        .collect();

    SuitabilityReport {
        species: species.into(),
        zones,
    }
}
