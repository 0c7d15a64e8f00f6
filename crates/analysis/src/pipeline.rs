//! The suitability pipeline
//!
//! Wires the stages into the fixed sequence, parameterized by a species'
//! temperature and depth tolerance. Every run recomputes its
//! intermediates from the inputs; `evaluate` is pure and deterministic.

use crate::align::{align_to, Reprojector};
use crate::classify::{suitability_mask, ToleranceRange};
use crate::combine::combine_masks;
use crate::rasterize::rasterize_zones;
use crate::temporal::{kelvin_to_celsius, temporal_mean};
use crate::zonal::{cell_area, suitability_report, suitable_area_by_zone, SuitabilityReport};
use aquasite_core::raster::{Raster, RasterStack};
use aquasite_core::vector::ZoneLayer;
use aquasite_core::Result;

/// Tolerance parameters for one species.
///
/// Temperatures are °C. Depths are given as positive metres below sea
/// level and stored in the negative-down convention the bathymetry uses,
/// so `depth_m` for "0 to 70 m deep" is the range [-70, 0].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesParams {
    /// Species display name
    pub name: String,
    /// Thermal tolerance in °C
    pub temperature_c: ToleranceRange,
    /// Depth tolerance in metres, negative below sea level
    pub depth_m: ToleranceRange,
}

impl SpeciesParams {
    /// Build parameters from surface-relative bounds.
    ///
    /// `min_depth`/`max_depth` are positive metres below sea level
    /// (e.g. 0 and 70); the stored range is negated accordingly.
    pub fn new(
        name: impl Into<String>,
        min_temp: f64,
        max_temp: f64,
        min_depth: f64,
        max_depth: f64,
    ) -> Self {
        Self {
            name: name.into(),
            temperature_c: ToleranceRange::new(min_temp, max_temp),
            depth_m: ToleranceRange::new(-max_depth, -min_depth),
        }
    }

    /// Pacific oyster defaults: 11–30 °C, 0–70 m depth
    pub fn oyster() -> Self {
        Self::new("Pacific oyster", 11.0, 30.0, 0.0, 70.0)
    }
}

/// Run the full pipeline and return the per-zone report.
///
/// Fixed stage order: align depth onto the SST grid → mean the SST stack
/// and convert Kelvin → Celsius → classify both variables → intersect the
/// masks → rasterize zones onto the combined grid → aggregate suitable
/// area per zone.
///
/// `sst` holds the annual SST rasters in Kelvin on a shared grid; `depth`
/// is bathymetry (negative below sea level) in any resolution/extent that
/// overlaps it.
pub fn evaluate(
    params: &SpeciesParams,
    sst: &RasterStack,
    depth: &Raster<f64>,
    zones: &ZoneLayer,
    reprojector: &impl Reprojector,
) -> Result<SuitabilityReport> {
    let (report, _) = evaluate_with_mask(params, sst, depth, zones, reprojector)?;
    Ok(report)
}

/// Like [`evaluate`], but also returns the combined suitability mask so
/// callers can persist or inspect it.
pub fn evaluate_with_mask(
    params: &SpeciesParams,
    sst: &RasterStack,
    depth: &Raster<f64>,
    zones: &ZoneLayer,
    reprojector: &impl Reprojector,
) -> Result<(SuitabilityReport, Raster<f64>)> {
    let reference = sst.template()?;
    let depth_aligned = align_to(depth, reference, reprojector)?;

    let sst_mean_c = kelvin_to_celsius(&temporal_mean(sst)?)?;

    let sst_mask = suitability_mask(&sst_mean_c, params.temperature_c)?;
    let depth_mask = suitability_mask(&depth_aligned, params.depth_m)?;

    let combined = combine_masks(&[&sst_mask, &depth_mask])?;

    let zone_raster = rasterize_zones(zones, &combined)?;
    let area = cell_area(&combined)?;
    let sums = suitable_area_by_zone(&combined, &zone_raster, &area)?;

    Ok((suitability_report(&params.name, zones, &sums), combined))
}
