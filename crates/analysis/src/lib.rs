//! # AquaSite Analysis
//!
//! Suitability pipeline stages for marine-aquaculture siting.
//!
//! ## Stages
//!
//! - **align**: Snap a raster onto a reference grid (nearest-neighbor)
//! - **temporal**: Mean of a raster stack, unit conversion
//! - **classify**: Reclassify a continuous raster into a binary suitability mask
//! - **combine**: Intersect suitability masks
//! - **rasterize**: Burn vector zones onto a raster grid
//! - **zonal**: Geodesic cell areas and per-zone suitable-area aggregation
//! - **pipeline**: The fixed-order orchestration, parameterized per species

pub mod align;
pub mod classify;
pub mod combine;
pub mod pipeline;
pub mod rasterize;
pub mod temporal;
pub mod zonal;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::align::{align_to, IdentityReprojector, Reprojector};
    pub use crate::classify::{reclassify, suitability_mask, ReclassEntry, ToleranceRange};
    pub use crate::combine::combine_masks;
    pub use crate::pipeline::{evaluate, evaluate_with_mask, SpeciesParams};
    pub use crate::rasterize::rasterize_zones;
    pub use crate::temporal::{kelvin_to_celsius, temporal_mean};
    pub use crate::zonal::{
        cell_area, suitability_report, suitable_area_by_zone, SuitabilityReport, ZoneSuitability,
    };
    pub use aquasite_core::prelude::*;
}
