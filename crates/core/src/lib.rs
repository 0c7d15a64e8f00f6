//! # AquaSite Core
//!
//! Core types and I/O for the AquaSite marine-aquaculture suitability
//! pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: Georeferenced raster grid type
//! - `RasterStack`: Ordered stack of same-grid rasters
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `Crs`: Coordinate Reference System handling
//! - `ZoneLayer`: Vector zones (EEZ regions) with attributes
//! - GeoTIFF and shapefile I/O

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;
pub mod vector;

pub use crs::Crs;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement, RasterStack};
pub use vector::{Zone, ZoneLayer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement, RasterStack};
    pub use crate::vector::{Zone, ZoneLayer};
}
