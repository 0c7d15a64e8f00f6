//! I/O operations for reading and writing geospatial data

mod geotiff;
mod zones;

pub use geotiff::{read_geotiff, write_geotiff};
pub use zones::{read_zone_layer, ZoneFields};
