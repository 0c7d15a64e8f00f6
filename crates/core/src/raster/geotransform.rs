//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// North-up affine transformation for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and geographic
/// coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
///
/// `origin_x`/`origin_y` are the coordinates of the upper-left corner of
/// the upper-left pixel. `pixel_height` is negative for north-up grids.
/// Rotated grids are not supported; none of the SST, bathymetry, or EEZ
/// sources carry rotation terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Convert pixel coordinates to geographic coordinates.
    ///
    /// Returns the coordinates of the pixel center.
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + (col as f64 + 0.5) * self.pixel_width;
        let y = self.origin_y + (row as f64 + 0.5) * self.pixel_height;
        (x, y)
    }

    /// Convert pixel coordinates to geographic coordinates (top-left corner)
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + col as f64 * self.pixel_width;
        let y = self.origin_y + row as f64 * self.pixel_height;
        (x, y)
    }

    /// Convert geographic coordinates to fractional pixel coordinates.
    ///
    /// Returns (col, row); use `.floor()` to get the containing cell.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let col = (x - self.origin_x) / self.pixel_width;
        let row = (y - self.origin_y) / self.pixel_height;
        (col, row)
    }

    /// Y coordinates of the top and bottom edges of a pixel row.
    ///
    /// On a geographic grid these are the latitudes bounding the row,
    /// which drive the per-cell geodesic area.
    pub fn row_edges_y(&self, row: usize) -> (f64, f64) {
        let top = self.origin_y + row as f64 * self.pixel_height;
        let bottom = self.origin_y + (row as f64 + 1.0) * self.pixel_height;
        (top, bottom)
    }

    /// Cell size in the X direction
    pub fn cell_width(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Cell size in the Y direction
    pub fn cell_height(&self) -> f64 {
        self.pixel_height.abs()
    }

    /// Calculate the bounding box (min_x, min_y, max_x, max_y) for a raster
    /// of given dimensions
    pub fn bounds(&self, cols: usize, rows: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(cols, rows);

        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Compare two transforms within a tolerance.
    ///
    /// Grid-identity checks go through this rather than exact float
    /// equality; reprojected grids carry sub-nanometre rounding noise.
    pub fn approx_eq(&self, other: &GeoTransform, eps: f64) -> bool {
        (self.origin_x - other.origin_x).abs() <= eps
            && (self.origin_y - other.origin_y).abs() <= eps
            && (self.pixel_width - other.pixel_width).abs() <= eps
            && (self.pixel_height - other.pixel_height).abs() <= eps
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}
