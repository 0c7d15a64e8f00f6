//! Ordered stacks of same-grid rasters
//!
//! A `RasterStack` holds repeated observations of one variable (e.g. five
//! annual SST means) on an identical grid, so they can be reduced
//! cell-by-cell.

use crate::error::{Error, Result};
use crate::raster::Raster;

/// An ordered sequence of rasters sharing identical grid geometry.
///
/// Layers are indexed by position and by name. `push` enforces the
/// stackability invariant: every layer must share the first layer's
/// dimensions, geotransform, and CRS.
#[derive(Debug, Clone, Default)]
pub struct RasterStack {
    layers: Vec<Raster<f64>>,
    names: Vec<String>,
}

impl RasterStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named layer.
    ///
    /// Fails with `Error::GridMismatch` (or `SizeMismatch`) when the layer
    /// does not share the grid of the layers already present.
    pub fn push(&mut self, name: impl Into<String>, layer: Raster<f64>) -> Result<()> {
        if let Some(first) = self.layers.first() {
            first.ensure_same_grid(&layer)?;
        }
        self.names.push(name.into());
        self.layers.push(layer);
        Ok(())
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer name by position
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Layer by name (first match)
    pub fn by_name(&self, name: &str) -> Option<&Raster<f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.layers.get(i))
    }

    /// The grid template: the first layer, whose geometry all layers share
    pub fn template(&self) -> Result<&Raster<f64>> {
        self.layers.first().ok_or(Error::EmptyStack)
    }

    /// Iterate over layers in order
    pub fn iter(&self) -> impl Iterator<Item = &Raster<f64>> {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::raster::GeoTransform;

    fn layer(fill: f64) -> Raster<f64> {
        let mut r = Raster::filled(4, 4, fill);
        r.set_transform(GeoTransform::new(-125.0, 45.0, 0.25, -0.25));
        r.set_crs(Some(Crs::wgs84()));
        r
    }

    #[test]
    fn test_push_and_lookup() {
        let mut stack = RasterStack::new();
        stack.push("sst_2008", layer(284.0)).unwrap();
        stack.push("sst_2009", layer(285.0)).unwrap();

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.name(0), Some("sst_2008"));
        assert_eq!(stack.by_name("sst_2009").unwrap().get(0, 0).unwrap(), 285.0);
        assert_eq!(stack.template().unwrap().get(0, 0).unwrap(), 284.0);
    }

    #[test]
    fn test_push_rejects_grid_mismatch() {
        let mut stack = RasterStack::new();
        stack.push("a", layer(1.0)).unwrap();

        let mut wrong = Raster::filled(4, 4, 2.0);
        wrong.set_transform(GeoTransform::new(-120.0, 45.0, 0.25, -0.25));
        wrong.set_crs(Some(Crs::wgs84()));
        assert!(stack.push("b", wrong).is_err());

        let wrong_size = layer(2.0);
        let mut small = Raster::filled(3, 4, 2.0);
        small.set_transform(*wrong_size.transform());
        small.set_crs(Some(Crs::wgs84()));
        assert!(stack.push("c", small).is_err());
    }

    #[test]
    fn test_empty_stack_has_no_template() {
        let stack = RasterStack::new();
        assert!(stack.template().is_err());
    }
}
