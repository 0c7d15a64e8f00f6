//! Vector zone layers
//!
//! Zones are the polygon regions that suitability is aggregated over
//! (Exclusive Economic Zone regions, for the West Coast domain). Each
//! zone carries a short key, a display name, and a precomputed nominal
//! geodesic area independent of any raster resolution.

use crate::crs::Crs;
use geo_types::MultiPolygon;

/// A polygon zone with its attributes
#[derive(Debug, Clone)]
pub struct Zone {
    /// Unique short code (e.g. "CA-S")
    pub key: String,
    /// Human-readable name (e.g. "Southern California")
    pub name: String,
    /// Nominal geodesic area of the zone in km²
    pub area_km2: f64,
    /// Zone geometry
    pub geometry: MultiPolygon<f64>,
}

impl Zone {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        area_km2: f64,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            area_km2,
            geometry,
        }
    }
}

/// An ordered set of zones plus the layer CRS.
///
/// Zone order is load order; the rasterizer burns zones in this order and
/// reports preserve it. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct ZoneLayer {
    zones: Vec<Zone>,
    crs: Option<Crs>,
}

impl ZoneLayer {
    /// Create an empty layer
    pub fn new(crs: Option<Crs>) -> Self {
        Self {
            zones: Vec::new(),
            crs,
        }
    }

    /// Append a zone
    pub fn push(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the layer has no zones
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone by position
    pub fn get(&self, index: usize) -> Option<&Zone> {
        self.zones.get(index)
    }

    /// Zone by key
    pub fn by_key(&self, key: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.key == key)
    }

    /// Layer CRS
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Iterate over zones in order
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, MultiPolygon};

    fn unit_square() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]])
    }

    #[test]
    fn test_layer_lookup() {
        let mut layer = ZoneLayer::new(Some(Crs::wgs84()));
        layer.push(Zone::new("WA", "Washington", 1000.0, unit_square()));
        layer.push(Zone::new("OR", "Oregon", 2000.0, unit_square()));

        assert_eq!(layer.len(), 2);
        assert_eq!(layer.by_key("OR").unwrap().name, "Oregon");
        assert!(layer.by_key("CA").is_none());
        assert_eq!(layer.get(0).unwrap().key, "WA");
    }
}
