//! Zone layer loading from shapefiles
//!
//! Reads the EEZ polygon shapefile plus the attribute columns naming each
//! zone and carrying its precomputed geodesic area. The sidecar .prj is
//! read as WKT when present.

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::vector::{Zone, ZoneLayer};
use geo_types::MultiPolygon;
use shapefile::dbase::{FieldValue, Record};
use shapefile::Shape;
use std::path::Path;

/// Attribute field names for the zone layer.
///
/// Defaults match the West Coast EEZ regions file (`rgn_key`, `rgn`,
/// `area_km2`).
#[derive(Debug, Clone)]
pub struct ZoneFields {
    /// Field holding the unique zone key
    pub key: String,
    /// Field holding the display name
    pub name: String,
    /// Field holding the nominal zone area in km²
    pub area_km2: String,
}

impl Default for ZoneFields {
    fn default() -> Self {
        Self {
            key: "rgn_key".to_string(),
            name: "rgn".to_string(),
            area_km2: "area_km2".to_string(),
        }
    }
}

/// Read a polygon shapefile into a `ZoneLayer`.
///
/// Every feature must carry the three attribute fields; a missing field or
/// a non-polygon shape is fatal. Null shapes are skipped.
pub fn read_zone_layer<P: AsRef<Path>>(path: P, fields: &ZoneFields) -> Result<ZoneLayer> {
    let path = path.as_ref();
    let crs = read_prj(path);

    let mut reader = shapefile::Reader::from_path(path)?;
    let mut layer = ZoneLayer::new(crs);

    for pair in reader.iter_shapes_and_records() {
        let (shape, record) = pair?;

        let geometry: MultiPolygon<f64> = match shape {
            Shape::Polygon(p) => MultiPolygon::<f64>::try_from(p)
                .map_err(|e| Error::Shapefile(format!("polygon conversion: {}", e)))?,
            Shape::NullShape => continue,
            other => {
                return Err(Error::UnsupportedDataType(format!(
                    "shapefile shape type {}",
                    other.shapetype()
                )))
            }
        };

        let key = string_field(&record, &fields.key)?;
        let name = string_field(&record, &fields.name)?;
        let area_km2 = numeric_field(&record, &fields.area_km2)?;

        layer.push(Zone::new(key, name, area_km2, geometry));
    }

    Ok(layer)
}

/// Read the sidecar .prj as a WKT CRS, if it exists
fn read_prj(shp_path: &Path) -> Option<Crs> {
    let prj = shp_path.with_extension("prj");
    let wkt = std::fs::read_to_string(prj).ok()?;
    let wkt = wkt.trim();
    if wkt.is_empty() {
        return None;
    }
    Some(Crs::from_wkt(wkt))
}

fn string_field(record: &Record, field: &str) -> Result<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Ok(s.trim().to_string()),
        Some(FieldValue::Character(None)) | None => {
            Err(Error::MissingAttribute(field.to_string()))
        }
        Some(_) => Err(Error::UnsupportedDataType(format!(
            "field {} is not a text field",
            field
        ))),
    }
}

fn numeric_field(record: &Record, field: &str) -> Result<f64> {
    match record.get(field) {
        Some(FieldValue::Numeric(Some(v))) => Ok(*v),
        Some(FieldValue::Double(v)) => Ok(*v),
        Some(FieldValue::Float(Some(v))) => Ok(*v as f64),
        Some(FieldValue::Integer(v)) => Ok(*v as f64),
        Some(FieldValue::Numeric(None)) | Some(FieldValue::Float(None)) | None => {
            Err(Error::MissingAttribute(field.to_string()))
        }
        Some(_) => Err(Error::UnsupportedDataType(format!(
            "field {} is not a numeric field",
            field
        ))),
    }
}
