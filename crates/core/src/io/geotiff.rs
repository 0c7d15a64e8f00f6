//! GeoTIFF reading/writing over the `tiff` crate
//!
//! Reads single-band rasters with their ModelPixelScale/ModelTiepoint
//! georeferencing, the GeoKey CRS code, and the GDAL no-data tag. Writing
//! is 32-bit float, enough to persist derived suitability masks.

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

// GeoTIFF / GDAL private tags
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GDAL_NODATA: u16 = 42113;

// GeoKey IDs
const KEY_MODEL_TYPE: u64 = 1024;
const KEY_RASTER_TYPE: u64 = 1025;
const KEY_GEOGRAPHIC_TYPE: u64 = 2048;
const KEY_PROJECTED_CS_TYPE: u64 = 3072;

/// Read a GeoTIFF file into a Raster.
///
/// Single-band only. Georeferencing, CRS, and no-data metadata are read
/// when present; a file without them yields a raster with the default
/// transform and no CRS.
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    let mut decoder =
        Decoder::new(file).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let data: Vec<T> = match result {
        DecodingResult::F32(buf) => cast_buffer(&buf),
        DecodingResult::F64(buf) => cast_buffer(&buf),
        DecodingResult::U8(buf) => cast_buffer(&buf),
        DecodingResult::U16(buf) => cast_buffer(&buf),
        DecodingResult::U32(buf) => cast_buffer(&buf),
        DecodingResult::I8(buf) => cast_buffer(&buf),
        DecodingResult::I16(buf) => cast_buffer(&buf),
        DecodingResult::I32(buf) => cast_buffer(&buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Ok(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));
    raster.set_nodata(read_nodata(&mut decoder));

    Ok(raster)
}

fn cast_buffer<S, T>(buf: &[S]) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Read GeoTransform from ModelPixelScale + ModelTiepoint tags
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))
        .map_err(|_| Error::Other("No pixel scale tag".into()))?;

    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT))
        .map_err(|_| Error::Other("No tiepoint tag".into()))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z]; scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

        return Ok(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
    }

    Err(Error::Other("Cannot determine geotransform".into()))
}

/// Read the CRS from the GeoKeyDirectory tag.
///
/// Only directly-coded EPSG keys are understood (GeographicTypeGeoKey /
/// ProjectedCSTypeGeoKey); citation-only files come back as `None`.
fn read_crs<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<Crs> {
    let keys = decoder
        .get_tag_u64_vec(Tag::Unknown(TAG_GEO_KEY_DIRECTORY))
        .ok()?;
    if keys.len() < 4 {
        return None;
    }

    let n_keys = keys[3] as usize;
    let mut geographic = None;
    let mut projected = None;

    for i in 0..n_keys {
        let base = 4 + i * 4;
        if base + 3 >= keys.len() {
            break;
        }
        let (key, location, value) = (keys[base], keys[base + 1], keys[base + 3]);
        // location 0 means the value is stored inline
        if location != 0 || value == 0 || value == 32767 {
            continue;
        }
        match key {
            KEY_GEOGRAPHIC_TYPE => geographic = Some(value as u32),
            KEY_PROJECTED_CS_TYPE => projected = Some(value as u32),
            _ => {}
        }
    }

    // A projected CS defines the grid coordinates when both are coded
    projected.or(geographic).map(Crs::from_epsg)
}

/// Read the no-data value from the GDAL_NODATA ascii tag
fn read_nodata<T, R>(decoder: &mut Decoder<R>) -> Option<T>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let text = decoder
        .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
        .ok()?;
    let value: f64 = text.trim().trim_end_matches('\0').parse().ok()?;
    if value.is_nan() {
        return Some(T::default_nodata());
    }
    num_traits::cast(value)
}

/// Write a Raster to a GeoTIFF file.
///
/// Writes 32-bit float data with georeferencing, CRS, and no-data tags.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut encoder =
        TiffEncoder::new(file).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();

    let scale = vec![gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), scale.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write scale tag: {}", e)))?;

    let tiepoint = vec![0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), tiepoint.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write tiepoint tag: {}", e)))?;

    let geokeys = build_geokeys(raster.crs());
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_GEO_KEY_DIRECTORY), geokeys.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;

    if let Some(nd) = raster.nodata().and_then(RasterElement::to_f64) {
        let text = if nd.is_nan() {
            "nan".to_string()
        } else {
            format!("{}", nd)
        };
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_GDAL_NODATA), text.as_str())
            .map_err(|e| Error::Other(format!("Cannot write nodata tag: {}", e)))?;
    }

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

/// Build a GeoKeyDirectory for the given CRS.
///
/// GTModelTypeGeoKey (2 = geographic, 1 = projected), GTRasterTypeGeoKey
/// (1 = RasterPixelIsArea), plus the EPSG code when known.
fn build_geokeys(crs: Option<&Crs>) -> Vec<u16> {
    let epsg = crs.and_then(Crs::epsg).filter(|&c| c <= u16::MAX as u32);

    match (epsg, crs.map(Crs::is_geographic)) {
        (Some(code), Some(true)) => vec![
            1, 1, 0, 3,
            KEY_MODEL_TYPE as u16, 0, 1, 2,
            KEY_RASTER_TYPE as u16, 0, 1, 1,
            KEY_GEOGRAPHIC_TYPE as u16, 0, 1, code as u16,
        ],
        (Some(code), Some(false)) => vec![
            1, 1, 0, 3,
            KEY_MODEL_TYPE as u16, 0, 1, 1,
            KEY_RASTER_TYPE as u16, 0, 1, 1,
            KEY_PROJECTED_CS_TYPE as u16, 0, 1, code as u16,
        ],
        _ => vec![
            1, 1, 0, 2,
            KEY_MODEL_TYPE as u16, 0, 1, 1,
            KEY_RASTER_TYPE as u16, 0, 1, 1,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raster() -> Raster<f64> {
        let values: Vec<f64> = (0..12).map(|v| v as f64 * 0.5).collect();
        let mut r = Raster::from_vec(values, 3, 4).unwrap();
        r.set_transform(GeoTransform::new(-125.0, 45.0, 0.25, -0.25));
        r.set_crs(Some(Crs::wgs84()));
        r.set_nodata(Some(f64::NAN));
        r
    }

    #[test]
    fn test_roundtrip_values_and_metadata() {
        let raster = sample_raster();
        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&raster, tmp.path()).unwrap();

        let reloaded: Raster<f64> = read_geotiff(tmp.path()).unwrap();
        assert_eq!(reloaded.shape(), raster.shape());
        assert_eq!(reloaded.crs().and_then(Crs::epsg), Some(4326));
        assert!(raster
            .transform()
            .approx_eq(reloaded.transform(), 1e-9));

        for row in 0..3 {
            for col in 0..4 {
                let orig = raster.get(row, col).unwrap();
                let copy = reloaded.get(row, col).unwrap();
                assert!((orig - copy).abs() < 1e-6, "({row},{col}): {orig} vs {copy}");
            }
        }
    }

    #[test]
    fn test_roundtrip_nodata_sentinel() {
        let mut raster = sample_raster();
        raster.set_nodata(Some(-9999.0));
        raster.set(0, 0, -9999.0).unwrap();

        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&raster, tmp.path()).unwrap();

        let reloaded: Raster<f64> = read_geotiff(tmp.path()).unwrap();
        assert_eq!(reloaded.nodata(), Some(-9999.0));
        assert!(reloaded.is_nodata(reloaded.get(0, 0).unwrap()));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result: Result<Raster<f64>> = read_geotiff("/nonexistent/sst.tif");
        assert!(result.is_err());
    }
}
