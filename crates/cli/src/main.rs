//! AquaSite CLI - marine aquaculture site suitability
//!
//! Runs the fixed pipeline over a set of annual SST rasters, one
//! bathymetry raster, and an EEZ zone shapefile, and renders the
//! per-zone suitability report.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use aquasite_analysis::align::IdentityReprojector;
use aquasite_analysis::pipeline::{evaluate_with_mask, SpeciesParams};
use aquasite_analysis::zonal::SuitabilityReport;
use aquasite_core::crs::Crs;
use aquasite_core::io::{read_geotiff, read_zone_layer, write_geotiff, ZoneFields};
use aquasite_core::raster::{Raster, RasterStack};
use tabled::{settings::Style, Table, Tabled};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "aquasite")]
#[command(author, version, about = "Marine aquaculture site suitability", long_about = None)]
struct Cli {
    /// Annual SST rasters in Kelvin (GeoTIFF), one per year
    #[arg(long = "sst", required = true, num_args = 1..)]
    sst: Vec<PathBuf>,

    /// Bathymetry raster (GeoTIFF, metres, negative below sea level)
    #[arg(long)]
    depth: PathBuf,

    /// EEZ zone shapefile
    #[arg(long)]
    zones: PathBuf,

    /// Species display name
    #[arg(long, default_value = "Pacific oyster")]
    species: String,

    /// Minimum tolerated sea-surface temperature in °C
    #[arg(long, default_value_t = 11.0)]
    min_temp: f64,

    /// Maximum tolerated sea-surface temperature in °C
    #[arg(long, default_value_t = 30.0)]
    max_temp: f64,

    /// Minimum tolerated depth in metres below sea level
    #[arg(long, default_value_t = 0.0)]
    min_depth: f64,

    /// Maximum tolerated depth in metres below sea level
    #[arg(long, default_value_t = 70.0)]
    max_depth: f64,

    /// Attribute field holding the zone key
    #[arg(long, default_value = "rgn_key")]
    key_field: String,

    /// Attribute field holding the zone display name
    #[arg(long, default_value = "rgn")]
    name_field: String,

    /// Attribute field holding the nominal zone area in km²
    #[arg(long, default_value = "area_km2")]
    area_field: String,

    /// EPSG code assumed for rasters without CRS metadata
    #[arg(long, default_value_t = 4326)]
    assume_epsg: u32,

    /// Write the combined suitability mask to this GeoTIFF
    #[arg(long)]
    mask_out: Option<PathBuf>,

    /// Report output format
    #[arg(long, value_enum, default_value = "table")]
    format: Format,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

// ─── Entry point ────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let sst = load_sst_stack(&cli)?;
    let depth = load_raster(&cli.depth, cli.assume_epsg)?;

    let fields = ZoneFields {
        key: cli.key_field.clone(),
        name: cli.name_field.clone(),
        area_km2: cli.area_field.clone(),
    };
    let zones = read_zone_layer(&cli.zones, &fields)
        .with_context(|| format!("reading zone layer {}", cli.zones.display()))?;
    info!(
        layers = sst.len(),
        zones = zones.len(),
        "inputs loaded"
    );

    let params = SpeciesParams::new(
        &cli.species,
        cli.min_temp,
        cli.max_temp,
        cli.min_depth,
        cli.max_depth,
    );

    let (report, mask) = evaluate_with_mask(&params, &sst, &depth, &zones, &IdentityReprojector)
        .context("running suitability pipeline")?;

    if let Some(path) = &cli.mask_out {
        write_geotiff(&mask, path)
            .with_context(|| format!("writing mask to {}", path.display()))?;
        info!(path = %path.display(), "combined suitability mask written");
    }

    match cli.format {
        Format::Table => print_table(&report),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

// ─── Loading ────────────────────────────────────────────────────────────

fn load_raster(path: &Path, assume_epsg: u32) -> Result<Raster<f64>> {
    let mut raster: Raster<f64> =
        read_geotiff(path).with_context(|| format!("reading {}", path.display()))?;

    if raster.crs().is_none() {
        debug!(path = %path.display(), epsg = assume_epsg, "no CRS metadata, assuming EPSG");
        raster.set_crs(Some(Crs::from_epsg(assume_epsg)));
    }

    let (rows, cols) = raster.shape();
    let stats = raster.statistics();
    debug!(
        path = %path.display(),
        rows,
        cols,
        valid = stats.valid_count,
        min = stats.min,
        max = stats.max,
        "raster loaded"
    );

    Ok(raster)
}

fn load_sst_stack(cli: &Cli) -> Result<RasterStack> {
    let mut stack = RasterStack::new();
    for path in &cli.sst {
        let raster = load_raster(path, cli.assume_epsg)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sst")
            .to_string();
        stack
            .push(name, raster)
            .with_context(|| format!("stacking {}", path.display()))?;
    }
    Ok(stack)
}

// ─── Report rendering ───────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Total Suitable Area (km²)")]
    suitable: String,
    #[tabled(rename = "Percent Suitable Area")]
    percent: String,
}

fn print_table(report: &SuitabilityReport) {
    let rows: Vec<ReportRow> = report
        .zones
        .iter()
        .map(|z| ReportRow {
            region: z.name.clone(),
            suitable: format!("{:.2}", z.suitable_area_km2),
            percent: format!("{:.2}", z.percent_suitable),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());

    println!("Suitable area for {}", report.species);
    println!("{table}");
}
