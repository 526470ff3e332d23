#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reports how much ground a recorded trip covered.
//!
//! ```text
//! travel_coverage area <PATH_FILE> [--buffer 80] [--cap-style square]
//! travel_coverage ratio <PATH_FILE> --center-lat 35.6173 --center-lon 139.5646 [--radius 2000]
//! ```
//!
//! Defaults come from an optional TOML file (`--config`); flags override
//! it. Set `RUST_LOG=debug` for per-step geometry details.

mod config;
mod input;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use travel_coverage::{
    CorridorOptions, CoverageResult, RatioQuery, aggregate_coverage_with, coverage_ratios,
};
use travel_coverage_models::{CapStyle, GeoPoint};

use crate::config::{CoverageConfig, GeneralConfig};

#[derive(Parser)]
#[command(
    name = "travel_coverage",
    about = "Travel footprint area and coverage of a reference disc"
)]
struct Cli {
    /// TOML file with `[general]` defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the footprint area of a path
    Area(CorridorArgs),
    /// Report the footprint area and the fraction of a disc it covers
    Ratio {
        #[command(flatten)]
        corridor: CorridorArgs,
        /// Disc centre latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        center_lat: Option<f64>,
        /// Disc centre longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        center_lon: Option<f64>,
        /// Disc radius in meters (repeat for several discs)
        #[arg(long, allow_negative_numbers = true)]
        radius: Vec<f64>,
    },
}

#[derive(Args)]
struct CorridorArgs {
    /// JSON file of `[lat, lon]` pairs or location-history records
    path: PathBuf,
    /// Corridor half width in meters
    #[arg(long, allow_negative_numbers = true)]
    buffer: Option<f64>,
    /// Corridor end caps: flat, square, or round
    #[arg(long)]
    cap_style: Option<CapStyle>,
}

impl CorridorArgs {
    fn options(&self, general: &GeneralConfig) -> CorridorOptions {
        CorridorOptions::new(self.buffer.unwrap_or(general.buffer_meters))
            .with_cap_style(self.cap_style.unwrap_or(general.cap_style))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load(path)?,
        None => CoverageConfig::default(),
    };
    let general = config.general;

    match cli.command {
        Commands::Area(corridor) => {
            report_area(&corridor, &general)?;
        }
        Commands::Ratio {
            corridor,
            center_lat,
            center_lon,
            radius,
        } => {
            let coverage = report_area(&corridor, &general)?;

            let center = match (center_lat, center_lon) {
                (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)?),
                (None, None) => general.center()?,
                _ => return Err("--center-lat and --center-lon must be given together".into()),
            };
            let Some(center) = center else {
                log::warn!("No centre point configured; skipping coverage ratio");
                return Ok(());
            };

            let radii = if radius.is_empty() {
                vec![general.radius_meters]
            } else {
                radius
            };
            let queries: Vec<RatioQuery> = radii
                .iter()
                .map(|&radius_meters| RatioQuery {
                    center,
                    radius_meters,
                })
                .collect();

            let ratios = coverage_ratios(&coverage.region, &queries)?;
            for (query, ratio) in queries.iter().zip(ratios) {
                log::info!(
                    "Coverage of {}m disc at {center}: {ratio:.6}",
                    query.radius_meters
                );
                println!(
                    "Coverage within {:.0} m of {center}: {:.2}%",
                    query.radius_meters,
                    ratio * 100.0
                );
            }
        }
    }

    Ok(())
}

fn report_area(
    corridor: &CorridorArgs,
    general: &GeneralConfig,
) -> Result<CoverageResult, Box<dyn std::error::Error>> {
    let path = input::load_path(&corridor.path)?;
    let options = corridor.options(general);

    let coverage = aggregate_coverage_with(&path, &options)?;
    log::info!(
        "Footprint of {} segments: {:.1} m² in {} part(s)",
        path.segment_count(),
        coverage.area_sq_m,
        coverage.region.part_count()
    );
    println!(
        "Travel footprint ({} m half width, {} caps): {:.1} m²",
        options.half_width_meters, options.cap_style, coverage.area_sq_m
    );

    Ok(coverage)
}
