use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::fmt::SubscriberBuilder;

use courtplan::cad::load_dxf_boundary;
use courtplan::config::FileConfig;
use courtplan::domain::catalog::{
    DEFAULT_BADMINTON_COUNT, DEFAULT_BASKETBALL_COUNT, DEFAULT_BUFFER, DEFAULT_SITE_HEIGHT,
    DEFAULT_SITE_WIDTH, DEFAULT_SOCCER_COUNT,
};
use courtplan::domain::{Boundary, VenueType, standard_catalog};
use courtplan::export::{DxfOptions, ExportFormat, SvgOptions, write_dxf, write_json, write_svg};
use courtplan::geometry::{Unit, conversion_factor, simplify_boundary};
use courtplan::layout::{
    DEFAULT_ATTEMPTS, Layout, LayoutParams, OverlapTest, ShortfallReason, generate_layout,
    generate_schemes, validate_layout,
};

/// Lay out sports courts and venues inside a site boundary
///
/// Examples:
///   # Default 250x180 m site with 3 basketball and 15 badminton courts
///   courtplan
///
///   # Reproducible run with a soccer pitch and tilted courts
///   courtplan --soccer 1 --max-rotation 20 --seed 42
///
///   # Site outline from a CAD drawing, five alternatives as DXF in millimeters
///   courtplan --dxf site.dxf --simplify 0.5 --schemes 5 --format dxf --export-unit mm
///
///   # Use a config file with a custom venue catalog
///   courtplan --config festival.toml
#[derive(Parser, Debug)]
#[command(name = "courtplan")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches courtplan.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site width (rectangular site)
    #[arg(long, default_value = "250.0")]
    width: f64,

    /// Site height (rectangular site)
    #[arg(long, default_value = "180.0")]
    height: f64,

    /// Take the site outline from the largest closed polyline of a DXF file
    #[arg(long)]
    dxf: Option<PathBuf>,

    /// Simplification tolerance for DXF outlines, in site units
    #[arg(long)]
    simplify: Option<f64>,

    /// Number of basketball courts (standard catalog only)
    #[arg(long, default_value = "3")]
    basketball: usize,

    /// Number of soccer pitches (standard catalog only)
    #[arg(long, default_value = "0")]
    soccer: usize,

    /// Number of badminton courts (standard catalog only)
    #[arg(long, default_value = "15")]
    badminton: usize,

    /// Minimum clearance between venues
    #[arg(short = 'b', long, default_value = "5.0")]
    buffer: f64,

    /// Maximum rotation for free venues, in degrees (0 = axis-aligned)
    #[arg(long, default_value = "0.0")]
    max_rotation: f64,

    /// Sampling attempts per venue instance
    #[arg(long, default_value = "3000")]
    attempts: usize,

    /// Seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Sample positions over the whole bounding box instead of insetting by the buffer
    #[arg(long)]
    no_inset: bool,

    /// Compare rotated venues by their true outline instead of their unrotated box
    #[arg(long)]
    oriented_overlap: bool,

    /// Number of alternative layouts to generate
    #[arg(short = 'n', long, default_value = "1")]
    schemes: usize,

    /// Output path without extension (defaults to "layout")
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output formats, comma separated
    #[arg(short = 'f', long, value_delimiter = ',', default_values = ["svg", "json"])]
    format: Vec<ExportFormat>,

    /// Unit of all site lengths
    #[arg(long)]
    unit: Option<Unit>,

    /// Unit written to DXF files (defaults to the site unit)
    #[arg(long)]
    export_unit: Option<Unit>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let rect_flags = (args.width - DEFAULT_SITE_WIDTH).abs() > f64::EPSILON
        || (args.height - DEFAULT_SITE_HEIGHT).abs() > f64::EPSILON;
    let width = if rect_flags {
        args.width
    } else {
        file_config.site.width
    };
    let height = if rect_flags {
        args.height
    } else {
        file_config.site.height
    };
    let simplify = args.simplify.unwrap_or(file_config.site.simplify);
    let site_unit = args.unit.unwrap_or(file_config.site.unit);
    let export_unit = args
        .export_unit
        .or(file_config.export.unit)
        .unwrap_or(site_unit);

    let mut params = file_config.layout.to_params();
    if (args.buffer - DEFAULT_BUFFER).abs() > f64::EPSILON {
        params.buffer = args.buffer;
    }
    if args.max_rotation != 0.0 {
        params.max_rotation_degrees = args.max_rotation;
    }
    if args.attempts != DEFAULT_ATTEMPTS {
        params.attempts_per_instance = args.attempts;
    }
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    if args.no_inset {
        params.inset_sampling = false;
    }
    if args.oriented_overlap {
        params.overlap = OverlapTest::Oriented;
    }

    let schemes = if args.schemes != 1 {
        args.schemes
    } else {
        file_config.schemes
    };
    let verbose = args.verbose || file_config.verbose;
    let output = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| PathBuf::from("layout"));

    let counts_changed = args.basketball != DEFAULT_BASKETBALL_COUNT
        || args.soccer != DEFAULT_SOCCER_COUNT
        || args.badminton != DEFAULT_BADMINTON_COUNT;
    let catalog: Vec<VenueType> = if file_config.venues.is_empty() || counts_changed {
        standard_catalog(args.basketball, args.soccer, args.badminton)
    } else {
        file_config.venues.clone()
    };

    if schemes == 0 {
        bail!("--schemes must be at least 1");
    }

    println!("courtplan - Venue Layout Generator");
    println!("==================================");
    println!();

    let spinner = create_spinner("Preparing site boundary...");
    let start = Instant::now();
    let boundary = if let Some(ref dxf) = args.dxf {
        load_site_dxf(dxf, simplify)?
    } else if rect_flags {
        Boundary::rectangle(width, height)
    } else if let Some(ref points) = file_config.site.boundary {
        Boundary::new(points.clone())
    } else if let Some(ref dxf) = file_config.site.dxf {
        load_site_dxf(dxf, simplify)?
    } else {
        Boundary::rectangle(width, height)
    };
    let extent = boundary
        .bounds()
        .map(|b| format!("{:.1} x {:.1}", b.width(), b.height()))
        .unwrap_or_else(|| "empty".to_string());
    spinner.finish_with_message(format!(
        "Site: {} vertices, {}{} extent, area {:.1}{}² [{:.1}s]",
        boundary.points.len(),
        extent,
        site_unit.symbol(),
        boundary.area(),
        site_unit.symbol(),
        start.elapsed().as_secs_f32()
    ));

    if verbose {
        println!("Configuration:");
        for venue in &catalog {
            println!(
                "  {}: {} x {:.1} x {:.1}{} ({:?})",
                venue.name,
                venue.count,
                venue.width,
                venue.height,
                site_unit.symbol(),
                venue.orientation
            );
        }
        println!("  Buffer: {}{}", params.buffer, site_unit.symbol());
        println!("  Max rotation: {}°", params.max_rotation_degrees);
        println!("  Attempts per venue: {}", params.attempts_per_instance);
        println!("  Inset sampling: {}", params.inset_sampling);
        println!("  Overlap test: {:?}", params.overlap);
        println!("  Schemes: {}", schemes);
        if export_unit != site_unit {
            println!("  Export unit: {}", export_unit.symbol());
        }
        println!("  Output: {}", output.display());
        println!();
    }

    let spinner = create_spinner("Placing venues...");
    let start = Instant::now();
    let layouts = if schemes == 1 {
        vec![generate_layout(&catalog, &boundary, &params).context("Invalid layout configuration")?]
    } else {
        generate_schemes(&catalog, &boundary, &params, schemes)
            .context("Invalid layout configuration")?
    };
    let placed: usize = layouts.iter().map(Layout::total_placed).sum();
    spinner.finish_with_message(format!(
        "Placed {} venues in {} scheme(s) [{:.1}s]",
        placed,
        layouts.len(),
        start.elapsed().as_secs_f32()
    ));

    let dxf_options = DxfOptions {
        factor: conversion_factor(site_unit, export_unit),
        text_height: file_config.export.text_height,
        unit: export_unit,
    };
    let svg_options = SvgOptions {
        unit_symbol: site_unit.symbol().to_string(),
        ..Default::default()
    };

    let mut written = Vec::new();
    for (index, layout) in layouts.iter().enumerate() {
        println!();
        if layouts.len() > 1 {
            println!("Scheme {} (seed {})", index + 1, layout.seed);
        } else {
            println!("Layout (seed {})", layout.seed);
        }
        print_summary(layout);

        let report = validate_layout(layout, &catalog, &boundary, &params);
        if verbose || !report.is_valid() {
            println!("  {}", report.summary());
        }
        for warning in &report.warnings {
            println!("  Warning: {}", warning);
        }

        let stem = if layouts.len() > 1 {
            PathBuf::from(format!("{}-{}", output.display(), index + 1))
        } else {
            output.clone()
        };
        for &format in &args.format {
            let path = PathBuf::from(format!("{}.{}", stem.display(), format.extension()));
            match format {
                ExportFormat::Svg => {
                    write_svg(&path, &boundary, layout, &catalog, &svg_options)?;
                }
                ExportFormat::Dxf => {
                    write_dxf(&path, &boundary, layout, &catalog, &dxf_options)?;
                }
                ExportFormat::Json => write_json(&path, layout)?,
            }
            written.push(path);
        }
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    for path in &written {
        println!("Output: {}", path.display());
    }

    Ok(())
}

fn load_site_dxf(path: &Path, simplify: f64) -> Result<Boundary> {
    let boundary = load_dxf_boundary(path)?;
    let simplified = simplify_boundary(&boundary, simplify);
    if simplified.points.len() != boundary.points.len() {
        tracing::debug!(
            before = boundary.points.len(),
            after = simplified.points.len(),
            "simplified site outline"
        );
    }
    Ok(simplified)
}

fn print_summary(layout: &Layout) {
    for summary in &layout.summaries {
        println!(
            "  {:<12} {:>3} / {:<3} placed",
            summary.name, summary.placed, summary.requested
        );
    }
    for summary in layout.shortfalls() {
        let why = match summary.reason {
            Some(ShortfallReason::DoesNotFit) => "it does not fit inside the site",
            Some(ShortfallReason::Degenerate) => "the site has no usable area",
            Some(ShortfallReason::AttemptsExhausted) | None => "no free spot was found",
        };
        println!(
            "  Notice: could only place {} of {} {}; {}",
            summary.placed, summary.requested, summary.name, why
        );
    }
    println!(
        "  Total: {} / {} venues",
        layout.total_placed(),
        layout.total_requested()
    );
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
