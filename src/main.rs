//! Starbox CLI - procedural space skybox generator.
//!
//! Renders a layered skybox configuration into six cube-map faces (or one
//! packed cube map) and writes them to disk.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use starbox::config::{load_skybox, save_skybox};
use starbox::export::{export_skybox, ExportConvention, ExportFormat, ExportOptions};
use starbox::layers::{LayerKind, LayerParams, NoiseMode, Rgba};
use starbox::render::RenderContext;
use starbox::skybox::Skybox;

/// Procedural space skybox generator.
#[derive(Parser)]
#[command(name = "starbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a skybox configuration and export the cube map.
    Export {
        /// Skybox configuration file (JSON layer list).
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for exported files.
        #[arg(short, long, default_value = "./export")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "skybox")]
        name: String,

        /// Face edge size in texels (power of two, e.g. 512, 1024, 2048).
        #[arg(short, long, default_value = "1024")]
        size: u32,

        /// Output format.
        #[arg(short, long, default_value = "png")]
        format: CliFormat,

        /// Face naming/rotation convention of the target engine.
        #[arg(long, default_value = "default")]
        orientation: CliOrientation,

        /// Enable HDR output (float pixels + HDR noise shaping).
        #[arg(long)]
        hdr: bool,
    },

    /// Print a summary of a skybox configuration.
    Info {
        /// Skybox configuration file.
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Write a starter configuration with a star layer and a nebula layer.
    Init {
        /// Path of the configuration file to create.
        #[arg(short, long, default_value = "./skybox.json")]
        output: PathBuf,

        /// Master seed for the starter layers.
        #[arg(short, long, default_value = "42")]
        seed: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CliFormat {
    /// 6 PNG files.
    Png,
    /// 6 JPG files.
    Jpg,
    /// 6 TGA files.
    Tga,
    /// 6 EXR files (HDR).
    Exr,
    /// Single DDS cube map.
    Dds,
}

impl From<CliFormat> for ExportFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::Png => ExportFormat::Png,
            CliFormat::Jpg => ExportFormat::Jpg,
            CliFormat::Tga => ExportFormat::Tga,
            CliFormat::Exr => ExportFormat::Exr,
            CliFormat::Dds => ExportFormat::Dds,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliOrientation {
    Default,
    Unreal,
    Unity,
    Source,
}

impl From<CliOrientation> for ExportConvention {
    fn from(value: CliOrientation) -> Self {
        match value {
            CliOrientation::Default => ExportConvention::Default,
            CliOrientation::Unreal => ExportConvention::Unreal,
            CliOrientation::Unity => ExportConvention::Unity,
            CliOrientation::Source => ExportConvention::Source,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            config,
            output,
            name,
            size,
            format,
            orientation,
            hdr,
        } => run_export(config, output, name, size, format, orientation, hdr),
        Commands::Info { config } => run_info(config),
        Commands::Init { output, seed } => run_init(output, seed),
    }
}

fn run_export(
    config: PathBuf,
    output: PathBuf,
    name: String,
    size: u32,
    format: CliFormat,
    orientation: CliOrientation,
    hdr: bool,
) {
    if !(16..=8192).contains(&size) || !size.is_power_of_two() {
        eprintln!("Error: Size must be a power of two between 16 and 8192");
        std::process::exit(1);
    }

    let mut skybox = match load_skybox(&config) {
        Ok(skybox) => skybox,
        Err(e) => {
            eprintln!("Error: Failed to load {}: {}", config.display(), e);
            std::process::exit(1);
        }
    };

    // EXR is the HDR output; selecting it implies HDR rendering.
    let hdr = hdr || matches!(format, CliFormat::Exr);
    skybox.hdr = hdr;

    println!("Starbox - Procedural Space Skybox Generator");
    println!("===========================================");
    println!("Config: {}", config.display());
    println!("Layers: {} ({} visible)", skybox.layers().len(), visible_count(&skybox));
    println!("Size: {}x{} per face", size, size);
    println!("HDR: {}", if hdr { "enabled" } else { "disabled" });
    println!("Output: {}", output.display());

    let options = ExportOptions {
        resolution: size,
        format: format.into(),
        convention: orientation.into(),
    };

    println!("\nRendering...");
    let start = Instant::now();
    let mut ctx = RenderContext::new();
    let mut last_decile = 0u32;
    let result = export_skybox(
        &skybox,
        &mut ctx,
        &output,
        &name,
        &options,
        Some(&mut |pct: f32| {
            let decile = (pct / 10.0) as u32;
            if decile > last_decile {
                last_decile = decile;
                println!("  {}%", decile * 10);
            }
        }),
    );

    match result {
        Ok(()) => {
            println!("\nExported in {:.2?}", start.elapsed());
        }
        Err(e) => {
            eprintln!("Error: Export failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_info(config: PathBuf) {
    let skybox = match load_skybox(&config) {
        Ok(skybox) => skybox,
        Err(e) => {
            eprintln!("Error: Failed to load {}: {}", config.display(), e);
            std::process::exit(1);
        }
    };

    println!("Skybox: {}", config.display());
    println!("Layers: {} ({} visible)", skybox.layers().len(), visible_count(&skybox));
    println!();
    println!("{:<4} {:<12} {:<24} {:<8} {}", "z", "kind", "name", "visible", "seed");
    for (z, layer) in skybox.layers().iter().enumerate() {
        println!(
            "{:<4} {:<12} {:<24} {:<8} {}",
            z,
            layer.kind().name(),
            layer.name,
            layer.visible,
            layer.seed
        );
    }
}

fn run_init(output: PathBuf, seed: u32) {
    let mut skybox = Skybox::new();

    let stars = skybox.add_layer(LayerKind::Points);
    {
        let layer = skybox.layer_mut(stars).unwrap();
        layer.name = "background stars".into();
        layer.seed = seed;
        let LayerParams::Points(p) = &mut layer.params else {
            unreachable!()
        };
        p.num_points = 4000;
    }

    let nebula = skybox.add_layer(LayerKind::Noise);
    {
        let layer = skybox.layer_mut(nebula).unwrap();
        layer.name = "nebula".into();
        layer.seed = seed.wrapping_add(1);
        let LayerParams::Noise(sheet) = &mut layer.params else {
            unreachable!()
        };
        sheet.noise.octaves = 6;
        sheet.noise.mode = NoiseMode::Ridged;
        sheet.noise.scale = 2.0;
        sheet.noise.power = 2.0;
        sheet.noise.inner_color = Rgba::new(0.55, 0.3, 0.8, 1.0);
        sheet.noise.outer_color = Rgba::new(0.0, 0.0, 0.05, 1.0);
    }

    match save_skybox(&skybox, &output) {
        Ok(()) => println!("Wrote starter configuration to {}", output.display()),
        Err(e) => {
            eprintln!("Error: Failed to write {}: {}", output.display(), e);
            std::process::exit(1);
        }
    }
}

fn visible_count(skybox: &Skybox) -> usize {
    skybox.layers().iter().filter(|l| l.visible).count()
}
