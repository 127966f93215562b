//! rplot - one-call rendering of 2D scientific maps
//!
//! This is the command-line entry point for the rplot library.

use anyhow::Context;
use std::time::Instant;
use tracing::{error, info};

use rplot::config::{Command, DemoArgs, RenderArgs};
use rplot::data_loader::{load_array, save_array};
use rplot::demo::{run_demo, DemoOptions};
use rplot::field::Extent;
use rplot::{
    init_tracing, log_operation_end, log_operation_start, render_map, Config, DisplayConfig,
    StyleConfig,
};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let (config, command) = Config::load().context("Failed to load configuration")?;

    // Validate configuration
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.log_level);
    info!("Starting rplot v{}", env!("CARGO_PKG_VERSION"));

    let result = match command {
        Command::Render(args) => render(args, &config.style),
        Command::Demo(args) => demo(args, &config.style),
    };
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

fn render(args: RenderArgs, style: &StyleConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    log_operation_start("render", Some(&args.data.display().to_string()));

    let mut map = load_array(&args.data)
        .with_context(|| format!("Failed to load map from {}", args.data.display()))?;
    let mask = match &args.mask {
        Some(path) => load_array(path)
            .with_context(|| format!("Failed to load mask from {}", path.display()))?,
        None => map.clone(),
    };

    let mut display = match &args.display {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<DisplayConfig>(&content)
                .with_context(|| format!("Invalid display parameters in {}", path.display()))?
        }
        None => {
            let (rows, cols) = map.dim();
            DisplayConfig::for_shape(rows, cols)
        }
    };
    apply_overrides(&mut display, args);

    let result = render_map(&mut map, &display, mask.view(), style);
    log_operation_end("render", start, result.is_ok());
    result?;
    Ok(())
}

/// Command-line flags take precedence over the display JSON
fn apply_overrides(display: &mut DisplayConfig, args: RenderArgs) {
    if let Some(colormap) = args.colormap {
        display.colormap = colormap;
    }
    if let Some(dpi) = args.dpi {
        display.dpi = dpi;
    }
    if let Some(dir) = args.output_dir {
        display.output_dir = dir;
    }
    if let Some(file) = args.output_file {
        display.output_file = file;
    }
    if let Some([lo, hi]) = args.clip {
        display.clip_lower = lo;
        display.clip_upper = hi;
    }
    if let Some([xmin, xmax, ymin, ymax]) = args.extent {
        display.extent = Extent::new(xmin, xmax, ymin, ymax);
    }
    if let Some(title) = args.title {
        display.title = title;
    }
    if args.contour {
        display.contour = 1.0;
    }
    if let Some(levels) = args.levels {
        display.levels = levels;
    }
}

fn demo(args: DemoArgs, style: &StyleConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    log_operation_start("demo", Some(&format!("example {}", args.example)));

    let options = DemoOptions {
        half_size: args.half_size,
        noise_std: args.noise,
        seed: args.seed,
        output_dir: args.output_dir,
        output_file: args.output_file,
    };
    let result = run_demo(args.example, &options, style);
    log_operation_end("demo", start, result.is_ok());
    let (_, map) = result?;

    if let Some(path) = &args.save_field {
        save_array(path, map.view())
            .with_context(|| format!("Failed to save field to {}", path.display()))?;
        info!(path = %path.display(), "Saved rendered field");
    }
    Ok(())
}
