//! Configuration management for rplot.
//!
//! Style settings that a plotting toolkit would normally keep as process-wide
//! state live in an explicit [`StyleConfig`] that is handed to the renderer.
//! The configuration is layered with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RplotError};

/// Command-line arguments for rplot
#[derive(Parser, Debug)]
#[command(name = "rplot")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, env = "RPLOT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RPLOT_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a map stored in a .npy or .json file
    Render(RenderArgs),
    /// Render one of the built-in examples on a synthetic Gaussian field
    Demo(DemoArgs),
}

#[derive(ClapArgs, Debug)]
pub struct RenderArgs {
    /// Map array (.npy or .json)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Mask array used for contours (defaults to the map)
    #[arg(short, long)]
    pub mask: Option<PathBuf>,

    /// Display parameters as a JSON document
    #[arg(long)]
    pub display: Option<PathBuf>,

    /// Colormap name
    #[arg(long)]
    pub colormap: Option<String>,

    /// Output resolution in dots per inch
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Output directory, prepended verbatim to the file name
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Output file name; the extension selects the encoder
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Clip bounds "lo,hi" (0,0 disables clipping)
    #[arg(long, value_parser = parse_numbers::<2>, allow_hyphen_values = true)]
    pub clip: Option<[f64; 2]>,

    /// Spatial extent "xmin,xmax,ymin,ymax"
    #[arg(long, value_parser = parse_numbers::<4>, allow_hyphen_values = true)]
    pub extent: Option<[f64; 4]>,

    /// Title text
    #[arg(long)]
    pub title: Option<String>,

    /// Overlay contours of the mask
    #[arg(long)]
    pub contour: bool,

    /// Contour levels "a,b,..."
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub levels: Option<Vec<f64>>,
}

/// Parse exactly `N` comma-separated numbers.
fn parse_numbers<const N: usize>(s: &str) -> std::result::Result<[f64; N], String> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number {:?}: {}", v, e))
        })
        .collect::<std::result::Result<Vec<f64>, String>>()?;
    let count = values.len();
    values
        .try_into()
        .map_err(|_| format!("expected {} comma-separated values, got {}", N, count))
}

#[derive(ClapArgs, Debug)]
pub struct DemoArgs {
    /// Example number
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=7))]
    pub example: u8,

    /// Half size n of the (2n+1) x (2n+1) field
    #[arg(long, default_value = "500")]
    pub half_size: usize,

    /// Standard deviation of the noise added to noisy examples (before scaling)
    #[arg(long, default_value = "1.0")]
    pub noise: f64,

    /// Seed for the noise generator
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Output directory, prepended verbatim to the file name
    #[arg(long, default_value = "./")]
    pub output_dir: String,

    /// Output file name
    #[arg(short, long, default_value = "test.jpg")]
    pub output_file: String,

    /// Also write the generated map to this .npy or .json file
    #[arg(long)]
    pub save_field: Option<PathBuf>,
}

/// Subplot placement as fractions of the figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default = "default_top")]
    pub top: f64,
    #[serde(default = "default_bottom")]
    pub bottom: f64,
    #[serde(default = "default_left")]
    pub left: f64,
    #[serde(default = "default_right")]
    pub right: f64,
    /// Horizontal spacing between subplots
    #[serde(default = "default_spacing")]
    pub wspace: f64,
    /// Vertical spacing between subplots
    #[serde(default = "default_spacing")]
    pub hspace: f64,
}

/// Tick mark geometry for one axis, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickStyle {
    pub major_length: f64,
    pub minor_length: f64,
    pub width: f64,
    /// Gap between tick marks and their labels
    pub pad: f64,
}

/// Fonts, ticks and layout applied to every rendered map.
///
/// Sizes are in points and scale with the output resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Figure width and height in inches
    pub figure_size: [f64; 2],
    pub margins: Margins,
    pub font_family: String,
    /// Axis tick labels
    pub tick_label_size: f64,
    /// Colorbar tick labels
    pub colorbar_label_size: f64,
    /// Axis unit labels
    pub axis_label_size: f64,
    pub title_size: f64,
    pub annotation_size: f64,
    pub x_ticks: TickStyle,
    pub y_ticks: TickStyle,
    pub axis_line_width: f64,
    /// Colorbar width as a fraction of the map width
    pub colorbar_fraction: f64,
    /// Gap between map and colorbar, in inches
    pub colorbar_pad: f64,
    /// Maximum number of intervals between colorbar ticks
    pub colorbar_bins: usize,
    pub contour_line_width: f64,
    /// Dash on/off lengths in units of the contour line width
    pub dash_pattern: [f64; 2],
    pub grid_alpha: f64,
    pub grid_line_width: f64,
    /// Annotation anchor in axes fractions
    pub annotation_position: [f64; 2],
    pub annotation_box_alpha: f64,
    pub annotation_box_pad: f64,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rendering style
    #[serde(default)]
    pub style: StyleConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Parse the command line and load configuration from all sources
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Resolve configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.style = other.style;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(RplotError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        self.style.validate()
    }
}

impl StyleConfig {
    /// Validate the style settings
    pub fn validate(&self) -> Result<()> {
        let [width, height] = self.figure_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(RplotError::Config {
                message: format!("Figure size must be positive, got {}x{}", width, height),
            });
        }

        let m = &self.margins;
        let ordered = |lo: f64, hi: f64| (0.0..=1.0).contains(&lo) && (0.0..=1.0).contains(&hi) && lo < hi;
        if !ordered(m.left, m.right) || !ordered(m.bottom, m.top) {
            return Err(RplotError::Config {
                message: format!(
                    "Margins must satisfy 0 <= left < right <= 1 and 0 <= bottom < top <= 1, got {:?}",
                    m
                ),
            });
        }

        let sizes = [
            ("tick_label_size", self.tick_label_size),
            ("colorbar_label_size", self.colorbar_label_size),
            ("axis_label_size", self.axis_label_size),
            ("title_size", self.title_size),
            ("annotation_size", self.annotation_size),
            ("colorbar_fraction", self.colorbar_fraction),
            ("contour_line_width", self.contour_line_width),
        ];
        if let Some((name, value)) = sizes.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(RplotError::Config {
                message: format!("{} must be positive, got {}", name, value),
            });
        }

        if self.colorbar_bins == 0 {
            return Err(RplotError::Config {
                message: "colorbar_bins must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            figure_size: [6.4, 4.8],
            margins: Margins::default(),
            font_family: "sans-serif".to_string(),
            tick_label_size: 20.0,
            colorbar_label_size: 16.0,
            axis_label_size: 18.0,
            title_size: 18.0,
            annotation_size: 22.0,
            x_ticks: TickStyle {
                major_length: 10.0,
                minor_length: 5.0,
                width: 1.5,
                pad: 8.0,
            },
            y_ticks: TickStyle {
                major_length: 10.0,
                minor_length: 4.0,
                width: 1.5,
                pad: 8.0,
            },
            axis_line_width: 1.0,
            colorbar_fraction: 0.05,
            colorbar_pad: 0.1,
            colorbar_bins: 5,
            contour_line_width: 0.5,
            dash_pattern: [3.7, 1.6],
            grid_alpha: 0.2,
            grid_line_width: 1.0,
            annotation_position: [0.1, 0.1],
            annotation_box_alpha: 0.5,
            annotation_box_pad: 10.0,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: default_top(),
            bottom: default_bottom(),
            left: default_left(),
            right: default_right(),
            wspace: default_spacing(),
            hspace: default_spacing(),
        }
    }
}

// Default value functions for serde
fn default_top() -> f64 {
    0.9
}

fn default_bottom() -> f64 {
    0.15
}

fn default_left() -> f64 {
    0.15
}

fn default_right() -> f64 {
    0.9
}

fn default_spacing() -> f64 {
    0.5
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.style.figure_size, [6.4, 4.8]);
        assert_eq!(config.style.margins.top, 0.9);
        assert_eq!(config.style.margins.left, 0.15);
        assert_eq!(config.style.tick_label_size, 20.0);
        assert_eq!(config.style.colorbar_bins, 5);
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.style.title_size = 30.0;
        config2.log_level = "debug".to_string();

        config1.merge(config2);

        assert_eq!(config1.style.title_size, 30.0);
        assert_eq!(config1.log_level, "debug");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"style": {"title_size": 12.0, "margins": {"left": 0.2}}}"#)
                .unwrap();
        assert_eq!(config.style.title_size, 12.0);
        assert_eq!(config.style.margins.left, 0.2);
        assert_eq!(config.style.margins.right, 0.9);
        assert_eq!(config.style.tick_label_size, 20.0);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        let config = Config::default();
        assert!(config.validate().is_ok());

        // Test invalid log level
        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        // Test invalid figure size
        let mut config = Config::default();
        config.style.figure_size = [0.0, 4.8];
        assert!(config.validate().is_err());

        // Test inverted margins
        let mut config = Config::default();
        config.style.margins.left = 0.95;
        assert!(config.validate().is_err());

        // Test non-positive font size
        let mut config = Config::default();
        config.style.title_size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_args_layers_file_and_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_level": "warn", "style": {{"title_size": 9.0}}}}"#).unwrap();

        let args = Args::try_parse_from([
            "rplot",
            "--config",
            file.path().to_str().unwrap(),
            "demo",
            "--example",
            "4",
        ])
        .unwrap();
        let (config, command) = Config::from_args(args).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.style.title_size, 9.0);
        assert!(matches!(command, Command::Demo(DemoArgs { example: 4, .. })));

        let args = Args::try_parse_from([
            "rplot",
            "--config",
            file.path().to_str().unwrap(),
            "--log-level",
            "debug",
            "demo",
        ])
        .unwrap();
        let (config, _) = Config::from_args(args).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_render_args_lists() {
        let args = Args::try_parse_from([
            "rplot",
            "render",
            "--data",
            "map.npy",
            "--clip",
            "-1,0.8",
            "--extent",
            "-5,5,0,10",
            "--levels",
            "-0.1,0.6",
            "--contour",
        ])
        .unwrap();
        match args.command {
            Command::Render(render) => {
                assert_eq!(render.clip, Some([-1.0, 0.8]));
                assert_eq!(render.extent, Some([-5.0, 5.0, 0.0, 10.0]));
                assert_eq!(render.levels, Some(vec![-0.1, 0.6]));
                assert!(render.contour);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_render_args_reject_wrong_counts() {
        for (flag, value) in [("--clip", "0.8"), ("--clip", "0,0.5,1"), ("--extent", "0,10,0")] {
            let result = Args::try_parse_from(["rplot", "render", "--data", "map.npy", flag, value]);
            assert!(result.is_err(), "{} {} should be rejected", flag, value);
        }
        assert!(Args::try_parse_from(["rplot", "render", "--data", "m.npy", "--clip", "a,b"]).is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers::<2>("0, 0.8"), Ok([0.0, 0.8]));
        assert!(parse_numbers::<2>("1").unwrap_err().contains("expected 2"));
        assert!(parse_numbers::<4>("1,2,x,4").unwrap_err().contains("invalid number"));
    }
}
