//! Command line interface for bezy-pencil
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs. Many CLI options are documented with
//! examples to help users understand the expected format.

use crate::core::config_file::ConfigFile;
use crate::core::errors::PencilError;
use crate::core::settings::PencilSettings;
use clap::{Parser, Subcommand};
use kurbo::Point;
use std::path::PathBuf;
use tracing::debug;

/// bezy-pencil CLI arguments
///
/// Examples:
///   bezy-pencil --edit MyFont.ufo --glyph a simplify             # Simplify every contour of "a"
///   bezy-pencil --edit MyFont.ufo --glyph a simplify --contour 2 # Simplify one contour
///   bezy-pencil --edit MyFont.ufo --glyph a redraw               # Splice the last contour in
///   bezy-pencil --edit MyFont.ufo --glyph o close                # Close the last contour
///   bezy-pencil --edit MyFont.ufo --glyph o locate --start 10,5 --end 90,5
///   bezy-pencil settings                                         # Print effective settings
///   bezy-pencil --new-config                                     # Create ~/.config/bezy-pencil
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "bezy-pencil",
    version,
    about = "Pencil path editing for UFO glyphs",
    long_about = "bezy-pencil applies the Bezy pencil operations to glyphs in UFO sources: simplifying drawn contours, splicing a redrawn contour into the outline it was drawn over, and closing strokes with corrected path directions."
)]
pub struct CliArgs {
    /// Path to the UFO source to edit
    #[clap(
        long = "edit",
        short = 'e',
        help = "UFO source to edit",
        long_help = "Path to a UFO version 3 directory. Required by every command that touches a glyph."
    )]
    pub font_source: Option<PathBuf>,

    /// Glyph to work on
    #[clap(long = "glyph", short = 'g', help = "Name of the glyph to edit")]
    pub glyph: Option<String>,

    /// Font layer to read and write; the default layer when omitted
    #[clap(long = "layer", help = "Font layer to edit (default layer if omitted)")]
    pub layer: Option<String>,

    /// Where to write the edited UFO
    #[clap(
        long = "output",
        short = 'o',
        help = "Write the edited UFO here instead of in place"
    )]
    pub output: Option<PathBuf>,

    /// Settings file to use instead of the user config file
    #[clap(
        long = "config",
        help = "Settings JSON file",
        long_help = "Settings JSON file to use instead of ~/.config/bezy-pencil/settings.json. Missing fields take their default values."
    )]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[clap(long = "verbose", short = 'v', help = "Enable debug logging")]
    pub verbose: bool,

    /// Also write logs to ~/.config/bezy-pencil/logs/
    #[clap(long = "log-file", help = "Write logs to a dated file in the config directory")]
    pub log_file: bool,

    /// Initialize user configuration directory with default settings
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with default settings",
        long_help = "Initialize the ~/.config/bezy-pencil directory with a settings.json file holding every default value and a logs/ directory."
    )]
    pub new_config: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// Operations on one glyph
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the simplify pass on the glyph's contours
    Simplify {
        /// Only simplify the contour at this index
        #[clap(long = "contour")]
        contour: Option<usize>,
    },
    /// Splice the glyph's last contour into the closest other contour
    Redraw {
        /// Keep the drawn junctions as they are and make them corners
        #[clap(long = "no-adjust")]
        no_adjust: bool,
    },
    /// Close the glyph's last contour
    Close {
        /// Leave path directions alone
        #[clap(long = "no-correct-direction")]
        no_correct_direction: bool,
    },
    /// Print the area a stroke between two points would replace
    Locate {
        /// Stroke start as X,Y
        #[clap(long = "start", value_parser = parse_point)]
        start: Point,
        /// Stroke end as X,Y
        #[clap(long = "end", value_parser = parse_point)]
        end: Point,
    },
    /// Print the effective settings as JSON
    Settings,
}

impl Command {
    /// Whether the command reads a glyph from a UFO
    pub fn needs_glyph(&self) -> bool {
        !matches!(self, Command::Settings)
    }
}

/// Parse a point written as `X,Y`
pub fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("Expected a point as X,Y, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("Invalid coordinate '{}': {e}", s.trim()))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that all paths exist and are valid before anything is
    /// loaded, providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.font_source {
            if !path.exists() {
                return Err(format!(
                    "Font source does not exist: {}\nMake sure the path is correct and the file exists.",
                    path.display()
                ));
            }
            if !path.is_dir() {
                return Err(format!(
                    "Not a UFO directory: {}\nOnly UFO sources are supported.",
                    path.display()
                ));
            }
            let meta_info = path.join("metainfo.plist");
            if !meta_info.exists() {
                return Err(format!(
                    "Not a valid UFO directory: missing metainfo.plist in {}\nMake sure this is a valid UFO directory.",
                    path.display()
                ));
            }
        }

        if let Some(config) = &self.config {
            if !config.is_file() {
                return Err(format!("Settings file does not exist: {}", config.display()));
            }
        }

        if let Some(command) = &self.command {
            if command.needs_glyph() {
                if self.font_source.is_none() {
                    return Err("This command needs a UFO source: pass --edit <UFO>".to_string());
                }
                if self.glyph.is_none() {
                    return Err("This command needs a glyph: pass --glyph <name>".to_string());
                }
            }
        }

        Ok(())
    }

    /// Get the effective settings from the CLI, a config file, or defaults
    ///
    /// Priority order:
    /// 1. CLI flags (--no-adjust, --no-correct-direction)
    /// 2. Explicit settings file (--config)
    /// 3. User config file (~/.config/bezy-pencil/settings.json)
    /// 4. Built-in defaults
    pub fn effective_settings(&self) -> Result<PencilSettings, PencilError> {
        let mut settings = match &self.config {
            Some(path) => {
                debug!("Using settings from {:?}", path);
                ConfigFile::load_from(path)?.pencil
            }
            None => match ConfigFile::load() {
                Some(config) => {
                    debug!("Using settings from the user config file");
                    config.pencil
                }
                None => {
                    debug!("Using default settings");
                    PencilSettings::default()
                }
            },
        };

        match &self.command {
            Some(Command::Redraw { no_adjust: true }) => settings.connection.adjust = false,
            Some(Command::Close {
                no_correct_direction: true,
            }) => settings.correct_path_direction = false,
            _ => {}
        }
        Ok(settings)
    }
}
