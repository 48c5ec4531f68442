//! Application runner logic
//!
//! Loads the glyph named on the command line, applies one pencil operation
//! and writes the result back to the UFO.

use crate::core::cli::{CliArgs, Command};
use crate::core::config_file::ConfigFile;
use crate::core::errors::PencilError;
use crate::core::settings::PencilSettings;
use crate::data::ufo::{load_glyph_layer, load_ufo_from_path, save_ufo_to_path, store_glyph_layer};
use crate::data::Layer;
use crate::editing::{area_outline, finish_stroke, locate_closest_area, simplify_layer, StrokeModifiers};
use anyhow::{anyhow, bail, Context, Result};
use kurbo::Point;
use tracing::info;

/// Run one command. Returns once the edited UFO, if any, is saved.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    cli_args.validate().map_err(|message| anyhow!(message))?;

    if cli_args.new_config {
        ConfigFile::initialize_config_directory()?;
        if cli_args.command.is_none() {
            return Ok(());
        }
    }

    let Some(command) = cli_args.command.clone() else {
        bail!("No command given");
    };
    let settings = cli_args.effective_settings()?;

    match command {
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Command::Locate { start, end } => {
            let (_, layer) = load_glyph(&cli_args)?;
            print_closest_area(&layer, start, end, &settings);
            Ok(())
        }
        Command::Simplify { .. } | Command::Redraw { .. } | Command::Close { .. } => {
            edit_glyph(&cli_args, &command, &settings)
        }
    }
}

fn glyph_name(cli_args: &CliArgs) -> Result<&str> {
    cli_args.glyph.as_deref().context("No glyph given")
}

fn load_glyph(cli_args: &CliArgs) -> Result<(norad::Font, Layer)> {
    let source = cli_args.font_source.as_ref().context("No UFO source given")?;
    let font = load_ufo_from_path(source).with_context(|| format!("Could not load {}", source.display()))?;
    let layer = load_glyph_layer(&font, cli_args.layer.as_deref(), glyph_name(cli_args)?)?;
    Ok((font, layer))
}

fn edit_glyph(cli_args: &CliArgs, command: &Command, settings: &PencilSettings) -> Result<()> {
    let (mut font, mut layer) = load_glyph(cli_args)?;
    let glyph = glyph_name(cli_args)?;

    match command {
        Command::Simplify { contour } => {
            let selection = match contour {
                Some(index) => {
                    let ids = layer.path_ids();
                    let id = ids.get(*index).copied().ok_or(PencilError::ContourOutOfRange {
                        index: *index,
                        count: ids.len(),
                    })?;
                    Some(vec![id])
                }
                None => None,
            };
            let report = simplify_layer(&mut layer, &settings.simplify, selection.as_deref());
            println!(
                "Simplified '{}': {} ripple runs, {} tight nodes removed, {} handles repaired, {} inflections fixed",
                glyph, report.ripple_runs, report.tight_nodes_removed, report.handles_repaired, report.inflections_fixed
            );
        }
        Command::Redraw { .. } | Command::Close { .. } => {
            let modifiers = StrokeModifiers {
                redraw: matches!(command, Command::Redraw { .. }),
                close: matches!(command, Command::Close { .. }),
            };
            let report = finish_stroke(&mut layer, settings, modifiers);
            if let Some(error) = report.errors.first() {
                bail!("Could not finish the last contour of '{}': {}", glyph, error);
            }
            if report.path.is_none() {
                bail!("Glyph '{}' has no contours", glyph);
            }
            if let Some(redraw) = report.redraw {
                println!(
                    "Redrew '{}': replaced {} nodes with {}",
                    glyph, redraw.replaced_nodes, redraw.inserted_nodes
                );
            } else if modifiers.redraw {
                println!("No contour of '{}' is close enough to redraw; left unchanged", glyph);
                return Ok(());
            }
            if report.closed {
                println!(
                    "Closed the last contour of '{}' ({} directions corrected)",
                    glyph, report.directions_corrected
                );
            }
        }
        Command::Locate { .. } | Command::Settings => return Ok(()),
    }

    store_glyph_layer(&mut font, cli_args.layer.as_deref(), glyph, &layer)?;
    let destination = cli_args
        .output
        .as_ref()
        .or(cli_args.font_source.as_ref())
        .context("No UFO destination")?;
    save_ufo_to_path(&font, destination).with_context(|| format!("Could not save {}", destination.display()))?;
    info!("Saved {}", destination.display());
    Ok(())
}

fn print_closest_area(layer: &Layer, start: Point, end: Point, settings: &PencilSettings) {
    let Some(area) = locate_closest_area(layer, None, start, end, &settings.locate) else {
        println!("No contour found");
        return;
    };
    let contour = layer.path_ids().iter().position(|&id| id == area.path);
    let Some(path) = layer.path(area.path) else {
        println!("No contour found");
        return;
    };
    if let Some(contour) = contour {
        println!("Contour: {}", contour);
    }
    println!("Nodes: {:?}", area.indices);
    if area.open_wraparound {
        println!("Closes the contour: yes");
    }
    println!("Outline: {}", area_outline(path, &area).to_svg());
}
