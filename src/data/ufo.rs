//! UFO file I/O operations

use super::layer::Layer;
use crate::core::errors::PencilError;
use norad::Font;
use std::path::Path;
use tracing::debug;

/// Load a UFO font file from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font, PencilError> {
    let font = Font::load(path)?;
    Ok(font)
}

/// Write a UFO font file to disk
pub fn save_ufo_to_path(font: &Font, path: impl AsRef<Path>) -> Result<(), PencilError> {
    font.save(path)?;
    Ok(())
}

fn font_layer<'a>(font: &'a Font, layer_name: Option<&str>) -> Result<&'a norad::Layer, PencilError> {
    match layer_name {
        Some(name) => font
            .layers
            .get(name)
            .ok_or_else(|| PencilError::MissingLayer(name.to_string())),
        None => Ok(font.default_layer()),
    }
}

fn font_layer_mut<'a>(
    font: &'a mut Font,
    layer_name: Option<&str>,
) -> Result<&'a mut norad::Layer, PencilError> {
    match layer_name {
        Some(name) => font
            .layers
            .get_mut(name)
            .ok_or_else(|| PencilError::MissingLayer(name.to_string())),
        None => Ok(font.default_layer_mut()),
    }
}

/// Read one glyph's contours into an editable layer
pub fn load_glyph_layer(
    font: &Font,
    layer_name: Option<&str>,
    glyph_name: &str,
) -> Result<Layer, PencilError> {
    let glyph = font_layer(font, layer_name)?
        .get_glyph(glyph_name)
        .ok_or_else(|| PencilError::MissingGlyph(glyph_name.to_string()))?;
    debug!("Loaded glyph '{}' with {} contours", glyph_name, glyph.contours.len());
    Ok(Layer::from_norad_contours(&glyph.contours))
}

/// Replace one glyph's contours with the paths of `layer`.
///
/// Components, anchors and metrics of the glyph are left as they are.
pub fn store_glyph_layer(
    font: &mut Font,
    layer_name: Option<&str>,
    glyph_name: &str,
    layer: &Layer,
) -> Result<(), PencilError> {
    let glyph = font_layer_mut(font, layer_name)?
        .get_glyph_mut(glyph_name)
        .ok_or_else(|| PencilError::MissingGlyph(glyph_name.to_string()))?;
    glyph.contours = layer.to_norad_contours();
    debug!("Stored {} contours into glyph '{}'", glyph.contours.len(), glyph_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NodeData;

    #[test]
    fn test_glyph_round_trip_through_disk() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ufo_path = dir.path().join("Test.ufo");

        let mut font = Font::new();
        font.default_layer_mut().insert_glyph(norad::Glyph::new("a"));
        save_ufo_to_path(&font, &ufo_path).expect("Failed to save UFO");

        let mut font = load_ufo_from_path(&ufo_path).expect("Failed to load UFO");
        let mut layer = load_glyph_layer(&font, None, "a").expect("Glyph should exist");
        assert!(layer.is_empty());

        layer.add_path(
            true,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(100.0, 0.0),
                NodeData::line(100.0, 100.0),
            ],
        );
        store_glyph_layer(&mut font, None, "a", &layer).expect("Glyph should exist");
        save_ufo_to_path(&font, &ufo_path).expect("Failed to save UFO");

        let font = load_ufo_from_path(&ufo_path).expect("Failed to reload UFO");
        let reloaded = load_glyph_layer(&font, None, "a").expect("Glyph should exist");
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.paths()[0].len(), 3);
        assert!(reloaded.paths()[0].is_closed());
    }

    #[test]
    fn test_missing_glyph_and_layer() {
        let font = Font::new();
        assert!(matches!(
            load_glyph_layer(&font, None, "nope"),
            Err(PencilError::MissingGlyph(_))
        ));
        assert!(matches!(
            load_glyph_layer(&font, Some("background"), "a"),
            Err(PencilError::MissingLayer(_))
        ));
    }
}
