//! System graphic sheet loading
//!
//! The engine's system graphic is an indexed PNG. It's decoded without any
//! color transformation so the raw palette indices survive, which keeps
//! palette index 0 usable as the transparency key.

use super::indexed::{IndexedImage, Palette};
use super::Image;
use crate::error::GaugeError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A decoded system graphic: pixel indices plus the palette they refer to
#[derive(Debug, Clone)]
pub struct SystemSheet {
    pub image: IndexedImage,
    pub palette: Palette,
}

/// Loads the system graphic sheet from an indexed PNG file
///
/// # Example
///
/// ```rust
/// use dyngauge::gfx::{load_system_sheet, IndexedImage};
/// use dyngauge::TileAtlas;
/// use std::path::Path;
///
/// let mut atlas = TileAtlas::<IndexedImage>::new()?;
/// let sheet = load_system_sheet(Path::new("System/System2.png")).ok();
///
/// // Without a sheet the tiles just stay blank
/// atlas.ensure_initialized(sheet.as_ref().map(|sheet| &sheet.image));
/// assert!(atlas.is_initialized());
/// # Ok::<(), dyngauge::GaugeError>(())
/// ```
pub fn load_system_sheet(path: &Path) -> Result<SystemSheet, GaugeError> {
    let file = File::open(path).map_err(|source| GaugeError::SheetIo {
        path: path.to_path_buf(),
        source,
    })?;
    let sheet = decode_indexed_png(BufReader::new(file))?;

    log::info!(
        "Loaded system sheet {} ({}x{})",
        path.display(),
        sheet.image.width(),
        sheet.image.height()
    );
    Ok(sheet)
}

/// Decodes an indexed PNG stream, unpacking 1/2/4-bit rows to one byte per pixel
pub fn decode_indexed_png<R: Read>(reader: R) -> Result<SystemSheet, GaugeError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    if info.color_type != png::ColorType::Indexed {
        return Err(GaugeError::UnsupportedSheet(info.color_type));
    }

    let palette = reader
        .info()
        .palette
        .as_deref()
        .map(Palette::from_rgb)
        .unwrap_or_default();

    let bits = info.bit_depth as u8 as usize;
    let per_byte = 8 / bits;
    let mask = ((1u16 << bits) - 1) as u8;

    let mut pixels = Vec::with_capacity(info.width as usize * info.height as usize);
    for row in buf.chunks(info.line_size).take(info.height as usize) {
        for x in 0..info.width as usize {
            let byte = row[x / per_byte];
            let shift = 8 - bits * (x % per_byte + 1);
            pixels.push((byte >> shift) & mask);
        }
    }

    let image = IndexedImage::from_pixels(info.width, info.height, pixels).ok_or(
        GaugeError::ImageCreate {
            width: info.width,
            height: info.height,
        },
    )?;

    Ok(SystemSheet { image, palette })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdl2::pixels::Color;

    fn encode(color: png::ColorType, depth: png::BitDepth, data: &[u8], w: u32, h: u32) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, w, h);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if color == png::ColorType::Indexed {
                encoder.set_palette(vec![0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    #[test]
    fn test_decode_eight_bit_indices() {
        let png_data = encode(png::ColorType::Indexed, png::BitDepth::Eight, &[0, 1, 2, 1], 2, 2);

        let sheet = decode_indexed_png(png_data.as_slice()).unwrap();

        assert_eq!(sheet.image.width(), 2);
        assert_eq!(sheet.image.pixels(), &[0, 1, 2, 1]);
        assert_eq!(sheet.palette.color(1), Color::RGB(255, 0, 0));
    }

    #[test]
    fn test_decode_unpacks_four_bit_rows() {
        // 3 pixels per row at 4 bits: two bytes per row, last nibble is padding
        let png_data = encode(
            png::ColorType::Indexed,
            png::BitDepth::Four,
            &[0x12, 0x00, 0x21, 0x00],
            3,
            2,
        );

        let sheet = decode_indexed_png(png_data.as_slice()).unwrap();

        assert_eq!(sheet.image.pixels(), &[1, 2, 0, 2, 1, 0]);
    }

    #[test]
    fn test_rejects_truecolor_sheet() {
        let png_data = encode(png::ColorType::Rgb, png::BitDepth::Eight, &[0; 12], 2, 2);

        let result = decode_indexed_png(png_data.as_slice());

        assert!(matches!(result, Err(GaugeError::UnsupportedSheet(png::ColorType::Rgb))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_system_sheet(Path::new("does/not/exist/System2.png"));
        assert!(matches!(result, Err(GaugeError::SheetIo { .. })));
    }
}
