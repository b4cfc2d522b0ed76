//! PNG output.
//!
//! Rolls are written as 8-bit grayscale with a `pHYs` chunk so viewers and
//! printers reproduce the roll at true scale.

use std::path::Path;

use super::RollImage;
use crate::error::Result;

const METERS_PER_INCH: f64 = 0.0254;

/// PNG stores physical resolution in pixels per meter.
pub fn dpi_to_pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// Encode `image` as a grayscale PNG tagged with `dpi`.
pub fn encode_png(image: &RollImage, dpi: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let ppm = dpi_to_pixels_per_meter(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.pixels())?;
        writer.finish()?;
    }
    Ok(out)
}

/// Encode and write `image` to `path`.
pub fn write_png<P: AsRef<Path>>(image: &RollImage, dpi: u32, path: P) -> Result<()> {
    let data = encode_png(image, dpi)?;
    std::fs::write(path, data)?;
    Ok(())
}
