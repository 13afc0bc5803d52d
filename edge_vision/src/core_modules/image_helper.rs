// Thin raster I/O: decode any format `image` understands into a grayscale
// `PixelBuffer`, and encode a filter output back out. The file extension picks the
// encoder, so `.bmp` paths round-trip through BMP.

pub mod image_helper {
    use crate::core_modules::pixel_buffer::pixel_buffer::{Intensity, PixelBuffer};
    use crate::error::EdgeError;
    use image::GrayImage;
    use std::path::Path;

    /// Loads `path` as 8-bit luma, row-major, top row first.
    pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, EdgeError> {
        let luma = image::open(path)?.to_luma8();
        let (width, height) = luma.dimensions();
        let pixels = luma.into_raw().into_iter().map(Intensity::from).collect();
        PixelBuffer::new(width as usize, height as usize, pixels)
    }

    /// Writes `buffer` as 8-bit grayscale, clamping intensities to 0..=255.
    pub fn save_grayscale<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> Result<(), EdgeError> {
        let bytes = buffer.pixels.iter().map(|&v| v.clamp(0, 255) as u8).collect();
        let image = GrayImage::from_raw(buffer.width as u32, buffer.height as u32, bytes).ok_or(
            EdgeError::BufferSizeMismatch {
                expected: buffer.width * buffer.height,
                got: buffer.pixels.len(),
            },
        )?;
        image.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::image_helper::*;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("edge_vision_{}_{name}", std::process::id()))
    }

    #[test]
    fn bmp_keeps_gray_levels() {
        let width = 13;
        let height = 7;
        let pixels = (0..width * height).map(|i| ((i * 37) % 256) as i32).collect();
        let buffer = PixelBuffer::new(width, height, pixels).unwrap();
        let path = temp_path("levels.bmp");

        save_grayscale(&path, &buffer).expect("Error Saving File.");
        let loaded = load_grayscale(&path).expect("Error Loading File.");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, buffer);
    }

    #[test]
    fn save_clamps_out_of_range_values() {
        let buffer = PixelBuffer::new(2, 2, vec![-40, 0, 255, 900]).unwrap();
        let path = temp_path("clamped.png");

        save_grayscale(&path, &buffer).expect("Error Saving File.");
        let loaded = load_grayscale(&path).expect("Error Loading File.");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.pixels, vec![0, 0, 255, 255]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_grayscale(temp_path("does_not_exist.bmp")).is_err());
    }
}
