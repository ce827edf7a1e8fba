use std::{fs, fs::File, io::Read, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use streamconv_core::ImageSize;

use crate::{error::IoError, pixels::luma};

/// Read a PNG image as a single 8-bit channel.
///
/// Color images are converted to luma; alpha is dropped.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// The image size and its pixels in raster order.
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<(ImageSize, Vec<u8>), IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if let Some(extension) = file_path.extension() {
        if extension != "png" {
            return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
        }
    } else {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    decode_png_mono8(file)
}

/// Decode a PNG image from raw bytes as a single 8-bit channel.
///
/// # Arguments
///
/// * `bytes` - Raw bytes of the png file.
pub fn decode_image_png_mono8(bytes: &[u8]) -> Result<(ImageSize, Vec<u8>), IoError> {
    decode_png_mono8(bytes)
}

fn decode_png_mono8<R: Read>(source: R) -> Result<(ImageSize, Vec<u8>), IoError> {
    let mut decoder = Decoder::new(source);
    // palettes and low bit depths are expanded, 16-bit samples are cut to 8 bits
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    let (color_type, _) = reader.output_color_type();
    let pixels = match color_type {
        ColorType::Grayscale => buf,
        ColorType::GrayscaleAlpha => buf.chunks_exact(2).map(|p| p[0]).collect(),
        ColorType::Rgb => buf.chunks_exact(3).map(|p| luma(p[0], p[1], p[2])).collect(),
        ColorType::Rgba => buf.chunks_exact(4).map(|p| luma(p[0], p[1], p[2])).collect(),
        ColorType::Indexed => {
            return Err(IoError::PngDecodeError(
                "indexed color was not expanded".to_string(),
            ))
        }
    };

    if pixels.len() != size.num_pixels() {
        return Err(IoError::InvalidDataLength(pixels.len(), size.num_pixels()));
    }

    log::debug!("decoded {color_type:?} png of {size}");
    Ok((size, pixels))
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `size` - The size of the image.
/// - `pixels` - The pixels in raster order.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    size: ImageSize,
    pixels: &[u8],
) -> Result<(), IoError> {
    if pixels.len() != size.num_pixels() {
        return Err(IoError::InvalidDataLength(pixels.len(), size.num_pixels()));
    }

    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, size.width as u32, size.height as u32);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(pixels)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
