//! Image elements: data URI parsing, decoding, cropping and XObject embedding.

use crate::error::ElementError;
use crate::writer::StreamingPdfWriter;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use docket_document::ImageElement;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat};
use lopdf::{Dictionary, Object, Stream, dictionary};
use std::io::{self, Seek, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
}

impl ImageMime {
    fn format(self) -> ImageFormat {
        match self {
            ImageMime::Png => ImageFormat::Png,
            ImageMime::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Splits `data:<mime>;base64,<payload>` into its MIME type and payload.
pub fn parse_data_uri(src: &str) -> Result<(ImageMime, &str), ElementError> {
    let rest = src
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ElementError::MalformedDataUri("missing 'data:' scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ElementError::MalformedDataUri("missing ',' before payload".into()))?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(ElementError::MalformedDataUri("payload is not base64 encoded".into()));
    }
    let mime = match mime.as_str() {
        "image/png" => ImageMime::Png,
        "image/jpeg" | "image/jpg" => ImageMime::Jpeg,
        _ => return Err(ElementError::UnsupportedMime(mime)),
    };
    Ok((mime, payload))
}

#[derive(Debug)]
enum Samples {
    /// Original JPEG bytes, embedded with DCTDecode.
    Jpeg { data: Vec<u8>, color_space: &'static str },
    /// Uncompressed 8-bit samples plus an optional alpha plane.
    Raw { data: Vec<u8>, color_space: &'static str, alpha: Option<Vec<u8>> },
}

/// A decoded, cropped image ready to embed.
#[derive(Debug)]
pub struct PreparedImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub render_width: f32,
    pub render_height: f32,
    samples: Samples,
}

impl PreparedImage {
    pub fn prepare(element: &ImageElement) -> Result<Self, ElementError> {
        let (mime, payload) = parse_data_uri(&element.src)?;
        let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD.decode(payload.as_bytes())?;
        let decoded = image::load_from_memory_with_format(&bytes, mime.format())?;
        let (source_width, source_height) = (decoded.width(), decoded.height());

        let crop = match element.crop_within(source_width, source_height) {
            Some(rect) if rect.is_empty() => return Err(ElementError::EmptyCrop),
            Some(rect) => Some(pixel_window(rect.x, rect.y, rect.width, rect.height, source_width, source_height)?),
            None => None,
        }
        .filter(|&(x, y, w, h)| (x, y, w, h) != (0, 0, source_width, source_height));

        let (image, passthrough) = match crop {
            Some((x, y, w, h)) => {
                log::debug!("Cropping image '{}' to {}x{} at ({}, {})", element.common.id, w, h, x, y);
                (decoded.crop_imm(x, y, w, h), None)
            }
            None if mime == ImageMime::Jpeg => (decoded, Some(bytes)),
            None => (decoded, None),
        };

        let (pixel_width, pixel_height) = (image.width(), image.height());
        let (render_width, render_height) =
            element.render_size((pixel_width as f32, pixel_height as f32));
        let samples = match passthrough {
            Some(data) => match jpeg_components(&data).and_then(jpeg_color_space) {
                Some(color_space) => Samples::Jpeg { data, color_space },
                None => {
                    log::debug!("Re-encoding JPEG '{}': not a gray or RGB frame", element.common.id);
                    raw_samples(&image)
                }
            },
            None => raw_samples(&image),
        };

        Ok(Self { pixel_width, pixel_height, render_width, render_height, samples })
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self.samples, Samples::Jpeg { .. })
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self.samples, Samples::Raw { alpha: Some(_), .. })
    }

    /// Writes the image (and its soft mask, if any) and returns the XObject
    /// resource name to paint it with.
    pub fn embed<W: Write + Seek>(self, writer: &mut StreamingPdfWriter<W>) -> io::Result<String> {
        let (width, height) = (self.pixel_width as i64, self.pixel_height as i64);
        let base = |color_space: &str| -> Dictionary {
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "BitsPerComponent" => 8,
                "ColorSpace" => color_space,
            }
        };
        let stream = match self.samples {
            Samples::Jpeg { data, color_space } => {
                let mut dict = base(color_space);
                dict.set("Filter", "DCTDecode");
                Stream::new(dict, data)
            }
            Samples::Raw { data, color_space, alpha } => {
                let mut dict = base(color_space);
                dict.set("Filter", "FlateDecode");
                if let Some(alpha) = alpha {
                    let mut mask = base("DeviceGray");
                    mask.set("Filter", "FlateDecode");
                    let mask_id = writer.write_object(&Object::Stream(Stream::new(mask, deflate(&alpha)?)))?;
                    dict.set("SMask", mask_id);
                }
                Stream::new(dict, deflate(&data)?)
            }
        };
        writer.write_image(stream)
    }
}

/// Rounds a clamped crop rectangle outward to whole source pixels.
fn pixel_window(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    source_width: u32,
    source_height: u32,
) -> Result<(u32, u32, u32, u32), ElementError> {
    let left = (x.floor() as u32).min(source_width);
    let top = (y.floor() as u32).min(source_height);
    let right = ((x + width).ceil() as u32).min(source_width);
    let bottom = ((y + height).ceil() as u32).min(source_height);
    if right <= left || bottom <= top {
        return Err(ElementError::EmptyCrop);
    }
    Ok((left, top, right - left, bottom - top))
}

/// Component count of the first frame header (SOFn) of a JPEG stream. The
/// decoder converts CMYK and YCCK frames to RGB, so the decoded image cannot
/// tell whether the original DCT data is safe to embed as-is.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            0xFF => {
                pos += 1;
                continue;
            }
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length = u16::from_be_bytes([*data.get(pos + 2)?, *data.get(pos + 3)?]) as usize;
        if length < 2 {
            return None;
        }
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            // length(2) precision(1) height(2) width(2) components(1)
            return data.get(pos + 9).copied();
        }
        pos += 2 + length;
    }
    None
}

fn jpeg_color_space(components: u8) -> Option<&'static str> {
    match components {
        1 => Some("DeviceGray"),
        3 => Some("DeviceRGB"),
        _ => None,
    }
}

fn raw_samples(image: &DynamicImage) -> Samples {
    let color = image.color();
    if color.has_alpha() {
        let rgba = image.to_rgba8();
        let mut data = Vec::with_capacity(rgba.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(rgba.len() / 4);
        for pixel in rgba.pixels() {
            data.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let alpha = alpha.iter().any(|&a| a != u8::MAX).then_some(alpha);
        Samples::Raw { data, color_space: "DeviceRGB", alpha }
    } else if color.has_color() {
        Samples::Raw { data: image.to_rgb8().into_raw(), color_space: "DeviceRGB", alpha: None }
    } else {
        Samples::Raw { data: image.to_luma8().into_raw(), color_space: "DeviceGray", alpha: None }
    }
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
