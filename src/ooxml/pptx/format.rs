//! Image formats and intrinsic image metrics for picture shapes.

use crate::common::unit::px_to_emu;
use crate::ooxml::error::{OoxmlError, Result};
use memchr::memmem;
use std::io::Cursor;

/// Image format types supported by PPTX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Get the file extension for this image format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Detect image format from bytes (magic number detection).
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF: 47 49 46 38 (GIF8)
        if bytes.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
            return Some(Self::Gif);
        }

        // BMP: 42 4D (BM)
        if bytes.starts_with(&[0x42, 0x4D]) {
            return Some(Self::Bmp);
        }

        // TIFF: 49 49 2A 00 (little-endian) or 4D 4D 00 2A (big-endian)
        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(Self::Tiff);
        }

        None
    }
}

/// Pixel size and resolution of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
    pub horz_dpi: u32,
    pub vert_dpi: u32,
}

impl ImageInfo {
    /// Probe `bytes`, using `fallback_dpi` when the file records no resolution.
    pub fn probe(bytes: &[u8], fallback_dpi: u32) -> Result<Self> {
        let format = ImageFormat::detect_from_bytes(bytes)
            .ok_or_else(|| OoxmlError::InvalidFormat("unrecognized image format".to_string()))?;

        let (width_px, height_px) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| OoxmlError::InvalidFormat(format!("image header: {}", e)))?;

        let density = match format {
            ImageFormat::Png => png_dpi(bytes),
            ImageFormat::Jpeg => jfif_dpi(bytes),
            _ => None,
        };
        let (horz_dpi, vert_dpi) = match density {
            Some((x, y)) if x > 0 && y > 0 => (x, y),
            _ => (fallback_dpi, fallback_dpi),
        };

        Ok(Self {
            format,
            width_px,
            height_px,
            horz_dpi,
            vert_dpi,
        })
    }

    /// Native width in EMU.
    #[inline]
    pub fn width_emu(&self) -> i64 {
        px_to_emu(self.width_px, self.horz_dpi)
    }

    /// Native height in EMU.
    #[inline]
    pub fn height_emu(&self) -> i64 {
        px_to_emu(self.height_px, self.vert_dpi)
    }

    /// Fill in whichever of `cx`/`cy` is missing, keeping the aspect ratio.
    pub fn scale(&self, cx: Option<i64>, cy: Option<i64>) -> (i64, i64) {
        let (native_cx, native_cy) = (self.width_emu(), self.height_emu());
        match (cx, cy) {
            (Some(cx), Some(cy)) => (cx, cy),
            (Some(cx), None) if native_cx > 0 => {
                (cx, (native_cy as f64 * cx as f64 / native_cx as f64).round() as i64)
            },
            (None, Some(cy)) if native_cy > 0 => {
                ((native_cx as f64 * cy as f64 / native_cy as f64).round() as i64, cy)
            },
            (cx, cy) => (cx.unwrap_or(native_cx), cy.unwrap_or(native_cy)),
        }
    }
}

fn be_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let slice = bytes.get(at..at + 4)?;
    Some(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let slice = bytes.get(at..at + 2)?;
    Some(u16::from_be_bytes([slice[0], slice[1]]))
}

/// Resolution from the PNG `pHYs` chunk, when given in pixels per meter.
fn png_dpi(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 8;
    while pos + 8 <= bytes.len() {
        let len = be_u32(bytes, pos)? as usize;
        let kind = bytes.get(pos + 4..pos + 8)?;
        match kind {
            b"pHYs" => {
                let data = pos + 8;
                let x = be_u32(bytes, data)?;
                let y = be_u32(bytes, data + 4)?;
                let unit = *bytes.get(data + 8)?;
                if unit != 1 {
                    return None;
                }
                let to_dpi = |ppm: u32| (ppm as f64 * 0.0254).round() as u32;
                return Some((to_dpi(x), to_dpi(y)));
            },
            b"IDAT" | b"IEND" => return None,
            _ => pos += 12 + len,
        }
    }
    None
}

/// Resolution from a JFIF APP0 segment.
fn jfif_dpi(bytes: &[u8]) -> Option<(u32, u32)> {
    let header = &bytes[..bytes.len().min(64)];
    let at = memmem::find(header, b"JFIF\0")?;
    // identifier(5) version(2) units(1) Xdensity(2) Ydensity(2)
    let units = *bytes.get(at + 7)?;
    let x = be_u16(bytes, at + 8)? as u32;
    let y = be_u16(bytes, at + 10)? as u32;
    match units {
        1 => Some((x, y)),
        2 => Some((
            (x as f64 * 2.54).round() as u32,
            (y as f64 * 2.54).round() as u32,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(ImageFormat::detect_from_bytes(&png(1, 1)), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect_from_bytes(b"xx"), None);
    }

    #[test]
    fn test_probe_png_defaults_to_fallback_dpi() {
        let info = ImageInfo::probe(&png(144, 72), 72).unwrap();
        assert_eq!((info.width_px, info.height_px), (144, 72));
        assert_eq!(info.horz_dpi, 72);
        assert_eq!(info.width_emu(), 2 * 914_400);
        assert_eq!(info.height_emu(), 914_400);
    }

    #[test]
    fn test_scale_keeps_aspect() {
        let info = ImageInfo::probe(&png(200, 100), 72).unwrap();
        assert_eq!(info.scale(Some(1000), None), (1000, 500));
        assert_eq!(info.scale(None, Some(1000)), (2000, 1000));
        assert_eq!(info.scale(Some(7), Some(9)), (7, 9));
    }

    #[test]
    fn test_png_phys_chunk() {
        let mut bytes = png(10, 10);
        // Splice a pHYs chunk (3780 px/m ~ 96 dpi) right after IHDR.
        let ihdr_end = 8 + 12 + 13;
        let mut chunk = Vec::new();
        chunk.extend_from_slice(&9u32.to_be_bytes());
        chunk.extend_from_slice(b"pHYs");
        chunk.extend_from_slice(&3780u32.to_be_bytes());
        chunk.extend_from_slice(&3780u32.to_be_bytes());
        chunk.push(1);
        chunk.extend_from_slice(&[0, 0, 0, 0]);
        bytes.splice(ihdr_end..ihdr_end, chunk);

        assert_eq!(png_dpi(&bytes), Some((96, 96)));
    }

    #[test]
    fn test_jfif_density() {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        bytes.extend_from_slice(b"JFIF\0");
        bytes.extend_from_slice(&[1, 1, 1, 0, 150, 0, 150]);
        assert_eq!(jfif_dpi(&bytes), Some((150, 150)));
    }
}
