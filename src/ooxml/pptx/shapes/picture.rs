//! Picture shapes and the image behind them.

use crate::common::xml::XmlNode;
use crate::ooxml::opc::{PackURI, Relationships};
use crate::ooxml::error::Result;
use crate::ooxml::pptx::format::{ImageFormat, ImageInfo};
use std::sync::Arc;

/// Where the image bytes of a picture live.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// An existing media part of the package
    Embedded(PackURI),
    /// Image bytes added in memory, written as a media part on save
    Data { blob: Arc<Vec<u8>>, format: ImageFormat },
    /// The `r:embed` reference did not resolve
    Unresolved,
}

impl ImageSource {
    /// Resolve the `a:blip/@r:embed` of a `p:blipFill` element.
    pub fn from_blip_fill(blip_fill: Option<&XmlNode>, rels: Option<&Relationships>) -> Self {
        blip_fill
            .and_then(|fill| fill.child("blip"))
            .and_then(|blip| blip.prefixed_attr("embed"))
            .and_then(|r_id| rels?.get(r_id))
            .and_then(|rel| rel.target_partname().ok())
            .map_or(ImageSource::Unresolved, ImageSource::Embedded)
    }

    /// Take ownership of image bytes, probing their format and size.
    pub fn from_bytes(blob: Vec<u8>, fallback_dpi: u32) -> Result<(Self, ImageInfo)> {
        let info = ImageInfo::probe(&blob, fallback_dpi)?;
        Ok((
            ImageSource::Data {
                blob: Arc::new(blob),
                format: info.format,
            },
            info,
        ))
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            ImageSource::Data { format, .. } => Some(format.mime_type()),
            ImageSource::Embedded(partname) => match partname.ext().to_lowercase().as_str() {
                "png" => Some(ImageFormat::Png.mime_type()),
                "jpg" | "jpeg" => Some(ImageFormat::Jpeg.mime_type()),
                "gif" => Some(ImageFormat::Gif.mime_type()),
                "bmp" => Some(ImageFormat::Bmp.mime_type()),
                "tif" | "tiff" => Some(ImageFormat::Tiff.mime_type()),
                _ => None,
            },
            ImageSource::Unresolved => None,
        }
    }
}
