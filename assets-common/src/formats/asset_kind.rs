//! Asset kinds and image dimension sniffing
//!
//! An asset's kind is decided once from its file name and selects how its
//! width/height are discovered when the caller did not provide them:
//!
//! | Extension                          | Strategy                           |
//! |------------------------------------|------------------------------------|
//! | `sjpg`, `spng`, `sqoi`             | LE u16 pair at byte offsets 14/16  |
//! | `png jpg jpeg gif bmp webp`        | decode image header                |
//! | anything else                      | none (0×0)                         |
//!
//! The `s*` formats are LVGL split images; their header stores dimensions
//! at a fixed position after the 14-byte signature/version block.

use std::io::Cursor;

/// Byte offset of the width field in a split-image header
pub const SPLIT_IMAGE_WIDTH_OFFSET: usize = 14;
/// Byte offset of the height field in a split-image header
pub const SPLIT_IMAGE_HEIGHT_OFFSET: usize = 16;

/// How an asset's pixel dimensions are discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionStrategy {
    /// Not an image
    None,
    /// Read two LE u16 at fixed offsets
    FixedOffset,
    /// Decode the image header
    Decode,
}

/// Asset kind derived from the lowercase file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    SplitJpeg,
    SplitPng,
    SplitQoi,
    Png,
    Jpeg,
    Gif,
    Bmp,
    WebP,
    Other,
}

const KIND_TABLE: &[(&str, AssetKind, DimensionStrategy)] = &[
    ("sjpg", AssetKind::SplitJpeg, DimensionStrategy::FixedOffset),
    ("spng", AssetKind::SplitPng, DimensionStrategy::FixedOffset),
    ("sqoi", AssetKind::SplitQoi, DimensionStrategy::FixedOffset),
    ("png", AssetKind::Png, DimensionStrategy::Decode),
    ("jpg", AssetKind::Jpeg, DimensionStrategy::Decode),
    ("jpeg", AssetKind::Jpeg, DimensionStrategy::Decode),
    ("gif", AssetKind::Gif, DimensionStrategy::Decode),
    ("bmp", AssetKind::Bmp, DimensionStrategy::Decode),
    ("webp", AssetKind::WebP, DimensionStrategy::Decode),
];

impl AssetKind {
    /// Classify a file by the text after its last `.`
    ///
    /// A name without a dot is treated as its own extension.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let ext = lower.rsplit('.').next().unwrap_or_default();
        KIND_TABLE
            .iter()
            .find(|(tag, _, _)| *tag == ext)
            .map(|&(_, kind, _)| kind)
            .unwrap_or(AssetKind::Other)
    }

    /// Dimension discovery strategy for this kind
    pub fn strategy(self) -> DimensionStrategy {
        KIND_TABLE
            .iter()
            .find(|(_, kind, _)| *kind == self)
            .map(|&(_, _, strategy)| strategy)
            .unwrap_or(DimensionStrategy::None)
    }
}

/// Discover pixel dimensions for an asset.
///
/// Never fails: anything unreadable resolves to (0, 0) with a warning.
/// Values wider than 16 bits are truncated, matching the record field.
pub fn sniff_dimensions(name: &str, data: &[u8]) -> (u16, u16) {
    match AssetKind::from_name(name).strategy() {
        DimensionStrategy::None => (0, 0),
        DimensionStrategy::FixedOffset => read_split_image_header(data).unwrap_or_else(|| {
            tracing::warn!(
                "Failed to parse split image header: {} ({} bytes)",
                name,
                data.len()
            );
            (0, 0)
        }),
        DimensionStrategy::Decode => match decode_dimensions(data) {
            Ok((width, height)) => (width as u16, height as u16),
            Err(e) => {
                tracing::warn!("Failed to read image dimensions: {}: {}", name, e);
                (0, 0)
            }
        },
    }
}

/// Read the width/height pair of an LVGL split-image header
pub fn read_split_image_header(data: &[u8]) -> Option<(u16, u16)> {
    let width = data.get(SPLIT_IMAGE_WIDTH_OFFSET..SPLIT_IMAGE_WIDTH_OFFSET + 2)?;
    let height = data.get(SPLIT_IMAGE_HEIGHT_OFFSET..SPLIT_IMAGE_HEIGHT_OFFSET + 2)?;
    Some((
        u16::from_le_bytes([width[0], width[1]]),
        u16::from_le_bytes([height[0], height[1]]),
    ))
}

/// Probe an in-memory image for its pixel dimensions.
///
/// The format is guessed from content, not from the file name. Only the
/// header is parsed; pixel data is never decoded.
pub fn decode_dimensions(data: &[u8]) -> image::ImageResult<(u32, u32)> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn split_header(width: u16, height: u16) -> Vec<u8> {
        let mut data = b"_SJPG__\0V1.00\0".to_vec();
        assert_eq!(data.len(), 14);
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[0u8; 8]);
        data
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(AssetKind::from_name("logo.SJPG"), AssetKind::SplitJpeg);
        assert_eq!(AssetKind::from_name("a.spng"), AssetKind::SplitPng);
        assert_eq!(AssetKind::from_name("a.b.sqoi"), AssetKind::SplitQoi);
        assert_eq!(AssetKind::from_name("a.JPEG"), AssetKind::Jpeg);
        assert_eq!(AssetKind::from_name("a.webp"), AssetKind::WebP);
        assert_eq!(AssetKind::from_name("font.bin"), AssetKind::Other);
        assert_eq!(AssetKind::from_name("png"), AssetKind::Png);
        assert_eq!(AssetKind::from_name("a."), AssetKind::Other);
    }

    #[test]
    fn test_strategy_table() {
        assert_eq!(AssetKind::SplitQoi.strategy(), DimensionStrategy::FixedOffset);
        assert_eq!(AssetKind::Gif.strategy(), DimensionStrategy::Decode);
        assert_eq!(AssetKind::Other.strategy(), DimensionStrategy::None);
    }

    #[test]
    fn test_split_image_header() {
        let data = split_header(320, 240);
        assert_eq!(read_split_image_header(&data), Some((320, 240)));
        assert_eq!(sniff_dimensions("bg.sjpg", &data), (320, 240));
    }

    #[test]
    fn test_truncated_split_header_is_zero() {
        let data = split_header(320, 240);
        assert_eq!(read_split_image_header(&data[..17]), None);
        assert_eq!(sniff_dimensions("bg.spng", &data[..17]), (0, 0));
        assert_eq!(sniff_dimensions("bg.sqoi", &[]), (0, 0));
    }

    #[test]
    fn test_decode_png_dimensions() {
        let data = png_bytes(7, 3);
        assert_eq!(decode_dimensions(&data).unwrap(), (7, 3));
        assert_eq!(sniff_dimensions("icon.png", &data), (7, 3));
    }

    #[test]
    fn test_format_guessed_from_content() {
        // PNG bytes behind a .jpg name still decode
        let data = png_bytes(4, 5);
        assert_eq!(sniff_dimensions("icon.jpg", &data), (4, 5));
    }

    #[test]
    fn test_garbage_image_is_zero() {
        assert_eq!(sniff_dimensions("broken.png", &[1, 2, 3]), (0, 0));
    }

    #[test]
    fn test_non_image_is_not_probed() {
        let data = png_bytes(2, 2);
        assert_eq!(sniff_dimensions("icon.bin", &data), (0, 0));
    }
}
