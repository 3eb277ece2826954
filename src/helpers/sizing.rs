//! Photo size selection and fit-to-box scaling

use crate::core::file::FileEntity;
use serde::{Deserialize, Serialize};

/// Target dimension for inline photos
pub const PHOTO_SIZE: u32 = 320;

/// Target dimension for photo thumbnails
pub const PHOTO_THUMBNAIL_SIZE: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One available rendition of a photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    /// Rendition type code, `"i"` for inline previews
    #[serde(rename = "type")]
    pub kind: String,
    pub width: u32,
    pub height: u32,
    pub photo: FileEntity,
}

impl PhotoSize {
    /// Inline previews are only usable once their bytes are stored locally
    fn is_usable(&self) -> bool {
        self.kind != "i" || self.photo.has_idb_key()
    }
}

/// Picks the rendition whose dominant side is closest to `dimension`.
///
/// The orientation of the first rendition decides whether widths or heights
/// are compared. The first rendition is the fallback and is always eligible.
pub fn photo_size(sizes: &[PhotoSize], dimension: u32) -> Option<&PhotoSize> {
    let first = sizes.first()?;
    let use_width = first.width >= first.height;
    let distance = |size: &PhotoSize| {
        let side = if use_width { size.width } else { size.height };
        dimension.abs_diff(side)
    };

    let mut best = first;
    let mut best_distance = distance(first);
    for size in sizes.iter().skip(1).filter(|s| s.is_usable()) {
        let current = distance(size);
        if current < best_distance {
            best = size;
            best_distance = current;
        }
    }
    Some(best)
}

pub fn photo_thumbnail_size(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    photo_size(sizes, PHOTO_THUMBNAIL_SIZE)
}

pub fn photo_display_size(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    photo_size(sizes, PHOTO_SIZE)
}

/// Scales `size` so that its longer side equals `max`, keeping the aspect
/// ratio. With `increase_to_max` off, sizes already inside the box are left
/// alone.
pub fn fit_size(size: Option<Dimensions>, max: u32, increase_to_max: bool) -> Dimensions {
    let Some(size) = size else {
        return Dimensions::default();
    };

    if !increase_to_max && size.width < max && size.height < max {
        return size;
    }

    let scale = |side: u32, longest: u32| -> u32 {
        if longest == 0 {
            return 0;
        }
        let scaled = u64::from(side) * u64::from(max) / u64::from(longest);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    };

    if size.width > size.height {
        Dimensions::new(max, scale(size.height, size.width))
    } else {
        Dimensions::new(scale(size.width, size.height), max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(kind: &str, width: u32, height: u32) -> PhotoSize {
        PhotoSize {
            kind: kind.to_string(),
            width,
            height,
            photo: FileEntity::new(1, 0),
        }
    }

    #[test]
    fn test_photo_size_empty() {
        assert!(photo_size(&[], PHOTO_SIZE).is_none());
    }

    #[test]
    fn test_photo_size_picks_closest() {
        let sizes = vec![size("s", 90, 60), size("m", 320, 213), size("x", 800, 533)];
        assert_eq!(photo_display_size(&sizes).unwrap().kind, "m");
        assert_eq!(photo_thumbnail_size(&sizes).unwrap().kind, "s");
        assert_eq!(photo_size(&sizes, 1280).unwrap().kind, "x");
    }

    #[test]
    fn test_photo_size_uses_height_for_portrait() {
        let sizes = vec![size("s", 60, 90), size("m", 213, 320), size("x", 533, 800)];
        assert_eq!(photo_size(&sizes, 300).unwrap().kind, "m");
    }

    #[test]
    fn test_photo_size_skips_unstored_inline_preview() {
        let mut inline = size("i", 320, 213);
        let sizes = vec![size("s", 90, 60), inline.clone()];
        assert_eq!(photo_display_size(&sizes).unwrap().kind, "s");

        inline.photo = inline.photo.with_idb_key("stored");
        let sizes = vec![size("s", 90, 60), inline];
        assert_eq!(photo_display_size(&sizes).unwrap().kind, "i");
    }

    #[test]
    fn test_fit_size_landscape_and_portrait() {
        assert_eq!(
            fit_size(Some(Dimensions::new(1000, 500)), 320, true),
            Dimensions::new(320, 160)
        );
        assert_eq!(
            fit_size(Some(Dimensions::new(500, 1000)), 320, true),
            Dimensions::new(160, 320)
        );
    }

    #[test]
    fn test_fit_size_keeps_small_when_not_increasing() {
        let small = Dimensions::new(100, 50);
        assert_eq!(fit_size(Some(small), 320, false), small);
        assert_eq!(fit_size(Some(small), 320, true), Dimensions::new(320, 160));
    }

    #[test]
    fn test_fit_size_missing_or_degenerate() {
        assert_eq!(fit_size(None, 320, true), Dimensions::default());
        assert_eq!(
            fit_size(Some(Dimensions::new(0, 0)), 320, true),
            Dimensions::new(0, 320)
        );
    }
}
