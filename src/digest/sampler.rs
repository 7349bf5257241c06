use palette::Srgb;

use super::{BlockBounds, PixelSource, Rgb8};

/// Pixel read for a block: half a block in from its top-left corner, rounded
/// half up, kept inside both the block and the image.
pub fn sample_point(bounds: &BlockBounds, width: u32, height: u32) -> (u32, u32) {
    let x = (bounds.x1 + (bounds.width() + 1) / 2)
        .min(bounds.x2.saturating_sub(1))
        .min(width.saturating_sub(1));
    let y = (bounds.y1 + (bounds.height() + 1) / 2)
        .min(bounds.y2.saturating_sub(1))
        .min(height.saturating_sub(1));
    (x, y)
}

/// Narrows premultiplied 16-bit channels to 8-bit RGB by keeping the high
/// byte. Alpha is dropped; digests are always opaque.
pub fn normalize([r, g, b, _alpha]: [u16; 4]) -> Rgb8 {
    Srgb::new((r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8)
}

/// Color representing `bounds`.
pub fn sample_center<S: PixelSource + ?Sized>(source: &S, bounds: &BlockBounds) -> Rgb8 {
    let (width, height) = source.dimensions();
    let (x, y) = sample_point(bounds, width, height);
    normalize(source.pixel_at(x, y))
}
