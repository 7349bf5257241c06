//! Block digests: a grid of rectangles, each carrying one sampled color.
//!
//! A digest is produced once per image by [`encoder`], flattened to its text
//! form (`rrggbb-x1-y1-x2-y2_...`) and read back by [`decoder`]. The grid is
//! always traversed column-major: every row of the first column, then every
//! row of the second, and so on.

use std::fmt;

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb, Rgba, RgbaImage};
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{DigestError, PositionFault, Result};

/// Opaque 8-bit color stored per block.
pub type Rgb8 = Srgb<u8>;

/// Straight 16-bit RGBA buffer, as produced by 16-bit PNG/TIFF decoders.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Random access to decoded pixels.
///
/// Channels are 16-bit and alpha-premultiplied, which is the widest form the
/// raster codecs hand out. [`sampler::normalize`] is the only place that
/// narrows them back to 8-bit.
pub trait PixelSource: Sync {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Premultiplied `[r, g, b, a]` at `(x, y)`. Callers keep `x < width` and `y < height`.
    fn pixel_at(&self, x: u32, y: u32) -> [u16; 4];
}

fn premultiply(channel: u32, alpha: u32) -> u16 {
    (channel * alpha / 0xffff) as u16
}

fn widen_rgba8(Rgba([r, g, b, a]): Rgba<u8>) -> [u16; 4] {
    let a = u32::from(a) * 257;
    [
        premultiply(u32::from(r) * 257, a),
        premultiply(u32::from(g) * 257, a),
        premultiply(u32::from(b) * 257, a),
        a as u16,
    ]
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> [u16; 4] {
        widen_rgba8(*self.get_pixel(x, y))
    }
}

impl PixelSource for Rgba16Image {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> [u16; 4] {
        let Rgba([r, g, b, a]) = *self.get_pixel(x, y);
        let a = u32::from(a);
        [
            premultiply(u32::from(r), a),
            premultiply(u32::from(g), a),
            premultiply(u32::from(b), a),
            a as u16,
        ]
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn pixel_at(&self, x: u32, y: u32) -> [u16; 4] {
        match self {
            DynamicImage::ImageRgba16(buffer) => buffer.pixel_at(x, y),
            DynamicImage::ImageRgb16(buffer) => {
                let Rgb([r, g, b]) = *buffer.get_pixel(x, y);
                [r, g, b, 0xffff]
            }
            _ => widen_rgba8(GenericImageView::get_pixel(self, x, y)),
        }
    }
}

/// Half-open pixel rectangle `[x1, x2) × [y1, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockBounds {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BlockBounds {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Non-empty and inside a `width × height` image.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2 && self.x2 <= width && self.y2 <= height
    }
}

/// One grid cell and its representative color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRecord {
    pub color: Rgb8,
    pub bounds: BlockBounds,
}

impl fmt::Display for BlockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let BlockBounds { x1, y1, x2, y2 } = self.bounds;
        write!(f, "{}-{}-{}-{}-{}", color::encode(self.color), x1, y1, x2, y2)
    }
}

/// Everything kept about one inspected image.
///
/// Built by the encoder or from validated text; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DigestRepr", into = "DigestRepr")]
pub struct ImageDigest {
    width: u32,
    height: u32,
    block_width: u32,
    block_height: u32,
    blocks: Vec<BlockRecord>,
}

impl ImageDigest {
    /// Assembles a digest from parts, rejecting blocks that fall outside the image.
    pub fn from_blocks(
        width: u32,
        height: u32,
        block_width: u32,
        block_height: u32,
        blocks: Vec<BlockRecord>,
    ) -> Result<Self> {
        let digest = Self {
            width,
            height,
            block_width,
            block_height,
            blocks,
        };
        digest.validate()?;
        Ok(digest)
    }

    /// Parses digest text and attaches the grid metadata.
    pub fn from_text(
        width: u32,
        height: u32,
        block_width: u32,
        block_height: u32,
        text: &str,
    ) -> Result<Self> {
        Self::from_blocks(width, height, block_width, block_height, decoder::decode(text)?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn block_width(&self) -> u32 {
        self.block_width
    }

    pub fn block_height(&self) -> u32 {
        self.block_height
    }

    /// Blocks in column-major order.
    pub fn blocks(&self) -> &[BlockRecord] {
        &self.blocks
    }

    /// Canonical single-line text form.
    pub fn to_text(&self) -> String {
        encoder::serialize(&self.blocks)
    }

    /// Checks the grid metadata and that every block lies inside the image.
    pub fn validate(&self) -> Result<()> {
        if self.block_width == 0 || self.block_height == 0 {
            return Err(DigestError::InvalidGrid {
                block_width: self.block_width,
                block_height: self.block_height,
            });
        }
        match self
            .blocks
            .iter()
            .find(|block| !block.bounds.fits(self.width, self.height))
        {
            Some(block) => Err(DigestError::PixelPosition {
                token: block.to_string(),
                reason: PositionFault::OutOfBounds {
                    width: self.width,
                    height: self.height,
                },
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Wire shape of [`ImageDigest`]; `blocks` holds the digest text.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DigestRepr {
    width: u32,
    height: u32,
    block_width: u32,
    block_height: u32,
    blocks: String,
}

impl From<ImageDigest> for DigestRepr {
    fn from(digest: ImageDigest) -> Self {
        Self {
            blocks: digest.to_text(),
            width: digest.width,
            height: digest.height,
            block_width: digest.block_width,
            block_height: digest.block_height,
        }
    }
}

impl TryFrom<DigestRepr> for ImageDigest {
    type Error = DigestError;

    fn try_from(repr: DigestRepr) -> Result<Self> {
        ImageDigest::from_text(
            repr.width,
            repr.height,
            repr.block_width,
            repr.block_height,
            &repr.blocks,
        )
    }
}

pub mod color;
pub mod decoder;
pub mod encoder;
pub mod grid;
pub mod render;
pub mod sampler;
