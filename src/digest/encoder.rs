//! Image to digest.

use std::{
    fmt::Write as _,
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};

use image::{
    error::{DecodingError, ImageFormatHint},
    DynamicImage, ImageError, ImageReader,
};
#[cfg(feature = "multithreaded")]
use rayon::prelude::*;
use tracing::{debug, debug_span, warn};

use super::{grid::GridPolicy, sampler, BlockBounds, BlockRecord, ImageDigest, PixelSource};
use crate::error::{DigestError, Result};

/// Column-major grid of `block_width × block_height` cells over the image.
/// Edge cells are clamped to the image.
pub fn block_grid(width: u32, height: u32, block_width: u32, block_height: u32) -> Vec<BlockBounds> {
    let columns = width / block_width;
    let rows = height / block_height;
    let mut grid = Vec::with_capacity(columns as usize * rows as usize);
    for a in 0..columns {
        for b in 0..rows {
            let x = a * block_width;
            let y = b * block_height;
            grid.push(BlockBounds::new(
                x,
                y,
                (x + block_width).min(width),
                (y + block_height).min(height),
            ));
        }
    }
    grid
}

/// Joins blocks into digest text: `rrggbb-x1-y1-x2-y2`, separated by `_`.
pub fn serialize(blocks: &[BlockRecord]) -> String {
    // longest token is `rrggbb` plus four 10-digit coordinates
    let mut text = String::with_capacity(blocks.len() * 24);
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            text.push('_');
        }
        let _ = write!(text, "{block}");
    }
    text
}

#[cfg(feature = "multithreaded")]
fn sample_all<S: PixelSource + ?Sized>(source: &S, grid: Vec<BlockBounds>) -> Vec<BlockRecord> {
    // indexed collect keeps column-major order
    grid.into_par_iter()
        .map(|bounds| BlockRecord {
            color: sampler::sample_center(source, &bounds),
            bounds,
        })
        .collect()
}

#[cfg(not(feature = "multithreaded"))]
fn sample_all<S: PixelSource + ?Sized>(source: &S, grid: Vec<BlockBounds>) -> Vec<BlockRecord> {
    grid.into_iter()
        .map(|bounds| BlockRecord {
            color: sampler::sample_center(source, &bounds),
            bounds,
        })
        .collect()
}

/// Digest of an already decoded image under the default grid policy.
pub fn encode_image<S: PixelSource + ?Sized>(source: &S) -> Result<ImageDigest> {
    encode_image_with(source, &GridPolicy::default())
}

pub fn encode_image_with<S: PixelSource + ?Sized>(
    source: &S,
    policy: &GridPolicy,
) -> Result<ImageDigest> {
    let (width, height) = source.dimensions();
    let _span = debug_span!("encode", width, height).entered();

    if width == 0 || height == 0 {
        return Err(DigestError::ImageDecode(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Unknown,
            format!("image has no pixels ({width}x{height})"),
        ))));
    }

    let block_width = policy.block_length(width);
    let block_height = policy.block_length(height);
    debug!(block_width, block_height, "sized grid");
    if block_width == 1 || block_height == 1 {
        warn!(
            block_width,
            block_height, "no divisor in search range, falling back to per-pixel blocks"
        );
    }

    let grid = block_grid(width, height, block_width, block_height);
    let blocks = sample_all(source, grid);
    debug!(blocks = blocks.len(), "sampled blocks");

    Ok(ImageDigest {
        width,
        height,
        block_width,
        block_height,
        blocks,
    })
}

/// Decodes an image from a seekable stream, guessing its format from content.
pub fn encode_reader<R: BufRead + Seek>(reader: R) -> Result<ImageDigest> {
    encode_reader_with(reader, &GridPolicy::default())
}

pub fn encode_reader_with<R: BufRead + Seek>(reader: R, policy: &GridPolicy) -> Result<ImageDigest> {
    let image = decode_stream(reader)?;
    encode_image_with(&image, policy)
}

fn decode_stream<R: BufRead + Seek>(reader: R) -> Result<DynamicImage> {
    let image = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .decode()?;
    Ok(image)
}

/// Decodes an in-memory encoded image.
pub fn encode_bytes(bytes: &[u8]) -> Result<ImageDigest> {
    encode_bytes_with(bytes, &GridPolicy::default())
}

pub fn encode_bytes_with(bytes: &[u8], policy: &GridPolicy) -> Result<ImageDigest> {
    let image = image::load_from_memory(bytes)?;
    encode_image_with(&image, policy)
}

/// Opens, decodes and digests the image at `path`.
pub fn encode_file<P: AsRef<Path>>(path: P) -> Result<ImageDigest> {
    encode_file_with(path, &GridPolicy::default())
}

pub fn encode_file_with<P: AsRef<Path>>(path: P, policy: &GridPolicy) -> Result<ImageDigest> {
    let path = path.as_ref();
    let image = {
        let file = File::open(path).map_err(|source| DigestError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;
        // handle is released here whether or not decoding succeeded
        decode_stream(BufReader::new(file))?
    };
    debug!(path = %path.display(), "decoded image");
    encode_image_with(&image, policy)
}
