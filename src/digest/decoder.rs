//! Digest text back to blocks.
//!
//! Every token must split into exactly five fields. The first malformed token
//! aborts the whole decode; no partial block list is returned.

use super::{color, BlockBounds, BlockRecord};
use crate::error::{DigestError, PositionFault, Result};

pub const BLOCK_SEPARATOR: char = '_';
pub const FIELD_SEPARATOR: char = '-';

/// Decodes `rrggbb-x1-y1-x2-y2_...` in order.
pub fn decode(text: &str) -> Result<Vec<BlockRecord>> {
    text.split(BLOCK_SEPARATOR).map(decode_block).collect()
}

/// Decodes a single `rrggbb-x1-y1-x2-y2` token.
pub fn decode_block(token: &str) -> Result<BlockRecord> {
    let fields: Vec<&str> = token.split(FIELD_SEPARATOR).collect();
    let [color_field, x1, y1, x2, y2] = fields.as_slice() else {
        return Err(position_error(token, PositionFault::FieldCount(fields.len())));
    };

    let bounds = BlockBounds::new(
        coordinate(token, x1)?,
        coordinate(token, y1)?,
        coordinate(token, x2)?,
        coordinate(token, y2)?,
    );
    let color = color::decode(color_field).map_err(|source| DigestError::PixelColor {
        token: token.to_owned(),
        source,
    })?;

    Ok(BlockRecord { color, bounds })
}

fn coordinate(token: &str, field: &str) -> Result<u32> {
    // `u32::from_str` alone would let a leading `+` through
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(position_error(token, PositionFault::NotAnInteger(field.to_owned())));
    }
    field
        .parse()
        .map_err(|_| position_error(token, PositionFault::NotAnInteger(field.to_owned())))
}

fn position_error(token: &str, reason: PositionFault) -> DigestError {
    DigestError::PixelPosition {
        token: token.to_owned(),
        reason,
    }
}
