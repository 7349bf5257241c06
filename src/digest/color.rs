//! Hex text form of block colors.
//!
//! Digests carry bare `rrggbb`. The `#` marker is accepted on input and can be
//! required with [`decode_marked`].

use palette::Srgb;

use super::Rgb8;
use crate::error::ColorFormatError;

pub const MARKER: char = '#';

/// `rrggbb`, lowercase.
pub fn encode(color: Rgb8) -> String {
    format!("{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// `#rrggbb`, lowercase.
pub fn encode_marked(color: Rgb8) -> String {
    format!("{MARKER}{}", encode(color))
}

/// Parses `rrggbb` or the `rgb` shorthand, with or without a leading `#`.
pub fn decode(text: &str) -> Result<Rgb8, ColorFormatError> {
    if text.is_empty() {
        return Err(ColorFormatError::Empty);
    }
    match text.strip_prefix(MARKER) {
        Some(digits) => decode_digits(digits, MARKER.len_utf8()),
        None => decode_digits(text, 0),
    }
}

/// Like [`decode`], but the `#` marker is mandatory.
pub fn decode_marked(text: &str) -> Result<Rgb8, ColorFormatError> {
    if text.is_empty() {
        return Err(ColorFormatError::Empty);
    }
    let digits = text
        .strip_prefix(MARKER)
        .ok_or(ColorFormatError::MissingMarker)?;
    decode_digits(digits, MARKER.len_utf8())
}

fn decode_digits(digits: &str, offset: usize) -> Result<Rgb8, ColorFormatError> {
    let len = digits.chars().count();
    if len != 3 && len != 6 {
        return Err(ColorFormatError::InvalidLength(len));
    }

    let mut nibbles = [0u8; 6];
    for (i, c) in digits.chars().enumerate() {
        nibbles[i] = c
            .to_digit(16)
            .ok_or(ColorFormatError::InvalidDigit {
                position: offset + i,
                found: c,
            })? as u8;
    }

    Ok(match len {
        // each shorthand digit is doubled: `abc` -> `aabbcc`
        3 => Srgb::new(nibbles[0] * 17, nibbles[1] * 17, nibbles[2] * 17),
        _ => Srgb::new(
            nibbles[0] << 4 | nibbles[1],
            nibbles[2] << 4 | nibbles[3],
            nibbles[4] << 4 | nibbles[5],
        ),
    })
}

#[cfg(test)]
mod tests {
    use palette::Srgb;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Srgb::new(0, 0, 0), "000000")]
    #[case(Srgb::new(0xff, 0xff, 0xff), "ffffff")]
    #[case(Srgb::new(0x33, 0x66, 0x99), "336699")]
    #[case(Srgb::new(0x0a, 0xb0, 0x01), "0ab001")]
    fn encodes_lowercase_six_digits(#[case] color: Rgb8, #[case] expected: &str) {
        assert_eq!(encode(color), expected);
        assert_eq!(encode_marked(color), format!("#{expected}"));
    }

    #[rstest]
    #[case("336699", Srgb::new(0x33, 0x66, 0x99))]
    #[case("#336699", Srgb::new(0x33, 0x66, 0x99))]
    #[case("AbCdEf", Srgb::new(0xab, 0xcd, 0xef))]
    #[case("abc", Srgb::new(0xaa, 0xbb, 0xcc))]
    #[case("#F0a", Srgb::new(0xff, 0x00, 0xaa))]
    fn decodes_long_and_short_forms(#[case] text: &str, #[case] expected: Rgb8) {
        assert_eq!(decode(text), Ok(expected));
    }

    #[rstest]
    #[case("", ColorFormatError::Empty)]
    #[case("#", ColorFormatError::InvalidLength(0))]
    #[case("zz1122", ColorFormatError::InvalidDigit { position: 0, found: 'z' })]
    #[case("#12g456", ColorFormatError::InvalidDigit { position: 3, found: 'g' })]
    #[case("1234", ColorFormatError::InvalidLength(4))]
    #[case("1234567", ColorFormatError::InvalidLength(7))]
    #[case("+12", ColorFormatError::InvalidDigit { position: 0, found: '+' })]
    #[case("ééé", ColorFormatError::InvalidDigit { position: 0, found: 'é' })]
    fn rejects_malformed_colors(#[case] text: &str, #[case] expected: ColorFormatError) {
        assert_eq!(decode(text), Err(expected));
    }

    #[test]
    fn marked_decode_requires_marker() {
        assert_eq!(decode_marked("336699"), Err(ColorFormatError::MissingMarker));
        assert_eq!(decode_marked(""), Err(ColorFormatError::Empty));
        assert_eq!(decode_marked("#369"), Ok(Srgb::new(0x33, 0x66, 0x99)));
    }

    #[test]
    fn every_channel_value_survives_round_trip() {
        for v in 0..=u8::MAX {
            for color in [Srgb::new(v, 0, 0), Srgb::new(0, v, 0), Srgb::new(0, 0, v)] {
                assert_eq!(decode(&encode(color)), Ok(color));
                assert_eq!(decode_marked(&encode_marked(color)), Ok(color));
            }
        }
    }

    #[test]
    fn random_colors_survive_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let color: Rgb8 = Srgb::new(rng.gen(), rng.gen(), rng.gen());
            assert_eq!(decode(&encode(color)), Ok(color));
        }
    }
}
