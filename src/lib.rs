pub mod config;
pub mod digest;
pub mod error;
pub mod logging;

pub use digest::{BlockBounds, BlockRecord, ImageDigest, PixelSource, Rgb8};
pub use digest::color::{decode as decode_color, encode as encode_color};
pub use digest::decoder::decode;
pub use digest::encoder::{encode_bytes, encode_file, encode_file_with, encode_image, encode_image_with, encode_reader};
pub use digest::grid::{block_length, GridPolicy};
pub use digest::render::render;
pub use error::{ColorFormatError, DigestError, PositionFault, Result};


#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    #[test]
    fn inspect_render_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.png");
        RgbImage::from_fn(90, 60, |x, _| if x < 45 { Rgb([200, 10, 10]) } else { Rgb([10, 10, 200]) })
            .save(&path)
            .unwrap();

        let digest = crate::encode_file(&path).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        let restored: crate::ImageDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, digest);
        assert_eq!(crate::decode(&digest.to_text()).unwrap(), digest.blocks());

        let rendered = crate::render(&restored);
        assert_eq!(rendered.dimensions(), (90, 60));
        assert_eq!(*rendered.get_pixel(0, 0), Rgb([200, 10, 10]));
        assert_eq!(*rendered.get_pixel(89, 59), Rgb([10, 10, 200]));
    }
}
