use image::{Rgb, RgbImage};

use super::ImageDigest;

/// Paints every block with its color at the source resolution.
pub fn render(digest: &ImageDigest) -> RgbImage {
    let mut canvas = RgbImage::new(digest.width(), digest.height());
    for block in digest.blocks() {
        let pixel = Rgb([block.color.red, block.color.green, block.color.blue]);
        // bounds were checked against the image when the digest was built
        for y in block.bounds.y1..block.bounds.y2 {
            for x in block.bounds.x1..block.bounds.x2 {
                canvas.put_pixel(x, y, pixel);
            }
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::digest::encoder;

    #[test]
    fn renders_blocks_at_source_size() {
        let digest = ImageDigest::from_text(20, 10, 10, 10, "ff0000-0-0-10-10_00ff00-10-0-20-10")
            .unwrap();
        let img = render(&digest);
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(*img.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(9, 9), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(10, 0), Rgb([0, 255, 0]));
        assert_eq!(*img.get_pixel(19, 9), Rgb([0, 255, 0]));
    }

    #[test]
    fn uniform_image_renders_to_itself() {
        let src = RgbaImage::from_pixel(150, 150, Rgba([0x33, 0x66, 0x99, 255]));
        let rendered = render(&encoder::encode_image(&src).unwrap());
        assert!(rendered.pixels().all(|p| *p == Rgb([0x33, 0x66, 0x99])));
    }

    #[test]
    fn encoding_a_render_reproduces_the_digest() {
        let mut src = RgbaImage::new(100, 60);
        for (x, y, pixel) in src.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 2) as u8, (y * 4) as u8, 7, 255]);
        }
        let digest = encoder::encode_image(&src).unwrap();
        let again = encoder::encode_image(&image::DynamicImage::ImageRgb8(render(&digest))).unwrap();
        assert_eq!(again, digest);
    }
}
