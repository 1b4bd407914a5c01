use crate::config::Rgb;
use image::RgbImage;
use std::path::Path;

/// Equirectangular base-colour texture for the earth sphere
pub struct EarthTexture {
    image: RgbImage,
}

impl EarthTexture {
    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        let image = image::open(path)?.to_rgb8();
        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Loaded earth texture"
        );
        Ok(Self { image })
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Nearest-texel lookup; `u` wraps, `v` clamps.
    pub fn sample(&self, u: f64, v: f64) -> Rgb {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return Rgb(0, 0, 0);
        }
        let x = ((u.rem_euclid(1.0) * w as f64) as u32).min(w - 1);
        let y = ((v.clamp(0.0, 1.0) * h as f64) as u32).min(h - 1);
        let [r, g, b] = self.image.get_pixel(x, y).0;
        Rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadrants() -> EarthTexture {
        // West half red, east half blue, bottom row green
        let image = RgbImage::from_fn(4, 2, |x, y| {
            if y == 1 {
                image::Rgb([0, 255, 0])
            } else if x < 2 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        EarthTexture::from_image(image)
    }

    #[test]
    fn test_sample_halves() {
        let tex = quadrants();
        assert_eq!(tex.sample(0.1, 0.1), Rgb(255, 0, 0));
        assert_eq!(tex.sample(0.9, 0.1), Rgb(0, 0, 255));
        assert_eq!(tex.sample(0.5, 0.9), Rgb(0, 255, 0));
    }

    #[test]
    fn test_sample_edges() {
        let tex = quadrants();
        assert_eq!(tex.sample(1.0, 0.0), Rgb(255, 0, 0));
        assert_eq!(tex.sample(-0.1, 0.0), Rgb(0, 0, 255));
        assert_eq!(tex.sample(0.0, 1.0), Rgb(0, 255, 0));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(EarthTexture::load(Path::new("/no/such/texture.jpg")).is_err());
    }
}
