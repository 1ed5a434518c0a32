use log::debug;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use statrs::statistics::Statistics;

use crate::{
    analysis::{Evidence, Extractor},
    error::{AuthenticityError, Result},
    image_utils::IntegralImage,
    views::DerivedViews,
};

/// Diffusion output tends to carry noise of nearly constant strength across
/// the frame. This measures how much the local variance itself varies.
pub struct NoiseUniformityExtractor {
    half_window: usize,
    min_spread: f64,
    weight: u32,
}

impl NoiseUniformityExtractor {
    pub fn new() -> Self {
        Self {
            half_window: 15,
            min_spread: 50.0,
            weight: 25,
        }
    }

    pub fn with_half_window(mut self, half_window: usize) -> Result<Self> {
        if half_window == 0 {
            return Err(AuthenticityError::InvalidParameter(
                "Local variance window must be non-empty".into(),
            ));
        }
        self.half_window = half_window;
        Ok(self)
    }

    pub fn with_min_spread(mut self, spread: f64) -> Self {
        self.min_spread = spread;
        self
    }

    /// Local variance over a `2k x 2k` window for every pixel at least `k`
    /// from each border, in row-major order.
    pub fn local_variance_map(&self, views: &DerivedViews) -> Vec<f64> {
        let gray = views.gray();
        let (w, h) = (gray.width() as usize, gray.height() as usize);
        let k = self.half_window;

        if w <= 2 * k || h <= 2 * k {
            return Vec::new();
        }

        let integral = IntegralImage::new(gray);

        (k..h - k)
            .into_par_iter()
            .map(|y| {
                (k..w - k)
                    .map(|x| integral.window_variance(x - k, y - k, x + k, y + k))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .concat()
    }

    /// Standard deviation of the strictly positive local variances, zero when
    /// there are none.
    pub fn variance_spread(&self, views: &DerivedViews) -> f64 {
        let positive = self
            .local_variance_map(views)
            .into_iter()
            .filter(|&v| v > 0.0)
            .collect::<Vec<_>>();

        if positive.is_empty() {
            0.0
        } else {
            positive.iter().population_std_dev()
        }
    }
}

impl Default for NoiseUniformityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for NoiseUniformityExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let spread = self.variance_spread(views);
        debug!("{}: local variance spread={:.3}", self.name(), spread);

        if spread < self.min_spread {
            Ok(vec![Evidence::ai_generation(
                "Uniform noise pattern (characteristic of diffusion models)",
                self.weight,
            )])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "noise uniformity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_map_covers_interior_only() {
        let rgb = RgbImage::new(40, 34);
        let views = DerivedViews::new(&rgb);

        assert_eq!(NoiseUniformityExtractor::new().local_variance_map(&views).len(), 10 * 4);
    }

    #[test]
    fn test_flat_image_reads_uniform() {
        let rgb = RgbImage::from_pixel(64, 64, Rgb([7, 7, 7]));
        let views = DerivedViews::new(&rgb);
        let extractor = NoiseUniformityExtractor::new();

        assert_eq!(extractor.variance_spread(&views), 0.0);
        assert_eq!(extractor.extract(&views).unwrap()[0].weight, 25);
    }

    #[test]
    fn test_half_flat_half_busy_is_not_uniform() {
        // left half flat, right half a hard checkerboard
        let rgb = RgbImage::from_fn(128, 64, |x, y| {
            if x < 64 || (x + y) % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let views = DerivedViews::new(&rgb);

        assert!(NoiseUniformityExtractor::new().variance_spread(&views) > 50.0);
        assert!(NoiseUniformityExtractor::new().extract(&views).unwrap().is_empty());
    }
}
