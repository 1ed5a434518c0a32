use imageproc::edges::canny;
use log::debug;

use crate::{
    analysis::{Evidence, Extractor},
    error::Result,
    views::DerivedViews,
};

/// Fraction of Canny edge pixels. Splices and pasted objects tend to add
/// hard boundaries.
pub struct EdgeDensityExtractor {
    low_threshold: f32,
    high_threshold: f32,
    max_density: f64,
    weight: u32,
}

impl EdgeDensityExtractor {
    pub fn new() -> Self {
        Self {
            low_threshold: 100.0,
            high_threshold: 200.0,
            max_density: 0.15,
            weight: 5,
        }
    }

    pub fn with_hysteresis(mut self, low: f32, high: f32) -> Self {
        self.low_threshold = low;
        self.high_threshold = high;
        self
    }

    pub fn with_max_density(mut self, density: f64) -> Self {
        self.max_density = density;
        self
    }

    pub fn edge_density(&self, views: &DerivedViews) -> f64 {
        let gray = views.gray();
        let total = gray.width() as u64 * gray.height() as u64;
        if total == 0 {
            return 0.0;
        }

        let edges = canny(gray, self.low_threshold, self.high_threshold);
        let marked = edges.pixels().filter(|p| p[0] > 0).count();

        marked as f64 / total as f64
    }
}

impl Default for EdgeDensityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for EdgeDensityExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let density = self.edge_density(views);
        debug!("{}: density={:.4}", self.name(), density);

        if density > self.max_density {
            Ok(vec![Evidence::manipulation(
                "High edge density detected",
                self.weight,
            )])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "edge density"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_flat_image_has_no_edges() {
        let rgb = RgbImage::from_pixel(48, 48, Rgb([120, 60, 30]));
        let views = DerivedViews::new(&rgb);
        let extractor = EdgeDensityExtractor::new();

        assert_eq!(extractor.edge_density(&views), 0.0);
        assert!(extractor.extract(&views).unwrap().is_empty());
    }

    #[test]
    fn test_dense_stripes_fire() {
        let rgb = RgbImage::from_fn(96, 96, |x, _| {
            if (x / 3) % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let views = DerivedViews::new(&rgb);
        let extractor = EdgeDensityExtractor::new();

        assert!(extractor.edge_density(&views) > 0.15);
        assert_eq!(extractor.extract(&views).unwrap()[0].weight, 5);
    }
}
