use log::debug;
use ndarray::s;

use crate::{
    analysis::{Evidence, Extractor},
    error::Result,
    views::DerivedViews,
};

/// Compares spectral energy in a square around DC to everything outside it.
pub struct FrequencyExtractor {
    ring_size: usize,
    max_ratio: f64,
    weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralEnergy {
    pub inner: f64,
    pub outer: f64,
}

impl SpectralEnergy {
    pub fn ratio(&self) -> Option<f64> {
        (self.outer > 0.0).then(|| self.inner / self.outer)
    }
}

impl FrequencyExtractor {
    pub fn new() -> Self {
        Self {
            ring_size: 20,
            max_ratio: 2.0,
            weight: 20,
        }
    }

    pub fn with_ring_size(mut self, ring_size: usize) -> Self {
        self.ring_size = ring_size;
        self
    }

    pub fn with_max_ratio(mut self, ratio: f64) -> Self {
        self.max_ratio = ratio;
        self
    }

    /// The inner window spans `[c - r, c + r)` on both axes, clipped to the
    /// spectrum bounds.
    pub fn energy(&self, views: &DerivedViews) -> SpectralEnergy {
        let spectrum = views.spectrum();
        let (h, w) = spectrum.dim();
        let (cy, cx) = (h / 2, w / 2);

        let r = self.ring_size;
        let inner = spectrum
            .slice(s![
                cy.saturating_sub(r)..(cy + r).min(h),
                cx.saturating_sub(r)..(cx + r).min(w)
            ])
            .sum();
        let total = spectrum.sum();

        SpectralEnergy {
            inner,
            outer: total - inner,
        }
    }
}

impl Default for FrequencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for FrequencyExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let energy = self.energy(views);
        debug!(
            "{}: inner={:.1} outer={:.1}",
            self.name(),
            energy.inner,
            energy.outer
        );

        match energy.ratio() {
            Some(ratio) if ratio > self.max_ratio => Ok(vec![Evidence::ai_generation(
                "Abnormal frequency domain patterns detected",
                self.weight,
            )]),
            _ => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "frequency energy ratio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_low_frequency_wave_concentrates_energy() {
        let rgb = RgbImage::from_fn(128, 128, |x, _| {
            let phase = 2.0 * std::f64::consts::PI * x as f64 / 128.0;
            let v = (128.0 + 100.0 * phase.cos()).round() as u8;
            Rgb([v, v, v])
        });
        let views = DerivedViews::new(&rgb);
        let extractor = FrequencyExtractor::new();

        assert!(extractor.energy(&views).ratio().unwrap() > 2.0);
        assert_eq!(extractor.extract(&views).unwrap()[0].weight, 20);
    }

    #[test]
    fn test_fine_checkerboard_pushes_energy_out() {
        let rgb = RgbImage::from_fn(128, 128, |x, y| {
            if (x + y) % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let views = DerivedViews::new(&rgb);
        let extractor = FrequencyExtractor::new();

        // DC and the Nyquist corner carry equal magnitude; the corner is outside
        let energy = extractor.energy(&views);
        assert!(energy.ratio().unwrap() < 2.0);
        assert!(extractor.extract(&views).unwrap().is_empty());
    }

    #[test]
    fn test_window_clips_on_small_images() {
        let rgb = RgbImage::from_pixel(10, 10, Rgb([50, 50, 50]));
        let views = DerivedViews::new(&rgb);
        let energy = FrequencyExtractor::new().energy(&views);

        // everything is inside the clipped window
        assert!(energy.outer.abs() < 1e-6);
    }
}
