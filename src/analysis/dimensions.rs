use log::debug;

use crate::{
    analysis::{Evidence, Extractor},
    error::Result,
    views::DerivedViews,
};

pub const COMMON_WIDTHS: [u32; 8] = [640, 768, 800, 1024, 1280, 1600, 1920, 2048];

/// Flags widths outside the usual camera and export presets.
pub struct DimensionExtractor {
    common_widths: Vec<u32>,
    weight: u32,
}

impl DimensionExtractor {
    pub fn new() -> Self {
        Self {
            common_widths: COMMON_WIDTHS.to_vec(),
            weight: 5,
        }
    }

    pub fn with_common_widths(mut self, widths: &[u32]) -> Self {
        self.common_widths = widths.to_vec();
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for DimensionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for DimensionExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let width = views.width();
        debug!("{}: width={}px", self.name(), width);

        if self.common_widths.contains(&width) {
            return Ok(Vec::new());
        }

        Ok(vec![Evidence::ai_generation(
            format!("Uncommon width dimension: {}px", width),
            self.weight,
        )])
    }

    fn name(&self) -> &str {
        "dimension plausibility"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Hypothesis;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_uncommon_width_adds_five() {
        let rgb = RgbImage::from_pixel(999, 4, Rgb([10, 20, 30]));
        let views = DerivedViews::new(&rgb);
        let evidence = DimensionExtractor::new().extract(&views).unwrap();

        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].hypothesis, Hypothesis::AiGeneration);
        assert_eq!(evidence[0].weight, 5);
        assert_eq!(evidence[0].description, "Uncommon width dimension: 999px");
    }

    #[test]
    fn test_common_widths_are_silent() {
        for width in COMMON_WIDTHS {
            let rgb = RgbImage::new(width, 2);
            let views = DerivedViews::new(&rgb);
            assert!(DimensionExtractor::new().extract(&views).unwrap().is_empty());
        }
    }
}
