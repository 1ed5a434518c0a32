use log::debug;

use crate::{
    analysis::{Evidence, Extractor},
    error::Result,
    views::DerivedViews,
};

/// Aggressive re-compression flattens high-frequency detail, which shows up
/// as a low Laplacian variance.
pub struct CompressionExtractor {
    variance_threshold: f64,
    weight: u32,
}

impl CompressionExtractor {
    pub fn new() -> Self {
        Self {
            variance_threshold: 100.0,
            weight: 10,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.variance_threshold = threshold;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for CompressionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for CompressionExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let variance = views.laplacian_variance();
        debug!("{}: laplacian variance={:.3}", self.name(), variance);

        if variance < self.variance_threshold {
            Ok(vec![Evidence::manipulation(
                "Heavy compression detected",
                self.weight,
            )])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "compression artifacts"
    }
}
