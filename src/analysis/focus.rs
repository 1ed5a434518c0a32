use log::debug;

use crate::{
    analysis::{Evidence, Extractor},
    error::Result,
    views::DerivedViews,
};

/// Focus measure over the same Laplacian statistic as the compression check,
/// at a higher cutoff. Both checks are evaluated independently.
pub struct FocusExtractor {
    variance_threshold: f64,
    weight: u32,
}

impl FocusExtractor {
    pub fn new() -> Self {
        Self {
            variance_threshold: 500.0,
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

impl Default for FocusExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for FocusExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let focus_measure = views.laplacian_variance();
        debug!("{}: focus measure={:.3}", self.name(), focus_measure);

        if focus_measure < self.variance_threshold {
            Ok(vec![Evidence::manipulation(
                "Potential focus inconsistency detected",
                self.weight,
            )])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "focus consistency"
    }
}
