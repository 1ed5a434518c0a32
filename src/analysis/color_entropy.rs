use log::debug;

use crate::{
    analysis::{Evidence, Extractor},
    error::Result,
    image_utils::channel_histogram,
    views::DerivedViews,
};

const LOG_EPSILON: f64 = 1e-10;

pub struct ColorEntropyExtractor {
    min_entropy_bits: f64,
    weight: u32,
}

impl ColorEntropyExtractor {
    pub fn new() -> Self {
        Self {
            min_entropy_bits: 5.0,
            weight: 15,
        }
    }

    pub fn with_threshold(mut self, bits: f64) -> Self {
        self.min_entropy_bits = bits;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Mean Shannon entropy, in bits, of the three channel histograms.
    pub fn average_entropy(&self, views: &DerivedViews) -> f64 {
        (0..3)
            .map(|channel| shannon_entropy(&channel_histogram(views.rgb(), channel)))
            .sum::<f64>()
            / 3.0
    }
}

impl Default for ColorEntropyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn shannon_entropy(histogram: &[u32; 256]) -> f64 {
    let total = histogram.iter().map(|&c| c as f64).sum::<f64>();
    if total == 0.0 {
        return 0.0;
    }

    -histogram
        .iter()
        .map(|&count| {
            let p = count as f64 / total;
            p * (p + LOG_EPSILON).log2()
        })
        .sum::<f64>()
}

impl Extractor for ColorEntropyExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let entropy = self.average_entropy(views);
        debug!("{}: average entropy={:.3} bits", self.name(), entropy);

        if entropy < self.min_entropy_bits {
            Ok(vec![Evidence::ai_generation(
                "Low color entropy detected (characteristic of AI generation)",
                self.weight,
            )])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "color entropy"
    }
}
