pub mod block_correlation;
pub mod color_entropy;
pub mod compression;
pub mod dimensions;
pub mod edge_density;
pub mod focus;
pub mod frequency;
pub mod noise_uniformity;

use serde::{Deserialize, Serialize};

use crate::{error::Result, views::DerivedViews};

use self::{
    block_correlation::BlockCorrelationExtractor, color_entropy::ColorEntropyExtractor,
    compression::CompressionExtractor, dimensions::DimensionExtractor,
    edge_density::EdgeDensityExtractor, focus::FocusExtractor, frequency::FrequencyExtractor,
    noise_uniformity::NoiseUniformityExtractor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hypothesis {
    AiGeneration,
    Manipulation,
}

/// One weighted observation in favour of a hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub hypothesis: Hypothesis,
    pub description: String,
    pub weight: u32,
}

impl Evidence {
    pub fn ai_generation(description: impl Into<String>, weight: u32) -> Self {
        Self {
            hypothesis: Hypothesis::AiGeneration,
            description: description.into(),
            weight,
        }
    }

    pub fn manipulation(description: impl Into<String>, weight: u32) -> Self {
        Self {
            hypothesis: Hypothesis::Manipulation,
            description: description.into(),
            weight,
        }
    }
}

/// A single independent signal. Implementations only read the shared views
/// and never see each other's output.
pub trait Extractor: Send + Sync {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>>;

    fn name(&self) -> &str;
}

/// The full extractor set in reporting order.
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(DimensionExtractor::new()),
        Box::new(CompressionExtractor::new()),
        Box::new(ColorEntropyExtractor::new()),
        Box::new(EdgeDensityExtractor::new()),
        Box::new(FocusExtractor::new()),
        Box::new(BlockCorrelationExtractor::new()),
        Box::new(NoiseUniformityExtractor::new()),
        Box::new(FrequencyExtractor::new()),
    ]
}
