use log::debug;

use crate::{
    analysis::{Evidence, Extractor},
    error::{AuthenticityError, Result},
    image_utils::{partition_blocks, pearson_correlation},
    views::DerivedViews,
};

/// Cheap cloning check: correlates the leading blocks of the image against
/// their immediate successors in scan order. Only `sampled_blocks` blocks are
/// ever examined, each against at most `comparison_window` followers.
pub struct BlockCorrelationExtractor {
    block_size: u32,
    sampled_blocks: usize,
    comparison_window: usize,
    correlation_threshold: f64,
    max_correlated_pairs: usize,
    weight: u32,
}

impl BlockCorrelationExtractor {
    pub fn new() -> Self {
        Self {
            block_size: 32,
            sampled_blocks: 10,
            comparison_window: 4,
            correlation_threshold: 0.8,
            max_correlated_pairs: 2,
            weight: 20,
        }
    }

    pub fn with_block_size(mut self, block_size: u32) -> Result<Self> {
        if block_size < 2 {
            return Err(AuthenticityError::InvalidParameter(
                "Block size must be at least 2".into(),
            ));
        }
        self.block_size = block_size;
        Ok(self)
    }

    pub fn with_sampling(mut self, sampled_blocks: usize, comparison_window: usize) -> Self {
        self.sampled_blocks = sampled_blocks;
        self.comparison_window = comparison_window;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = threshold;
        self
    }

    /// Number of sampled block pairs whose correlation exceeds the threshold.
    pub fn correlated_pairs(&self, views: &DerivedViews) -> usize {
        let blocks = partition_blocks(
            views.gray(),
            self.block_size,
            self.sampled_blocks + self.comparison_window,
        );

        if blocks.len() < 2 {
            return 0;
        }

        let mut pairs = 0;
        for i in 0..self.sampled_blocks.min(blocks.len() - 1) {
            let end = (i + 1 + self.comparison_window).min(blocks.len());

            for j in (i + 1)..end {
                match pearson_correlation(&blocks[i], &blocks[j]) {
                    Some(r) if r > self.correlation_threshold => pairs += 1,
                    _ => {}
                }
            }
        }

        pairs
    }
}

impl Default for BlockCorrelationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for BlockCorrelationExtractor {
    fn extract(&self, views: &DerivedViews) -> Result<Vec<Evidence>> {
        let pairs = self.correlated_pairs(views);
        debug!("{}: {} highly correlated pairs", self.name(), pairs);

        if pairs > self.max_correlated_pairs {
            Ok(vec![Evidence::manipulation(
                "Potential cloning detected (high block correlation)",
                self.weight,
            )])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "block correlation"
    }
}
