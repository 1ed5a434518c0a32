use image::DynamicImage;
use log::{debug, warn};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::{
    analysis::{Evidence, Extractor, default_extractors},
    error::{AuthenticityError, Result},
    input::{decode_image, resolve_input},
    metadata::{ExifProbe, MetadataSummary},
    verdict::{Classifier, EvidenceLedger},
    views::DerivedViews,
};

pub mod analysis;
pub mod error;
pub mod image_utils;
pub mod input;
pub mod metadata;
pub mod report;
pub mod verdict;
pub mod views;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub parallel: bool,
    pub decision_threshold: u32,
    pub confidence_ceiling: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            decision_threshold: 25,
            confidence_ceiling: 95,
        }
    }
}

pub struct AuthenticityAnalyzer {
    original: DynamicImage,
    bytes: Option<Vec<u8>>,
    config: AnalysisConfig,
    extractors: Vec<Box<dyn Extractor>>,
}

impl AuthenticityAnalyzer {
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            original: image,
            bytes: None,
            config: AnalysisConfig::default(),
            extractors: default_extractors(),
        }
    }

    /// Accepts a data URL or bare base64 of the compressed image.
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let decoded = decode_image(encoded)?;

        Ok(Self {
            bytes: Some(decoded.bytes),
            ..Self::from_image(decoded.image)
        })
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the extractor set. Evidence is reported in the order given.
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn Extractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.original.width(), self.original.height())
    }

    /// Runs every extractor exactly once. Evidence lands in the ledger in
    /// extractor order whether or not extraction ran in parallel.
    pub fn collect_evidence(&self) -> Result<EvidenceLedger> {
        let rgb = self.original.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(AuthenticityError::EmptyImage(width, height));
        }

        let views = DerivedViews::new(&rgb);

        let per_extractor = if self.config.parallel {
            self.extractors
                .par_iter()
                .map(|e| e.extract(&views))
                .collect::<Result<Vec<Vec<Evidence>>>>()?
        } else {
            self.extractors
                .iter()
                .map(|e| e.extract(&views))
                .collect::<Result<Vec<Vec<Evidence>>>>()?
        };

        let mut ledger = EvidenceLedger::new();
        for (extractor, evidence) in self.extractors.iter().zip(per_extractor) {
            debug!("{} produced {} evidence item(s)", extractor.name(), evidence.len());
            ledger.extend(evidence);
        }

        Ok(ledger)
    }

    pub fn analyze(&self) -> Result<AnalysisResult> {
        let ledger = self.collect_evidence()?;
        let classifier = Classifier::new(
            self.config.decision_threshold,
            self.config.confidence_ceiling,
        );

        Ok(classifier.classify(&ledger, self.dimensions()))
    }

    /// EXIF summary of the compressed bytes, when the analyzer was built from
    /// an encoding.
    pub fn inspect_metadata(&self) -> MetadataSummary {
        self.bytes
            .as_deref()
            .map(ExifProbe::inspect)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_authentic: bool,
    pub confidence: u32,
    pub reasoning: String,
    pub ai_generation_detected: bool,
    pub ai_generation_confidence: u32,
    pub ai_generation_evidence: Vec<String>,
    pub manipulation_detected: bool,
    pub manipulation_confidence: u32,
    pub manipulation_evidence: Vec<String>,
    #[serde(
        rename = "image_dimensions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_dimensions: Option<String>,
}

impl AnalysisResult {
    /// Fail-open result: an image that could not be analyzed is reported as
    /// authentic with zero confidence.
    pub fn failed(error: &AuthenticityError) -> Self {
        Self {
            is_authentic: true,
            confidence: 0,
            reasoning: format!("Error during analysis: {}", error),
            ai_generation_detected: false,
            ai_generation_confidence: 0,
            ai_generation_evidence: Vec::new(),
            manipulation_detected: false,
            manipulation_confidence: 0,
            manipulation_evidence: Vec::new(),
            image_dimensions: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub metadata: MetadataSummary,
}

/// End-to-end check of one input argument (a path or a literal encoding).
/// Never fails: errors become the fail-open result.
pub fn check_authenticity(input: &str, config: AnalysisConfig) -> AnalysisOutcome {
    let attempt = resolve_input(input).and_then(|encoded| {
        let analyzer = AuthenticityAnalyzer::from_encoded(&encoded)?.with_config(config);
        let result = analyzer.analyze()?;
        Ok(AnalysisOutcome {
            result,
            metadata: analyzer.inspect_metadata(),
        })
    });

    attempt.unwrap_or_else(|e| {
        warn!("Analysis failed: {}", e);
        AnalysisOutcome {
            result: AnalysisResult::failed(&e),
            metadata: MetadataSummary::default(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn noise(width: u32, height: u32, seed: u32) -> DynamicImage {
        let mut state = seed;
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let v = (state >> 24) as u8;
            Rgb([v, v.wrapping_mul(3), v.wrapping_add(91)])
        }))
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let image = noise(160, 96, 7);
        let parallel = AuthenticityAnalyzer::from_image(image.clone()).analyze().unwrap();
        let sequential = AuthenticityAnalyzer::from_image(image)
            .with_config(AnalysisConfig {
                parallel: false,
                ..AnalysisConfig::default()
            })
            .analyze()
            .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let analyzer = AuthenticityAnalyzer::from_image(noise(128, 128, 3));
        let first = serde_json::to_string(&analyzer.analyze().unwrap()).unwrap();
        let second = serde_json::to_string(&analyzer.analyze().unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_solid_square() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1024, 1024, Rgb([128, 128, 128])));
        let result = AuthenticityAnalyzer::from_image(image).analyze().unwrap();

        assert!(result.manipulation_confidence >= 20);
        assert!(result.manipulation_evidence.contains(&"Heavy compression detected".to_string()));
        assert!(
            result
                .manipulation_evidence
                .contains(&"Potential focus inconsistency detected".to_string())
        );
        assert!(
            !result
                .ai_generation_evidence
                .iter()
                .any(|e| e.starts_with("Uncommon width"))
        );
        assert!(!result.is_authentic);
        assert!(!(result.ai_generation_detected && result.manipulation_detected));
        assert_eq!(result.image_dimensions.as_deref(), Some("1024x1024"));
    }

    #[test]
    fn test_custom_extractor_set() {
        let analyzer = AuthenticityAnalyzer::from_image(noise(999, 40, 1)).with_extractors(vec![
            Box::new(analysis::dimensions::DimensionExtractor::new()),
        ]);
        let result = analyzer.analyze().unwrap();

        assert_eq!(result.ai_generation_confidence, 5);
        assert!(result.is_authentic);
        assert_eq!(result.confidence, 90);
    }

    #[test]
    fn test_empty_image_is_an_error() {
        let analyzer = AuthenticityAnalyzer::from_image(DynamicImage::ImageRgb8(RgbImage::new(0, 0)));
        assert!(matches!(
            analyzer.analyze(),
            Err(AuthenticityError::EmptyImage(0, 0))
        ));
    }

    #[test]
    fn test_failed_result_serializes_without_dimensions() {
        let result = AnalysisResult::failed(&AuthenticityError::InvalidParameter("x".into()));
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("image_dimensions").is_none());
        assert_eq!(json["isAuthentic"], serde_json::json!(true));
        assert_eq!(json["confidence"], serde_json::json!(0));
    }
}
