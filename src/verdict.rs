use log::info;
use serde::Serialize;

use crate::{
    AnalysisResult,
    analysis::{Evidence, Hypothesis},
};

/// Append-only evidence store, one ordered list per hypothesis.
#[derive(Debug, Clone, Default)]
pub struct EvidenceLedger {
    ai_generation: Vec<Evidence>,
    manipulation: Vec<Evidence>,
}

impl EvidenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, evidence: Evidence) {
        match evidence.hypothesis {
            Hypothesis::AiGeneration => self.ai_generation.push(evidence),
            Hypothesis::Manipulation => self.manipulation.push(evidence),
        }
    }

    pub fn ai_generation(&self) -> &[Evidence] {
        &self.ai_generation
    }

    pub fn manipulation(&self) -> &[Evidence] {
        &self.manipulation
    }

    /// Per-hypothesis weight sums, each clamped to `ceiling`.
    pub fn totals(&self, ceiling: u32) -> ConfidenceTotals {
        let sum = |items: &[Evidence]| {
            items
                .iter()
                .fold(0u32, |acc, e| acc.saturating_add(e.weight))
                .min(ceiling)
        };

        ConfidenceTotals {
            ai_generation: sum(&self.ai_generation),
            manipulation: sum(&self.manipulation),
        }
    }
}

impl Extend<Evidence> for EvidenceLedger {
    fn extend<T: IntoIterator<Item = Evidence>>(&mut self, iter: T) {
        for evidence in iter {
            self.record(evidence);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfidenceTotals {
    pub ai_generation: u32,
    pub manipulation: u32,
}

impl ConfidenceTotals {
    pub fn max(&self) -> u32 {
        self.ai_generation.max(self.manipulation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authentic,
    AiGenerated,
    Manipulated,
}

pub struct Classifier {
    decision_threshold: u32,
    confidence_ceiling: u32,
}

impl Classifier {
    pub fn new(decision_threshold: u32, confidence_ceiling: u32) -> Self {
        Self {
            decision_threshold,
            confidence_ceiling,
        }
    }

    /// Ties between the two hypotheses go to AI generation.
    pub fn decide(&self, totals: ConfidenceTotals) -> Verdict {
        if totals.max() <= self.decision_threshold {
            Verdict::Authentic
        } else if totals.ai_generation >= totals.manipulation {
            Verdict::AiGenerated
        } else {
            Verdict::Manipulated
        }
    }

    pub fn classify(&self, ledger: &EvidenceLedger, image_dimensions: String) -> AnalysisResult {
        let totals = ledger.totals(self.confidence_ceiling);
        info!(
            "ai confidence={}, manipulation confidence={}, max={}",
            totals.ai_generation,
            totals.manipulation,
            totals.max()
        );

        let verdict = self.decide(totals);

        let (confidence, reasoning) = match verdict {
            Verdict::Authentic => (
                self.confidence_ceiling.saturating_sub(totals.max()),
                "✓ Image appears authentic with no significant anomalies detected.".to_string(),
            ),
            Verdict::AiGenerated => (
                totals.ai_generation,
                format!(
                    "⚠️ AI GENERATION DETECTED: {}% confidence. {}",
                    totals.ai_generation,
                    leading_descriptions(ledger.ai_generation())
                        .unwrap_or_else(|| "Multiple anomalies detected".into())
                ),
            ),
            Verdict::Manipulated => (
                totals.manipulation,
                format!(
                    "⚠️ MANIPULATION DETECTED: {}% confidence. {}",
                    totals.manipulation,
                    leading_descriptions(ledger.manipulation()).unwrap_or_else(|| "anomalies".into())
                ),
            ),
        };

        AnalysisResult {
            is_authentic: verdict == Verdict::Authentic,
            confidence,
            reasoning,
            ai_generation_detected: verdict == Verdict::AiGenerated,
            ai_generation_confidence: totals.ai_generation,
            ai_generation_evidence: descriptions(ledger.ai_generation()),
            manipulation_detected: verdict == Verdict::Manipulated,
            manipulation_confidence: totals.manipulation,
            manipulation_evidence: descriptions(ledger.manipulation()),
            image_dimensions: Some(image_dimensions),
        }
    }
}

fn descriptions(items: &[Evidence]) -> Vec<String> {
    items.iter().map(|e| e.description.clone()).collect()
}

fn leading_descriptions(items: &[Evidence]) -> Option<String> {
    if items.is_empty() {
        return None;
    }

    Some(
        items
            .iter()
            .take(2)
            .map(|e| e.description.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}
