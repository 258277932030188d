//! End-to-end analysis: validation, segmentation, scoring, aggregation.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, info_span, warn};

use serve_models::{AnalysisStatus, PoseSequence, ServeAnalysis, ANALYSIS_VERSION};

use crate::aggregator::{technical_analysis, Aggregator};
use crate::config::{ScoringConfig, SegmenterConfig};
use crate::error::{AnalysisError, AnalysisResult};
use crate::metrics;
use crate::report::{analysis_id, effective_fps, phase_reports, video_metadata};
use crate::scoring::{default_scorers, CategoryScorer, MotionContext};
use crate::segmenter::PhaseSegmenter;
use crate::trajectory::TrajectorySet;

/// Runs the full serve analysis over pose sequences.
///
/// An analyzer holds only immutable configuration, so one instance can serve
/// any number of threads.
pub struct ServeAnalyzer {
    segmenter: PhaseSegmenter,
    scorers: Vec<Box<dyn CategoryScorer>>,
    aggregator: Aggregator,
}

impl Default for ServeAnalyzer {
    fn default() -> Self {
        Self::from_parts(SegmenterConfig::default(), &ScoringConfig::default())
    }
}

impl ServeAnalyzer {
    /// Build an analyzer after validating both configurations.
    pub fn new(segmenter: SegmenterConfig, scoring: ScoringConfig) -> AnalysisResult<Self> {
        segmenter.validate()?;
        scoring.validate()?;
        Ok(Self::from_parts(segmenter, &scoring))
    }

    fn from_parts(segmenter: SegmenterConfig, scoring: &ScoringConfig) -> Self {
        Self {
            segmenter: PhaseSegmenter::new(segmenter),
            scorers: default_scorers(scoring),
            aggregator: Aggregator::new(scoring.weights, scoring.tiers),
        }
    }

    /// Analyze one sequence. Failures become a `failed` result.
    pub fn analyze(&self, sequence: &PoseSequence) -> ServeAnalysis {
        match self.try_analyze(sequence) {
            Ok(analysis) => analysis,
            Err(e) => {
                let fps = effective_fps(sequence, self.segmenter.config().default_fps);
                ServeAnalysis::failed(
                    analysis_id(sequence),
                    video_metadata(sequence, fps),
                    e.to_string(),
                )
            }
        }
    }

    /// Analyze one sequence, surfacing input errors to the caller.
    pub fn try_analyze(&self, sequence: &PoseSequence) -> AnalysisResult<ServeAnalysis> {
        let started = Instant::now();
        let id = analysis_id(sequence);
        let span = info_span!("serve_analysis", analysis_id = %id, frames = sequence.len());
        let _guard = span.enter();

        let result = self.run(sequence, id);
        let elapsed = started.elapsed().as_secs_f64();
        match &result {
            Ok(analysis) => {
                metrics::record_analysis("completed", elapsed);
                metrics::record_overall_score(analysis.overall_score);
                info!(
                    overall_score = analysis.overall_score,
                    skill_tier = ?analysis.skill_tier,
                    duration_ms = elapsed * 1000.0,
                    "Serve analysis completed"
                );
            }
            Err(e) => {
                metrics::record_analysis("failed", elapsed);
                warn!(error = %e, kind = e.kind(), "Serve analysis failed");
            }
        }
        result
    }

    /// Analyze independent sequences in parallel. Output order matches input.
    pub fn analyze_batch(&self, sequences: &[PoseSequence]) -> Vec<ServeAnalysis> {
        sequences.par_iter().map(|s| self.analyze(s)).collect()
    }

    fn run(&self, sequence: &PoseSequence, analysis_id: String) -> AnalysisResult<ServeAnalysis> {
        if sequence.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        sequence.validate()?;

        let fps = effective_fps(sequence, self.segmenter.config().default_fps);
        let trajectories = TrajectorySet::extract(sequence);
        let segmentation = self.segmenter.segment(&trajectories, fps);
        metrics::record_segmentation(segmentation.method);

        let ctx = MotionContext::new(&trajectories, &segmentation.phases, fps);
        let scores = self
            .scorers
            .iter()
            .map(|scorer| {
                let score = scorer.score(&ctx);
                if score.insufficient_data {
                    warn!(category = %score.category, "Category scored from insufficient data");
                    metrics::record_insufficient_data(score.category.as_str());
                }
                score
            })
            .collect();
        let technical = technical_analysis(scores)?;
        let aggregate = self.aggregator.aggregate(&technical);

        Ok(ServeAnalysis {
            analysis_id,
            analysis_version: ANALYSIS_VERSION.to_string(),
            status: AnalysisStatus::Completed,
            video_metadata: video_metadata(sequence, fps),
            phase_analysis: phase_reports(sequence, &segmentation.phases, &technical),
            serve_phases: segmentation.phases,
            segmentation: Some(segmentation.method),
            technical_analysis: Some(technical),
            overall_score: aggregate.overall_score,
            skill_tier: Some(aggregate.skill_tier),
            recommendations: aggregate.recommendations,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serve_models::{FramePose, Landmark, LandmarkSample};

    fn still(total: usize) -> PoseSequence {
        PoseSequence::new(
            (0..total)
                .map(|i| {
                    FramePose::detected(
                        i as u64,
                        i as f64 / 30.0,
                        [(Landmark::RightWrist, LandmarkSample::new(0.6, 0.3))],
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_empty_sequence_fails() {
        let analyzer = ServeAnalyzer::default();
        let err = analyzer.try_analyze(&PoseSequence::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));

        let result = analyzer.analyze(&PoseSequence::default());
        assert_eq!(result.status, AnalysisStatus::Failed);
        assert_eq!(result.overall_score, 0.0);
        assert!(result.technical_analysis.is_none());
        assert!(result.message.is_some());
    }

    #[test]
    fn test_invalid_sequence_fails() {
        let mut seq = still(12);
        seq.frames[5].frame_index = 2;
        let err = ServeAnalyzer::default().try_analyze(&seq).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_result_carries_all_parts() {
        let result = ServeAnalyzer::default().analyze(&still(60));
        assert!(result.is_completed());
        assert_eq!(result.analysis_id, "analysis_0");
        assert_eq!(result.analysis_version, ANALYSIS_VERSION);
        assert_eq!(result.serve_phases.len(), 6);
        assert_eq!(result.phase_analysis.len(), 6);
        assert!((0.0..=10.0).contains(&result.overall_score));
        assert!(result.skill_tier.is_some());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut scoring = ScoringConfig::default();
        scoring.weights.body_rotation = 0.9;
        assert!(ServeAnalyzer::new(SegmenterConfig::default(), scoring).is_err());
    }

    #[test]
    fn test_batch_preserves_order() {
        let sequences = vec![still(30), PoseSequence::default(), still(45)];
        let results = ServeAnalyzer::default().analyze_batch(&sequences);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_completed());
        assert!(!results[1].is_completed());
        assert_eq!(results[2].video_metadata.total_frames, 45);
    }
}
