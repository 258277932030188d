//! Banded penalty tables.
//!
//! A [`BandTable`] partitions the real line into ordered, non-overlapping
//! bands. Each band carries a penalty (`<= 0`) and, outside the ideal band, an
//! issue string and an optional recommendation. A measured value scores
//! `10 + penalty` of the single band containing it.
//!
//! Band endpoints are explicit [`Bound`]s so strict and inclusive comparisons
//! are stated exactly rather than implied by evaluation order.

use serde::{Deserialize, Serialize};
use std::ops::{Bound, RangeBounds};

use serve_models::MAX_SCORE;

/// Position of a band relative to the ideal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    Ideal,
    Below,
    Above,
}

/// One contiguous range of a [`BandTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
    /// Score penalty, never positive
    pub penalty: f64,
    pub deviation: Deviation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Band {
    /// Whether `value` falls inside this band. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        (self.lower, self.upper).contains(&value)
    }

    pub fn score(&self) -> f64 {
        (MAX_SCORE + self.penalty).clamp(0.0, MAX_SCORE)
    }
}

/// A threshold step used by the table builders.
///
/// `threshold` is the far edge of the band, measured from the ideal range.
/// An infinite threshold makes the band open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub threshold: f64,
    pub penalty: f64,
    pub issue: Option<String>,
    pub recommendation: Option<String>,
}

impl Step {
    /// A step that only lowers the score.
    pub fn new(threshold: f64, penalty: f64) -> Self {
        Self {
            threshold,
            penalty,
            issue: None,
            recommendation: None,
        }
    }

    /// A step that also reports an issue.
    pub fn flagged(threshold: f64, penalty: f64, issue: impl Into<String>) -> Self {
        Self {
            issue: Some(issue.into()),
            ..Self::new(threshold, penalty)
        }
    }

    /// Attach a recommendation emitted when this band is hit.
    pub fn recommend(mut self, text: impl Into<String>) -> Self {
        self.recommendation = Some(text.into());
        self
    }
}

/// Result of looking a value up in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct BandOutcome {
    pub value: f64,
    pub penalty: f64,
    pub score: f64,
    pub deviation: Deviation,
    pub issue: Option<String>,
    pub recommendation: Option<String>,
}

impl BandOutcome {
    pub fn is_ideal(&self) -> bool {
        self.deviation == Deviation::Ideal
    }
}

fn finite_or_unbounded(bound: Bound<f64>) -> Bound<f64> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) if v.is_infinite() => Bound::Unbounded,
        other => other,
    }
}

/// Ordered set of bands covering the whole real line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandTable {
    bands: Vec<Band>,
}

impl BandTable {
    /// Wrap explicit bands, ordered from lowest to highest.
    pub fn new(bands: Vec<Band>) -> Self {
        Self { bands }
    }

    /// Ideal band `[ideal_low, ideal_high]` with penalties stepping outward.
    ///
    /// `below` runs from the ideal edge downward; each step covers
    /// `[threshold, previous)`. `above` runs upward; each step covers
    /// `(previous, threshold]`. Use infinite thresholds for the outermost steps.
    pub fn symmetric(ideal_low: f64, ideal_high: f64, below: Vec<Step>, above: Vec<Step>) -> Self {
        let mut bands = Vec::with_capacity(below.len() + above.len() + 1);

        let mut edge = ideal_low;
        for step in below {
            bands.push(Band {
                lower: finite_or_unbounded(Bound::Included(step.threshold)),
                upper: Bound::Excluded(edge),
                penalty: step.penalty,
                deviation: Deviation::Below,
                issue: step.issue,
                recommendation: step.recommendation,
            });
            edge = step.threshold;
        }
        bands.reverse();

        bands.push(Band {
            lower: finite_or_unbounded(Bound::Included(ideal_low)),
            upper: finite_or_unbounded(Bound::Included(ideal_high)),
            penalty: 0.0,
            deviation: Deviation::Ideal,
            issue: None,
            recommendation: None,
        });

        let mut edge = ideal_high;
        for step in above {
            bands.push(Band {
                lower: Bound::Excluded(edge),
                upper: finite_or_unbounded(Bound::Included(step.threshold)),
                penalty: step.penalty,
                deviation: Deviation::Above,
                issue: step.issue,
                recommendation: step.recommendation,
            });
            edge = step.threshold;
        }

        Self { bands }
    }

    /// Higher-is-better metric: ideal is `[ideal_min, +inf)`.
    pub fn at_least(ideal_min: f64, below: Vec<Step>) -> Self {
        Self::symmetric(ideal_min, f64::INFINITY, below, Vec::new())
    }

    /// Lower-is-better metric: ideal is `(-inf, ideal_max)`, each step covers
    /// `[previous, threshold)`.
    pub fn below(ideal_max: f64, above: Vec<Step>) -> Self {
        let mut bands = vec![Band {
            lower: Bound::Unbounded,
            upper: Bound::Excluded(ideal_max),
            penalty: 0.0,
            deviation: Deviation::Ideal,
            issue: None,
            recommendation: None,
        }];
        let mut edge = ideal_max;
        for step in above {
            bands.push(Band {
                lower: Bound::Included(edge),
                upper: finite_or_unbounded(Bound::Excluded(step.threshold)),
                penalty: step.penalty,
                deviation: Deviation::Above,
                issue: step.issue,
                recommendation: step.recommendation,
            });
            edge = step.threshold;
        }
        Self { bands }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// The band containing `value`.
    pub fn lookup(&self, value: f64) -> Option<&Band> {
        self.bands.iter().find(|band| band.contains(value))
    }

    /// Score a value. `None` for NaN or a value no band covers.
    pub fn evaluate(&self, value: f64) -> Option<BandOutcome> {
        self.lookup(value).map(|band| BandOutcome {
            value,
            penalty: band.penalty,
            score: band.score(),
            deviation: band.deviation,
            issue: band.issue.clone(),
            recommendation: band.recommendation.clone(),
        })
    }

    /// Check that the bands are ordered, contiguous and cover the real line,
    /// so every non-NaN value matches exactly one band.
    pub fn validate(&self) -> Result<(), String> {
        let (first, last) = match (self.bands.first(), self.bands.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err("band table is empty".to_string()),
        };
        if first.lower != Bound::Unbounded {
            return Err("lowest band must be open towards -inf".to_string());
        }
        if last.upper != Bound::Unbounded {
            return Err("highest band must be open towards +inf".to_string());
        }

        for (i, band) in self.bands.iter().enumerate() {
            if band.penalty > 0.0 || !band.penalty.is_finite() {
                return Err(format!("band {i} has invalid penalty {}", band.penalty));
            }
            if band.deviation == Deviation::Ideal && band.penalty != 0.0 {
                return Err(format!("ideal band {i} carries a penalty"));
            }
            if let (Some(lo), Some(hi)) = (bound_value(band.lower), bound_value(band.upper)) {
                let closed = matches!(band.lower, Bound::Included(_))
                    && matches!(band.upper, Bound::Included(_));
                if lo > hi || (lo == hi && !closed) {
                    return Err(format!("band {i} is empty ({lo}..{hi})"));
                }
            }
        }

        for (i, pair) in self.bands.windows(2).enumerate() {
            let (left, right) = (&pair[0], &pair[1]);
            let joint = match (left.upper, right.lower) {
                (Bound::Included(a), Bound::Excluded(b)) | (Bound::Excluded(a), Bound::Included(b)) => {
                    (a == b).then_some(a)
                }
                _ => None,
            };
            if joint.is_none() {
                return Err(format!(
                    "bands {i} and {} must share one edge, included on exactly one side",
                    i + 1
                ));
            }
        }

        Ok(())
    }
}

fn bound_value(bound: Bound<f64>) -> Option<f64> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) => Some(v),
        Bound::Unbounded => None,
    }
}
