//! Per-segment distribution analysis of an accumulated results table.

use grisk_core::{q_column, rho_column, GriskError, GriskResult, ScenarioRecord, SegmentId};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};
use tracing::{info, warn};

use crate::normality::{shapiro_wilk, ShapiroWilk};

/// Summary of one probability column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); 0 for fewer than two values
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p05: f64,
    pub p95: f64,
    /// `None` when the column is too short or constant
    pub shapiro_wilk: Option<ShapiroWilk>,
}

impl DistributionSummary {
    pub fn from_values(values: &[f64]) -> GriskResult<Self> {
        if values.is_empty() {
            return Err(GriskError::Statistics(
                "cannot summarize an empty column".into(),
            ));
        }
        let count = values.len();
        let mean = Statistics::mean(values.iter());
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Summation residue would leave a constant column with std_dev ~1e-17
        let std_dev = if count < 2 || min == max {
            0.0
        } else {
            Statistics::std_dev(values.iter())
        };

        let mut data = Data::new(values.to_vec());
        let median = data.quantile(0.5);
        let p05 = data.quantile(0.05);
        let p95 = data.quantile(0.95);

        let shapiro_wilk = match shapiro_wilk(values) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("normality test skipped: {e}");
                None
            }
        };

        Ok(Self {
            count,
            mean,
            std_dev,
            min,
            max,
            median,
            p05,
            p95,
            shapiro_wilk,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub segment: usize,
    pub q: DistributionSummary,
    pub rho: DistributionSummary,
    /// Rows where rho exceeds q for this segment
    pub rho_exceeds_q: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub scenarios: usize,
    pub segments: Vec<SegmentAnalysis>,
}

impl AnalysisReport {
    pub fn segment(&self, segment: SegmentId) -> Option<&SegmentAnalysis> {
        self.segments.iter().find(|s| s.segment == segment.value())
    }
}

/// Analyze q and rho for every segment over all rows.
pub fn analyze_segments(records: &[ScenarioRecord]) -> GriskResult<AnalysisReport> {
    if records.is_empty() {
        return Err(GriskError::Statistics(
            "results table has no rows to analyze".into(),
        ));
    }

    let mut segments = Vec::with_capacity(SegmentId::all().len());
    for segment in SegmentId::all() {
        let q = DistributionSummary::from_values(&q_column(records, segment))?;
        let rho = DistributionSummary::from_values(&rho_column(records, segment))?;
        let rho_exceeds_q = records
            .iter()
            .filter(|r| r.output.rho_exceeds_q(segment))
            .count();
        if rho_exceeds_q > 0 {
            warn!(
                segment = segment.value(),
                rows = rho_exceeds_q,
                "rho exceeds q in some scenarios"
            );
        }
        info!(
            segment = segment.value(),
            q_mean = q.mean,
            rho_mean = rho.mean,
            "segment analyzed"
        );
        segments.push(SegmentAnalysis {
            segment: segment.value(),
            q,
            rho,
            rho_exceeds_q,
        });
    }

    Ok(AnalysisReport {
        scenarios: records.len(),
        segments,
    })
}
