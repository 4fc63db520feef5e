use serde::{Deserialize, Serialize};

use crate::units::Probability;

/// Number of simulated months (July through March).
pub const MONTHS: usize = 9;

/// Number of segments in the study area.
pub const SEGMENTS: usize = 3;

/// Calendar month for each simulated month, in simulation order.
pub const CALENDAR_MONTHS: [u8; MONTHS] = [7, 8, 9, 10, 11, 12, 1, 2, 3];

/// A simulated month, identified by its position in the July..March season (1..=9).
///
/// Ordering follows the season, so December < January. Rain-rule comparisons
/// must use this ordering rather than calendar numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimMonth(u8);

impl SimMonth {
    pub const JULY: SimMonth = SimMonth(1);
    pub const OCTOBER: SimMonth = SimMonth(4);
    pub const MARCH: SimMonth = SimMonth(9);

    /// Build from a 1-based season index; `None` outside 1..=9.
    #[inline]
    pub fn new(index: u8) -> Option<Self> {
        (1..=MONTHS as u8).contains(&index).then_some(SimMonth(index))
    }

    /// 1-based season index.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// 0-based offset into per-month arrays.
    #[inline]
    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }

    #[inline]
    pub fn calendar(self) -> u8 {
        CALENDAR_MONTHS[self.offset()]
    }

    /// Map a calendar month (1..=12) back to the season; `None` for April..June.
    pub fn from_calendar(month: u8) -> Option<Self> {
        CALENDAR_MONTHS
            .iter()
            .position(|&m| m == month)
            .map(|pos| SimMonth(pos as u8 + 1))
    }

    pub fn all() -> impl Iterator<Item = SimMonth> {
        (1..=MONTHS as u8).map(SimMonth)
    }
}

/// Segment identifier (1-based, matching the results table columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(usize);

impl SegmentId {
    #[inline]
    pub fn new(value: usize) -> Self {
        SegmentId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }

    pub fn all() -> [SegmentId; SEGMENTS] {
        [SegmentId(1), SegmentId(2), SegmentId(3)]
    }

    /// Weather group the segment belongs to.
    pub fn group(&self) -> WeatherGroup {
        match self.0 {
            1 | 2 => WeatherGroup::Shared,
            _ => WeatherGroup::Independent,
        }
    }

    fn slot(&self) -> usize {
        self.0.clamp(1, SEGMENTS) - 1
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Segment {}", self.0)
    }
}

/// Segments exposed to the same weather sequence.
///
/// Segments 1 and 2 share weather, unit count, event counts and bad-outcome
/// probabilities; segment 2's unit failure probabilities are a noisy copy of
/// segment 1's. Segment 3 is drawn independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherGroup {
    Shared,
    Independent,
}

/// Draws shared by every segment of one weather group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupDraw {
    pub units: u32,
    pub weather: [u8; MONTHS],
    pub events_original: [u32; MONTHS],
    pub events_after_rain: [u32; MONTHS],
    pub gamma: [f64; MONTHS],
}

/// Per-unit, per-month failure probability given one hazard event. One row per unit.
pub type FailureMatrix = Vec<[f64; MONTHS]>;

/// All stochastic inputs of a single scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInput {
    pub shared: GroupDraw,
    pub independent: GroupDraw,
    pub rain_month: SimMonth,
    /// Indexed by segment slot (segment 1 at index 0).
    pub failure_probability: [FailureMatrix; SEGMENTS],
}

impl ScenarioInput {
    pub fn group(&self, segment: SegmentId) -> &GroupDraw {
        match segment.group() {
            WeatherGroup::Shared => &self.shared,
            WeatherGroup::Independent => &self.independent,
        }
    }

    pub fn failure_matrix(&self, segment: SegmentId) -> &FailureMatrix {
        &self.failure_probability[segment.slot()]
    }

    /// Drop the failure matrices and keep what the results table records.
    pub fn summarize(&self, output: ScenarioOutput) -> ScenarioRecord {
        ScenarioRecord {
            shared: self.shared,
            independent: self.independent,
            rain_month: self.rain_month,
            output,
        }
    }
}

/// Failure and compound failure + bad-outcome probability of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentOutcome {
    pub q: Probability,
    pub rho: Probability,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub segments: [SegmentOutcome; SEGMENTS],
}

impl ScenarioOutput {
    pub fn segment(&self, segment: SegmentId) -> SegmentOutcome {
        self.segments[segment.slot()]
    }

    /// The formulas do not force ρ ≤ q; callers flag rows where they diverge.
    pub fn rho_exceeds_q(&self, segment: SegmentId) -> bool {
        let outcome = self.segment(segment);
        outcome.rho > outcome.q
    }
}

/// One row of the aggregated results: input provenance plus outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub shared: GroupDraw,
    pub independent: GroupDraw,
    pub rain_month: SimMonth,
    pub output: ScenarioOutput,
}

/// Scenario records in call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub records: Vec<ScenarioRecord>,
}

impl AggregatedResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: ScenarioRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn q_column(&self, segment: SegmentId) -> Vec<f64> {
        q_column(&self.records, segment)
    }

    pub fn rho_column(&self, segment: SegmentId) -> Vec<f64> {
        rho_column(&self.records, segment)
    }
}

pub fn q_column(records: &[ScenarioRecord], segment: SegmentId) -> Vec<f64> {
    records
        .iter()
        .map(|r| r.output.segment(segment).q.value())
        .collect()
}

pub fn rho_column(records: &[ScenarioRecord], segment: SegmentId) -> Vec<f64> {
    records
        .iter()
        .map(|r| r.output.segment(segment).rho.value())
        .collect()
}
