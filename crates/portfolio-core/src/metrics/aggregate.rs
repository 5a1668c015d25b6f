//! Aggregate project metrics and the traffic light

use serde::{Deserialize, Serialize};

/// Deviation magnitude below which a project is green
pub const GREEN_LIMIT: u32 = 5;

/// Deviation magnitude up to which a project is yellow
pub const YELLOW_LIMIT: u32 = 8;

/// Three-level health indicator derived from deviation magnitude
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrafficLight {
    /// |deviation| < 5
    Green,
    /// 5 <= |deviation| <= 8
    Yellow,
    /// |deviation| > 8
    Red,
}

impl TrafficLight {
    /// Classify a deviation in percentage points.
    ///
    /// Used for both stage-level and project-level coloring.
    pub fn from_deviation(deviation: i32) -> Self {
        match deviation.unsigned_abs() {
            d if d < GREEN_LIMIT => TrafficLight::Green,
            d if d <= YELLOW_LIMIT => TrafficLight::Yellow,
            _ => TrafficLight::Red,
        }
    }

    /// Get the display string for this indicator
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLight::Green => "Green",
            TrafficLight::Yellow => "Yellow",
            TrafficLight::Red => "Red",
        }
    }
}

impl std::fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Project-level progress summary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Planned progress (0-100)
    pub planned_percent: u8,
    /// Actual progress (0-100)
    pub actual_percent: u8,
    /// planned - actual; positive means behind plan
    pub deviation: i32,
    pub traffic_light: TrafficLight,
}

impl AggregateMetrics {
    /// Build from planned and actual percentages
    pub fn new(planned_percent: u8, actual_percent: u8) -> Self {
        let deviation = i32::from(planned_percent) - i32::from(actual_percent);
        Self {
            planned_percent,
            actual_percent,
            deviation,
            traffic_light: TrafficLight::from_deviation(deviation),
        }
    }

    /// Metrics of a project with no stages
    pub fn empty() -> Self {
        Self::new(0, 0)
    }
}

impl Default for AggregateMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

/// A stage's contribution to project actual progress, rounded per stage.
///
/// `actual_percent` is clamped into 0-100 first.
pub fn actual_contribution(actual_percent: f64, weight: u32) -> u32 {
    let actual = crate::clamp_percent(actual_percent);
    (actual * weight as f64 / 100.0).round() as u32
}

/// Sum per-stage contributions into project actual progress, clamped to 100
pub fn actual_percent(contributions: impl IntoIterator<Item = u32>) -> u8 {
    contributions.into_iter().sum::<u32>().min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_light_thresholds() {
        assert_eq!(TrafficLight::from_deviation(0), TrafficLight::Green);
        assert_eq!(TrafficLight::from_deviation(4), TrafficLight::Green);
        assert_eq!(TrafficLight::from_deviation(-4), TrafficLight::Green);
        assert_eq!(TrafficLight::from_deviation(5), TrafficLight::Yellow);
        assert_eq!(TrafficLight::from_deviation(-5), TrafficLight::Yellow);
        assert_eq!(TrafficLight::from_deviation(8), TrafficLight::Yellow);
        assert_eq!(TrafficLight::from_deviation(-8), TrafficLight::Yellow);
        assert_eq!(TrafficLight::from_deviation(9), TrafficLight::Red);
        assert_eq!(TrafficLight::from_deviation(-100), TrafficLight::Red);
        assert_eq!(TrafficLight::from_deviation(i32::MIN), TrafficLight::Red);
    }

    #[test]
    fn deviation_is_planned_minus_actual() {
        let ahead = AggregateMetrics::new(40, 52);
        assert_eq!(ahead.deviation, -12);
        assert_eq!(ahead.traffic_light, TrafficLight::Red);

        let behind = AggregateMetrics::new(60, 54);
        assert_eq!(behind.deviation, 6);
        assert_eq!(behind.traffic_light, TrafficLight::Yellow);
    }

    #[test]
    fn empty_is_green_zero() {
        let empty = AggregateMetrics::empty();
        assert_eq!(empty.planned_percent, 0);
        assert_eq!(empty.actual_percent, 0);
        assert_eq!(empty.deviation, 0);
        assert_eq!(empty.traffic_light, TrafficLight::Green);
    }

    #[test]
    fn per_stage_rounding() {
        // 45% of a 33-point stage is 14.85 -> 15
        assert_eq!(actual_contribution(45.0, 33), 15);
        // out-of-range input is clamped
        assert_eq!(actual_contribution(250.0, 20), 20);
        assert_eq!(actual_contribution(-10.0, 20), 0);
        // 50% of three 33-point stages: 17 each, 51 total where a single
        // final rounding of 49.5 would give 50
        let terms = [33, 33, 33].map(|w| actual_contribution(50.0, w));
        assert_eq!(terms, [17, 17, 17]);
        assert_eq!(actual_percent(terms), 51);
    }

    #[test]
    fn actual_is_capped() {
        assert_eq!(actual_percent([60, 60]), 100);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", TrafficLight::Yellow), "Yellow");
    }
}
