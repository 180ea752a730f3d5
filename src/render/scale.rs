use serde::{Deserialize, Serialize};

use crate::data::record::{Attribute, Dataset};
use crate::error::ChartError;

/// How the raw `[min, max]` extent of an attribute is widened into a domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PaddingRule {
    /// `[min * lower, max * upper]`
    Multiplicative { lower: f64, upper: f64 },
    /// `[min - lower, max + upper]`
    Offset { lower: f64, upper: f64 },
}

impl Default for PaddingRule {
    fn default() -> Self {
        PaddingRule::Multiplicative { lower: 0.8, upper: 1.2 }
    }
}

impl PaddingRule {
    pub fn pad(&self, min: f64, max: f64) -> (f64, f64) {
        match *self {
            PaddingRule::Multiplicative { lower, upper } => (min * lower, max * upper),
            PaddingRule::Offset { lower, upper } => (min - lower, max + upper),
        }
    }
}

/// Linear map from a data domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Span too small to distinguish from the endpoints' rounding error.
    fn is_degenerate(&self) -> bool {
        let (d0, d1) = self.domain;
        (d1 - d0).abs() <= f64::EPSILON * d0.abs().max(d1.abs())
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        let t = (value - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }

    /// Nice tick values (1, 2, 5 x 10^n steps) inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let min = self.domain.0.min(self.domain.1);
        let max = self.domain.0.max(self.domain.1);
        let span = max - min;
        if count == 0 || span <= 0.0 || !span.is_finite() {
            return Vec::new();
        }

        let raw_step = span / count as f64;
        let order = 10f64.powf(raw_step.log10().floor());
        let normalized = raw_step / order;
        let step = if normalized <= 1.0 {
            order
        } else if normalized <= 2.0 {
            2.0 * order
        } else if normalized <= 5.0 {
            5.0 * order
        } else {
            10.0 * order
        };

        let start = (min / step).ceil() as i64;
        let end = (max / step).floor() as i64;
        (start..=end).map(|i| i as f64 * step).collect()
    }
}

/// Build the scale for `attribute` over the dataset's padded extent.
pub fn build_scale(
    dataset: &Dataset,
    attribute: Attribute,
    padding: PaddingRule,
    range: (f64, f64),
) -> Result<LinearScale, ChartError> {
    let (min, max) = dataset
        .extent(attribute)
        .ok_or(ChartError::EmptyDomain(attribute))?;
    let domain = padding.pad(min, max);
    tracing::debug!(%attribute, ?domain, ?range, "Built scale");
    Ok(LinearScale::new(domain, range))
}

/// Format a numeric value for axis tick labels.
pub fn format_tick_value(val: f64) -> String {
    if val.abs() >= 1e6 || (val != 0.0 && val.abs() < 1e-3) {
        format!("{val:.2e}")
    } else if val == 0.0 {
        "0".to_string()
    } else {
        let s = format!("{val:.6}");
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::sample_record;
    use approx::assert_relative_eq;

    fn two_incomes() -> Dataset {
        Dataset::new(
            vec![
                sample_record("A", "AA", [10.0, 30.0, 30000.0, 8.0, 20.0, 15.0]),
                sample_record("B", "BB", [12.0, 35.0, 60000.0, 9.0, 25.0, 18.0]),
            ],
            None,
        )
    }

    #[test]
    fn padded_extremes_map_to_range_endpoints() {
        let ds = two_incomes();
        let scale = build_scale(&ds, Attribute::Income, PaddingRule::default(), (0.0, 860.0)).unwrap();
        assert_relative_eq!(scale.domain.0, 24000.0);
        assert_relative_eq!(scale.domain.1, 72000.0);
        assert_relative_eq!(scale.apply(24000.0), 0.0);
        assert_relative_eq!(scale.apply(72000.0), 860.0);
    }

    #[test]
    fn scale_is_monotonic_for_inverted_range() {
        let ds = two_incomes();
        let rule = PaddingRule::Offset { lower: 1.0, upper: 1.0 };
        let scale = build_scale(&ds, Attribute::Obesity, rule, (400.0, 0.0)).unwrap();
        assert_eq!(scale.domain, (19.0, 26.0));
        assert_relative_eq!(scale.apply(19.0), 400.0);
        assert_relative_eq!(scale.apply(26.0), 0.0);
        let mut prev = f64::INFINITY;
        for i in 0..=14 {
            let px = scale.apply(19.0 + i as f64 * 0.5);
            assert!(px < prev);
            prev = px;
        }
    }

    #[test]
    fn smaller_income_maps_to_smaller_pixel_x() {
        let ds = two_incomes();
        let scale = build_scale(&ds, Attribute::Income, PaddingRule::default(), (0.0, 860.0)).unwrap();
        let a = scale.apply(ds.records()[0].income);
        let b = scale.apply(ds.records()[1].income);
        assert!(a < b);
    }

    #[test]
    fn degenerate_domain_maps_to_range_midpoint() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert_relative_eq!(scale.apply(5.0), 50.0);
    }

    #[test]
    fn tiny_but_real_span_is_not_degenerate() {
        let scale = LinearScale::new((1e-20, 2e-20), (0.0, 100.0));
        assert_relative_eq!(scale.apply(1.5e-20), 50.0, epsilon = 1e-9);
        assert_relative_eq!(scale.apply(2e-20), 100.0, epsilon = 1e-9);

        let zero = LinearScale::new((0.0, 0.0), (0.0, 100.0));
        assert_relative_eq!(zero.apply(0.0), 50.0);
    }

    #[test]
    fn empty_dataset_has_no_domain() {
        let err = build_scale(&Dataset::default(), Attribute::Age, PaddingRule::default(), (0.0, 1.0));
        assert!(matches!(err, Err(ChartError::EmptyDomain(Attribute::Age))));
    }

    #[test]
    fn ticks_are_nice_and_inside_domain() {
        let scale = LinearScale::new((24000.0, 72000.0), (0.0, 860.0));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.first().copied(), Some(25000.0));
        assert_eq!(ticks.last().copied(), Some(70000.0));
        assert!(ticks.windows(2).all(|w| (w[1] - w[0] - 5000.0).abs() < 1e-9));
    }

    #[test]
    fn tick_labels_trim_trailing_zeros() {
        assert_eq!(format_tick_value(25.0), "25");
        assert_eq!(format_tick_value(12.5), "12.5");
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(2_500_000.0), "2.50e6");
    }
}
