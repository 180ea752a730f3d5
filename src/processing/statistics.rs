use crate::data::record::{Attribute, Dataset};

/// Summary statistics for one attribute of the dataset
#[derive(Debug, Clone)]
pub struct AttributeStats {
    pub attribute: Attribute,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl AttributeStats {
    /// Compute statistics over the finite values of an attribute.
    pub fn compute(dataset: &Dataset, attribute: Attribute) -> Option<Self> {
        let mut vals: Vec<f64> = dataset
            .values(attribute)
            .into_iter()
            .filter(|v| v.is_finite())
            .collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = vals.iter().sum::<f64>() / count as f64;

        vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };

        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(AttributeStats {
            attribute,
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }

    /// Panel heading for the summarised attribute.
    pub fn title(&self) -> &'static str {
        self.attribute.axis_label()
    }

    /// Rows for the statistics panel: (name, formatted value).
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Count", self.count.to_string()),
            ("Min", format!("{:.2}", self.min)),
            ("Max", format!("{:.2}", self.max)),
            ("Mean", format!("{:.2}", self.mean)),
            ("Median", format!("{:.2}", self.median)),
            ("Std Dev", format!("{:.2}", self.std_dev)),
        ]
    }
}

/// Pearson correlation between two attributes over rows where both are finite.
pub fn pearson(dataset: &Dataset, x: Attribute, y: Attribute) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = dataset
        .records()
        .iter()
        .map(|r| (r.value(x), r.value(y)))
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(a, b) in &pairs {
        cov += (a - mean_x) * (b - mean_y);
        var_x += (a - mean_x).powi(2);
        var_y += (b - mean_y).powi(2);
    }

    let denom = (var_x * var_y).sqrt();
    if denom < 1e-15 {
        return None;
    }
    Some(cov / denom)
}
