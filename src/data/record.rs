use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Attributes selectable on this axis, in label order.
    pub fn attributes(&self) -> &'static [Attribute] {
        match self {
            Axis::X => &[Attribute::Poverty, Attribute::Age, Attribute::Income],
            Axis::Y => &[Attribute::Obesity, Attribute::Smokes, Attribute::Healthcare],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// One of the six numeric fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Poverty,
    Age,
    Income,
    Healthcare,
    Obesity,
    Smokes,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Poverty,
        Attribute::Age,
        Attribute::Income,
        Attribute::Healthcare,
        Attribute::Obesity,
        Attribute::Smokes,
    ];

    pub fn axis(&self) -> Axis {
        match self {
            Attribute::Poverty | Attribute::Age | Attribute::Income => Axis::X,
            Attribute::Healthcare | Attribute::Obesity | Attribute::Smokes => Axis::Y,
        }
    }

    /// CSV column name; also the value carried by the axis label.
    pub fn column(&self) -> &'static str {
        match self {
            Attribute::Poverty => "poverty",
            Attribute::Age => "age",
            Attribute::Income => "income",
            Attribute::Healthcare => "healthcare",
            Attribute::Obesity => "obesity",
            Attribute::Smokes => "smokes",
        }
    }

    /// Clickable axis label text.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Attribute::Poverty => "Poverty Rate (%)",
            Attribute::Age => "Median Age",
            Attribute::Income => "Median Household Income",
            Attribute::Healthcare => "Lack of Healthcare (%)",
            Attribute::Obesity => "Obesity Rate (%)",
            Attribute::Smokes => "Smoking Rate (%)",
        }
    }

    pub fn tooltip_label(&self) -> &'static str {
        match self {
            Attribute::Poverty => "Poverty Rate",
            Attribute::Age => "Median Age",
            Attribute::Income => "Median Household Income",
            Attribute::Healthcare => "Lack of Healthcare Rate",
            Attribute::Obesity => "Obesity Rate",
            Attribute::Smokes => "Smoking Rate",
        }
    }

    /// Format a value the way the tooltip shows it.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Attribute::Income => format!("${value}"),
            Attribute::Age => format!("{value}"),
            _ => format!("{value} %"),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Attribute {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| a.column() == wanted)
            .ok_or_else(|| ChartError::UnknownAttribute(s.to_string()))
    }
}

/// One row of the dataset: a single geographic unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub state: String,
    pub abbr: String,
    pub poverty: f64,
    pub age: f64,
    pub income: f64,
    pub healthcare: f64,
    pub obesity: f64,
    pub smokes: f64,
}

impl Record {
    pub fn value(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Poverty => self.poverty,
            Attribute::Age => self.age,
            Attribute::Income => self.income,
            Attribute::Healthcare => self.healthcare,
            Attribute::Obesity => self.obesity,
            Attribute::Smokes => self.smokes,
        }
    }
}

/// The loaded records. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    pub source: Option<PathBuf>,
}

impl Dataset {
    pub fn new(records: Vec<Record>, source: Option<PathBuf>) -> Self {
        Self { records, source }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn values(&self, attribute: Attribute) -> Vec<f64> {
        self.records.iter().map(|r| r.value(attribute)).collect()
    }

    /// Min and max over the finite values of an attribute.
    pub fn extent(&self, attribute: Attribute) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in self.records.iter().map(|r| r.value(attribute)) {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(state: &str, abbr: &str, values: [f64; 6]) -> Record {
    Record {
        state: state.to_string(),
        abbr: abbr.to_string(),
        poverty: values[0],
        age: values[1],
        income: values[2],
        healthcare: values[3],
        obesity: values[4],
        smokes: values[5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_attribute_belongs_to_exactly_one_axis() {
        for attr in Attribute::ALL {
            let axis = attr.axis();
            assert!(axis.attributes().contains(&attr));
            let other = if axis == Axis::X { Axis::Y } else { Axis::X };
            assert!(!other.attributes().contains(&attr));
        }
    }

    #[test]
    fn attribute_parses_from_column_name() {
        assert_eq!("income".parse::<Attribute>().unwrap(), Attribute::Income);
        assert_eq!(" Smokes ".parse::<Attribute>().unwrap(), Attribute::Smokes);
        assert!(matches!(
            "height".parse::<Attribute>(),
            Err(ChartError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn extent_skips_non_finite_values() {
        let ds = Dataset::new(
            vec![
                sample_record("A", "AA", [10.0, 30.0, 40000.0, 8.0, 25.0, 15.0]),
                sample_record("B", "BB", [f64::NAN, 40.0, 50000.0, 9.0, 30.0, 20.0]),
                sample_record("C", "CC", [14.0, 35.0, 60000.0, 10.0, 35.0, 18.0]),
            ],
            None,
        );
        assert_eq!(ds.extent(Attribute::Poverty), Some((10.0, 14.0)));
        assert_eq!(ds.extent(Attribute::Income), Some((40000.0, 60000.0)));
    }

    #[test]
    fn extent_of_empty_dataset_is_none() {
        assert_eq!(Dataset::default().extent(Attribute::Age), None);
    }

    #[test]
    fn value_formatting_follows_attribute_kind() {
        assert_eq!(Attribute::Income.format_value(52000.0), "$52000");
        assert_eq!(Attribute::Age.format_value(38.5), "38.5");
        assert_eq!(Attribute::Poverty.format_value(12.3), "12.3 %");
    }
}
