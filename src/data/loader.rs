use std::io::Read;
use std::path::Path;

use crate::data::record::{Attribute, Dataset, Record};
use crate::error::LoadError;

/// Header positions of the required columns.
struct ColumnIndex {
    state: usize,
    abbr: usize,
    /// Indexed in `Attribute::ALL` order.
    numeric: [usize; 6],
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(LoadError::MissingColumn(name))
        };

        let state = find("state")?;
        let abbr = find("abbr")?;
        let mut numeric = [0usize; 6];
        for (slot, attr) in numeric.iter_mut().zip(Attribute::ALL) {
            *slot = find(attr.column())?;
        }
        Ok(Self { state, abbr, numeric })
    }

    fn record(&self, row: &csv::StringRecord, row_number: usize) -> Record {
        let text = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();

        let mut values = [f64::NAN; 6];
        for ((value, &idx), attr) in values.iter_mut().zip(&self.numeric).zip(Attribute::ALL) {
            let cell = row.get(idx);
            match coerce_numeric(cell) {
                Some(v) => *value = v,
                None => {
                    tracing::warn!(
                        row = row_number,
                        column = attr.column(),
                        "Malformed numeric cell {:?}, using NaN",
                        cell.unwrap_or("<missing>")
                    );
                }
            }
        }

        Record {
            state: text(self.state),
            abbr: text(self.abbr),
            poverty: values[0],
            age: values[1],
            income: values[2],
            healthcare: values[3],
            obesity: values[4],
            smokes: values[5],
        }
    }
}

/// Coerce a CSV cell to a number.
/// An empty cell counts as zero; an absent or unparsable cell yields `None`.
pub fn coerce_numeric(cell: Option<&str>) -> Option<f64> {
    let trimmed = cell?.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}

/// Load the dataset from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let content = std::fs::read(path)?;

    // Fall back to latin1 when the file is not valid UTF-8.
    let text = String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());

    let mut dataset = parse_csv(text.as_bytes())?;
    dataset.source = Some(path.to_path_buf());
    tracing::info!("Loaded {} records from {:?}", dataset.len(), path);
    Ok(dataset)
}

/// Parse CSV text with a header row into a dataset.
pub fn parse_csv<R: Read>(input: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_number, result) in reader.records().enumerate() {
        match result {
            Ok(row) => {
                if row.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                records.push(columns.record(&row, row_number + 1));
            }
            Err(e) => {
                tracing::warn!(row = row_number + 1, "Skipping unreadable row: {e}");
            }
        }
    }

    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(Dataset::new(records, None))
}
