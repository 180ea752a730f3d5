use thiserror::Error;

use crate::data::record::{Attribute, Axis};

/// Errors raised while reading the dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("No data rows found")]
    Empty,
}

/// Errors raised by the chart pipeline and its configuration.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("{attribute} cannot be shown on the {axis} axis")]
    WrongAxis { attribute: Attribute, axis: Axis },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// No finite values to build a domain from
    #[error("No numeric values for {0}")]
    EmptyDomain(Attribute),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Cannot parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
