//! Tabular output of forecasts and history
//!
//! CSV files keep full precision; rounding to two decimals only happens in
//! [`display_rows`], which feeds on-screen tables.

use crate::data::HistoryWindow;
use crate::error::{ForecastError, Result};
use crate::forecaster::ForecastResult;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ForecastRecord {
    date: NaiveDate,
    predicted_sales: f64,
}

#[derive(Debug, Serialize)]
struct HistoryRecord {
    date: NaiveDate,
    unit_sales: f64,
}

/// Write `date,predicted_sales` rows in date order
pub fn write_forecast_csv<W: Write>(result: &ForecastResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in result.iter() {
        csv_writer.serialize(ForecastRecord {
            date: point.date,
            predicted_sales: point.value,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the forecast CSV to a file
pub fn write_forecast_csv_file<P: AsRef<Path>>(result: &ForecastResult, path: P) -> Result<()> {
    let file = File::create(path)?;
    write_forecast_csv(result, file)
}

/// The forecast CSV as a string, ready for download
pub fn to_csv_string(result: &ForecastResult) -> Result<String> {
    let mut buffer = Vec::new();
    write_forecast_csv(result, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ForecastError::DataError(e.to_string()))
}

/// Write `date,unit_sales` rows for observed history
pub fn write_history_csv<W: Write>(history: &HistoryWindow, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in history.entries() {
        csv_writer.serialize(HistoryRecord {
            date: entry.date,
            unit_sales: entry.unit_sales,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Whether a display row is observed or predicted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Actual,
    Forecast,
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKind::Actual => f.pad("actual"),
            RowKind::Forecast => f.pad("forecast"),
        }
    }
}

/// One line of a combined history + forecast table
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub date: NaiveDate,
    pub kind: RowKind,
    /// Rounded to two decimals
    pub value: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// History followed by forecast, rounded for display
pub fn display_rows(history: &HistoryWindow, result: &ForecastResult) -> Vec<DisplayRow> {
    let actual = history.entries().iter().map(|e| DisplayRow {
        date: e.date,
        kind: RowKind::Actual,
        value: round2(e.unit_sales),
    });
    let forecast = result.iter().map(|p| DisplayRow {
        date: p.date,
        kind: RowKind::Forecast,
        value: round2(p.value),
    });
    actual.chain(forecast).collect()
}
