//! Historical feature data and per store-item history windows

use crate::error::{ForecastError, Result};
use crate::features::{FeatureSchema, FeatureVector};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Key columns every dataset file must carry; all other columns are features
pub const STORE_COLUMN: &str = "store_nbr";
pub const ITEM_COLUMN: &str = "item_nbr";
pub const DATE_COLUMN: &str = "date";
pub const SALES_COLUMN: &str = "unit_sales";

/// One day of precomputed features and observed sales for a store-item pair
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub store: u32,
    pub item: u32,
    pub date: NaiveDate,
    pub features: FeatureVector,
    pub unit_sales: f64,
}

/// Historical feature table keyed by (store, item, date)
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<FeatureSchema>,
    rows: Vec<HistoryRow>,
}

impl Dataset {
    /// Build a dataset from rows that all share `schema`
    pub fn new(schema: Arc<FeatureSchema>, rows: Vec<HistoryRow>) -> Result<Self> {
        if let Some(row) = rows
            .iter()
            .find(|row| row.features.schema().names() != schema.names())
        {
            return Err(ForecastError::DataError(format!(
                "Row for store {}, item {} on {} does not follow the dataset schema",
                row.store, row.item, row.date
            )));
        }

        Ok(Self { schema, rows })
    }

    /// Load the dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load the dataset from any CSV source.
    ///
    /// Empty feature cells are read as NaN (missing); the model decides how
    /// to route them.
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                ForecastError::DataError(format!("Missing required column '{}'", name))
            })
        };
        let store_idx = column(STORE_COLUMN)?;
        let item_idx = column(ITEM_COLUMN)?;
        let date_idx = column(DATE_COLUMN)?;
        let sales_idx = column(SALES_COLUMN)?;

        let feature_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| ![store_idx, item_idx, date_idx, sales_idx].contains(idx))
            .map(|(idx, name)| (idx, name.to_string()))
            .collect();
        let schema = Arc::new(FeatureSchema::new(
            feature_columns.iter().map(|(_, name)| name.clone()),
        )?);

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let line = i + 2;
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let store = parse_key(field(store_idx), STORE_COLUMN, line)?;
            let item = parse_key(field(item_idx), ITEM_COLUMN, line)?;
            let date = parse_date(field(date_idx)).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Invalid date '{}' at line {}",
                    field(date_idx),
                    line
                ))
            })?;
            let unit_sales = field(sales_idx).parse::<f64>().map_err(|e| {
                ForecastError::DataError(format!("Invalid unit_sales at line {}: {}", line, e))
            })?;
            if !unit_sales.is_finite() {
                return Err(ForecastError::DataError(format!(
                    "Non-finite unit_sales '{}' at line {}",
                    field(sales_idx),
                    line
                )));
            }

            let values = feature_columns
                .iter()
                .map(|(idx, name)| parse_feature(field(*idx), name, line))
                .collect::<Result<Vec<f64>>>()?;

            rows.push(HistoryRow {
                store,
                item,
                date,
                features: FeatureVector::new(Arc::clone(&schema), values)?,
                unit_sales,
            });
        }

        Ok(Self { schema, rows })
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// History window for one store-item pair, see [`get_history`]
    pub fn history(
        &self,
        store: u32,
        item: u32,
        as_of: Option<NaiveDate>,
        max_days: usize,
    ) -> HistoryWindow {
        get_history(self, store, item, as_of, max_days)
    }
}

fn parse_key(value: &str, column: &str, line: usize) -> Result<u32> {
    value.parse::<u32>().map_err(|e| {
        ForecastError::DataError(format!("Invalid {} '{}' at line {}: {}", column, value, line, e))
    })
}

fn parse_feature(value: &str, column: &str, line: usize) -> Result<f64> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|e| {
        ForecastError::DataError(format!("Invalid {} '{}' at line {}: {}", column, value, line, e))
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// One entry of a history window
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub features: FeatureVector,
    pub unit_sales: f64,
}

/// Ascending, bounded run of history for a single store-item pair
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    store: u32,
    item: u32,
    entries: Vec<HistoryEntry>,
}

impl HistoryWindow {
    pub fn store(&self) -> u32 {
        self.store
    }

    pub fn item(&self) -> u32 {
        self.item
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last known entry, the starting point of a forecast
    pub fn seed(&self) -> Result<&HistoryEntry> {
        self.entries.last().ok_or(ForecastError::EmptyHistoryError {
            store: self.store,
            item: self.item,
        })
    }

    /// Up to `n` most recent observed sales, oldest first
    pub fn recent_observed(&self, n: usize) -> Vec<f64> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].iter().map(|e| e.unit_sales).collect()
    }

    /// `(date, observed sales)` pairs in date order
    pub fn observed(&self) -> Vec<(NaiveDate, f64)> {
        self.entries.iter().map(|e| (e.date, e.unit_sales)).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.entries.iter().map(|e| e.date).collect()
    }

    /// First and last date covered
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// Select the history of one store-item pair.
///
/// Rows dated after `as_of` are dropped, the rest are sorted by date and
/// only the newest `max_days` are kept. No match gives an empty window.
pub fn get_history(
    dataset: &Dataset,
    store: u32,
    item: u32,
    as_of: Option<NaiveDate>,
    max_days: usize,
) -> HistoryWindow {
    let mut entries: Vec<HistoryEntry> = dataset
        .rows
        .iter()
        .filter(|row| row.store == store && row.item == item)
        .filter(|row| as_of.map_or(true, |cutoff| row.date <= cutoff))
        .map(|row| HistoryEntry {
            date: row.date,
            features: row.features.clone(),
            unit_sales: row.unit_sales,
        })
        .collect();

    entries.sort_by_key(|entry| entry.date);

    if entries.len() > max_days {
        entries.drain(..entries.len() - max_days);
    }

    HistoryWindow {
        store,
        item,
        entries,
    }
}
