//! Plain-text tables for terminal output

use demand_forecast::artifacts::ModelMetadata;
use demand_forecast::evaluation::Backtest;
use demand_forecast::export::{DisplayRow, RowKind};
use demand_forecast::lookup::StoreItem;

/// Store list with the number of items each carries
pub fn stores_table(stores: &[(u32, usize)]) -> String {
    let mut out = format!("{:>6}  {:>6}\n", "store", "items");
    for (store, items) in stores {
        out.push_str(&format!("{:>6}  {:>6}\n", store, items));
    }
    out
}

pub fn items_table(items: &[StoreItem]) -> String {
    let mut out = format!("{:>10}  {:<28}  {:>9}\n", "item", "family", "avg_sales");
    for entry in items {
        out.push_str(&format!(
            "{:>10}  {:<28}  {:>9.2}\n",
            entry.item, entry.family, entry.avg_sales
        ));
    }
    out
}

/// Combined history and forecast, followed by the forecast total
pub fn forecast_table(rows: &[DisplayRow]) -> String {
    let mut out = format!("{:<10}  {:<8}  {:>10}\n", "date", "kind", "units");
    for row in rows {
        out.push_str(&format!(
            "{:<10}  {:<8}  {:>10.2}\n",
            row.date.to_string(),
            row.kind,
            row.value
        ));
    }

    let total: f64 = rows
        .iter()
        .filter(|row| row.kind == RowKind::Forecast)
        .map(|row| row.value)
        .sum();
    out.push_str(&format!("{:<10}  {:<8}  {:>10.2}\n", "total", "forecast", total));
    out
}

pub fn backtest_table(run: &Backtest) -> String {
    let mut out = format!(
        "{:<10}  {:>10}  {:>10}  {:>10}\n",
        "date", "forecast", "actual", "error"
    );
    for (point, actual) in run.forecast.iter().zip(&run.actual) {
        out.push_str(&format!(
            "{:<10}  {:>10.2}  {:>10.2}  {:>10.2}\n",
            point.date.to_string(),
            point.value,
            actual,
            point.value - actual
        ));
    }
    out.push('\n');
    out.push_str(&run.metrics.to_string());
    out
}

/// Model description from the metadata document
pub fn model_info(metadata: &ModelMetadata, scaled: bool) -> String {
    let info = &metadata.model;
    let mut out = format!("Model:      {}\n", info.model_type);
    out.push_str(&format!("Features:   {}\n", metadata.feature_columns.len()));
    out.push_str(&format!("Scaler:     {}\n", if scaled { "yes" } else { "no" }));

    if let Some(period) = &info.training_period {
        out.push_str(&format!("Training:   {} to {}\n", period.start, period.end));
    }
    if let Some(samples) = info.training_samples {
        out.push_str(&format!("Samples:    {}\n", samples));
    }
    if let Some(metrics) = &info.metrics {
        out.push_str("Validation metrics:\n");
        out.push_str(&metrics.to_string());
    }
    if !info.hyperparameters.is_empty() {
        out.push_str("Hyperparameters:\n");
        for (name, value) in &info.hyperparameters {
            out.push_str(&format!("  {}: {}\n", name, value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn forecast_table_sums_forecast_rows_only() {
        let date = |d| NaiveDate::from_ymd_opt(2014, 1, d).unwrap();
        let rows = vec![
            DisplayRow {
                date: date(1),
                kind: RowKind::Actual,
                value: 100.0,
            },
            DisplayRow {
                date: date(2),
                kind: RowKind::Forecast,
                value: 1.25,
            },
            DisplayRow {
                date: date(3),
                kind: RowKind::Forecast,
                value: 2.5,
            },
        ];

        let table = forecast_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "2014-01-01  actual        100.00");
        assert_eq!(lines[4], "total       forecast        3.75");
    }

    #[test]
    fn stores_table_lists_each_store() {
        let table = stores_table(&[(24, 3), (51, 0)]);
        assert_eq!(table, " store   items\n    24       3\n    51       0\n");
    }
}
