mod common;

use chrono::Days;
use common::{date, synthetic_sales, write_dataset_csv};
use demand_forecast::data::Dataset;
use demand_forecast::features::names;
use demand_forecast::{get_history, ForecastError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sixty_day_dataset() -> (TempDir, Dataset) {
    let dir = TempDir::new().unwrap();
    let path = write_dataset_csv(dir.path(), 24, 105574, date(2014, 1, 1), 60);
    let dataset = Dataset::from_csv(path).unwrap();
    (dir, dataset)
}

#[test]
fn test_history_keeps_latest_days_in_order() {
    let (_dir, dataset) = sixty_day_dataset();
    assert_eq!(dataset.len(), 60);

    let window = get_history(&dataset, 24, 105574, None, 30);
    assert_eq!(window.len(), 30);

    let dates = window.dates();
    assert_eq!(dates[0], date(2014, 1, 31));
    assert_eq!(dates[29], date(2014, 3, 1));
    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_history_respects_as_of() {
    let (_dir, dataset) = sixty_day_dataset();

    let window = get_history(&dataset, 24, 105574, Some(date(2014, 1, 15)), 180);
    assert_eq!(window.len(), 15);
    assert_eq!(
        window.date_range(),
        Some((date(2014, 1, 1), date(2014, 1, 15)))
    );
    assert!(window.dates().iter().all(|d| *d <= date(2014, 1, 15)));
}

#[test]
fn test_unknown_pair_gives_empty_window() {
    let (_dir, dataset) = sixty_day_dataset();

    let window = get_history(&dataset, 99, 1, None, 180);
    assert!(window.is_empty());
    assert_eq!(window.date_range(), None);
    assert!(matches!(
        window.seed(),
        Err(ForecastError::EmptyHistoryError { store: 99, item: 1 })
    ));
}

#[test]
fn test_recent_observed_tracks_sales_column() {
    let (_dir, dataset) = sixty_day_dataset();
    let window = dataset.history(24, 105574, None, 180);

    let expected: Vec<f64> = (50..60).map(synthetic_sales).collect();
    assert_eq!(window.recent_observed(10), expected);
    assert_eq!(window.recent_observed(500).len(), 60);
}

#[test]
fn test_dataset_reads_shuffled_columns_by_name() {
    let (_dir, dataset) = sixty_day_dataset();
    // Columns were written in reverse order
    assert_eq!(dataset.schema().names().first().map(String::as_str), Some(names::PERISHABLE));

    let first = &dataset.rows()[0];
    assert!(first.features.get(names::UNIT_SALES_LAG1).unwrap().is_nan());
    assert_eq!(first.features.get(names::STORE_CLUSTER), Some(10.0));

    let tenth = &dataset.rows()[9];
    assert_eq!(tenth.features.get(names::UNIT_SALES_LAG1), Some(synthetic_sales(8)));
    assert_eq!(
        tenth.date,
        date(2014, 1, 1).checked_add_days(Days::new(9)).unwrap()
    );
}

#[test]
fn test_rows_for_several_pairs_are_separated() {
    let csv = "\
store_nbr,item_nbr,date,unit_sales,unit_sales_lag1
24,1,2014-01-03,3,2
24,2,2014-01-03,30,20
24,1,2014-01-01,1,0
26,1,2014-01-02,7,6
24,1,2014-01-02,2,1
";
    let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

    let window = get_history(&dataset, 24, 1, None, 180);
    assert_eq!(window.recent_observed(30), vec![1.0, 2.0, 3.0]);
    assert_eq!(window.seed().unwrap().date, date(2014, 1, 3));

    assert_eq!(get_history(&dataset, 24, 2, None, 180).len(), 1);
    assert_eq!(get_history(&dataset, 26, 1, None, 180).len(), 1);
}

#[test]
fn test_malformed_rows_report_line() {
    let csv = "\
store_nbr,item_nbr,date,unit_sales,onpromotion
24,1,2014-01-01,3,0
24,1,not-a-date,3,0
";
    let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
    match err {
        ForecastError::DataError(msg) => assert!(msg.contains("line 3")),
        other => panic!("Expected DataError, got {:?}", other),
    }

    let csv = "\
store_nbr,item_nbr,date,unit_sales,onpromotion
24,1,2014-01-01,3,yes
";
    assert!(matches!(
        Dataset::from_reader(csv.as_bytes()),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_non_finite_sales_are_rejected() {
    for bad in ["nan", "inf", "-inf"] {
        let csv = format!(
            "store_nbr,item_nbr,date,unit_sales,onpromotion\n\
             24,1,2014-01-01,3,0\n\
             24,1,2014-01-02,{},0\n",
            bad
        );
        match Dataset::from_reader(csv.as_bytes()).unwrap_err() {
            ForecastError::DataError(msg) => assert!(msg.contains("line 3"), "{}", msg),
            other => panic!("Expected DataError, got {:?}", other),
        }
    }
}

#[test]
fn test_missing_dataset_file_is_io_error() {
    let result = Dataset::from_csv("/nonexistent/sample_forecast_data.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}
