use approx::assert_relative_eq;
use chrono::NaiveDate;
use rstest::rstest;
use sales_math::{day_sequence, error_metrics, RollingWindow};

#[test]
fn test_error_metrics_known_values() {
    let forecast = vec![12.0, 8.0, 10.0, 0.0];
    let actual = vec![10.0, 10.0, 10.0, 0.0];

    let metrics = error_metrics(&forecast, &actual).unwrap();

    // errors: +2, -2, 0, 0
    assert_relative_eq!(metrics.mae, 1.0);
    assert_relative_eq!(metrics.rmse, 2.0_f64.sqrt());
    assert_relative_eq!(metrics.bias, 0.0);
    // zero-sales day is left out of MAPE: (20% + 20% + 0%) / 3
    assert_relative_eq!(metrics.mape, 40.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_error_metrics_bias_sign() {
    let metrics = error_metrics(&[11.0, 11.0], &[10.0, 10.0]).unwrap();
    assert_relative_eq!(metrics.bias, 1.0);

    let metrics = error_metrics(&[9.0, 9.0], &[10.0, 10.0]).unwrap();
    assert_relative_eq!(metrics.bias, -1.0);
}

#[test]
fn test_error_metrics_rejects_bad_input() {
    assert!(error_metrics(&[], &[]).is_err());
    assert!(error_metrics(&[1.0, 2.0], &[1.0]).is_err());
    assert!(error_metrics(&[f64::NAN], &[1.0]).is_err());
}

#[test]
fn test_error_metrics_all_zero_actuals() {
    let metrics = error_metrics(&[1.0, 2.0], &[0.0, 0.0]).unwrap();
    assert_eq!(metrics.mape, 0.0);
}

#[rstest]
#[case(7, 5, None)]
#[case(7, 7, Some(4.0))]
#[case(14, 30, Some(23.5))]
#[case(30, 30, Some(15.5))]
fn test_tail_mean_windows(#[case] window: usize, #[case] filled: usize, #[case] expected: Option<f64>) {
    let values: Vec<f64> = (1..=filled).map(|v| v as f64).collect();
    let buffer = RollingWindow::from_tail(&values, 30).unwrap();

    match (buffer.tail_mean(window), expected) {
        (Some(actual), Some(expected)) => assert_relative_eq!(actual, expected),
        (None, None) => {}
        (actual, expected) => panic!("expected {:?}, got {:?}", expected, actual),
    }
}

#[test]
fn test_day_sequence_crosses_month_end() {
    let start = NaiveDate::from_ymd_opt(2014, 1, 30).unwrap();
    let dates = day_sequence(start, 4);

    assert_eq!(dates.len(), 4);
    assert_eq!(dates[0], start);
    assert_eq!(dates[2], NaiveDate::from_ymd_opt(2014, 2, 1).unwrap());
    assert_eq!(dates[3], NaiveDate::from_ymd_opt(2014, 2, 2).unwrap());
}

#[test]
fn test_day_sequence_empty() {
    let start = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
    assert!(day_sequence(start, 0).is_empty());
}
