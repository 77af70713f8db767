//! Autoregressive multi-day forecasting
//!
//! A one-step-ahead model is rolled forward day by day. After each step the
//! prediction is written back into the feature vector as the 1-day lag,
//! pushed into a rolling buffer that refreshes the 7/14/30-day averages,
//! and the calendar fields move to the date just predicted. The 7/14/30-day lag
//! fields, holiday, promotion and store/item aggregate fields keep their
//! seed values for the whole horizon.

use crate::artifacts::ModelArtifact;
use crate::config::{ForecastConfig, MAX_FORECAST_DAYS, SALES_BUFFER_CAPACITY};
use crate::data::HistoryWindow;
use crate::error::{ForecastError, Result};
use crate::features::{names, FeatureSchema, FeatureVector};
use crate::models::Regressor;
use chrono::{Days, NaiveDate};
use sales_math::{CalendarFeatures, RollingWindow};
use tracing::{debug, info_span, warn};

/// Rolling averages refreshed from the sales buffer, with their window lengths
const ROLLING_AVERAGES: [(&str, usize); 3] = [
    (names::UNIT_SALES_7D_AVG, 7),
    (names::UNIT_SALES_14D_AVG, 14),
    (names::UNIT_SALES_30D_AVG, 30),
];

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Predicted unit sales, one point per day in ascending date order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of predicted units over the horizon
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter()
    }
}

/// A forecast together with the feature vector fed into each predict step
#[derive(Debug, Clone)]
pub struct ForecastTrace {
    pub result: ForecastResult,
    pub inputs: Vec<FeatureVector>,
}

/// Positions of the fields rewritten between steps; `None` when absent
#[derive(Debug, Clone, Copy)]
struct FeatureSlots {
    lag1: Option<usize>,
    averages: [(Option<usize>, usize); 3],
    day_of_week: Option<usize>,
    day_of_month: Option<usize>,
    month: Option<usize>,
    is_weekend: Option<usize>,
}

impl FeatureSlots {
    fn resolve(schema: &FeatureSchema) -> Self {
        let mut averages = [(None, 0); 3];
        for (slot, (name, window)) in averages.iter_mut().zip(ROLLING_AVERAGES) {
            *slot = (schema.position(name), window);
        }

        Self {
            lag1: schema.position(names::UNIT_SALES_LAG1),
            averages,
            day_of_week: schema.position(names::DAY_OF_WEEK),
            day_of_month: schema.position(names::DAY_OF_MONTH),
            month: schema.position(names::MONTH),
            is_weekend: schema.position(names::IS_WEEKEND),
        }
    }
}

/// Mutable state carried from one forecast day to the next
#[derive(Debug)]
struct LoopState {
    features: FeatureVector,
    sales: RollingWindow,
    slots: FeatureSlots,
}

impl LoopState {
    /// Feed `prediction`, made for `date`, back into the feature vector
    fn advance(&mut self, prediction: f64, date: NaiveDate) {
        self.sales.push(prediction);

        if let Some(idx) = self.slots.lag1 {
            self.features.set_at(idx, prediction);
        }

        for (slot, window) in self.slots.averages {
            if let (Some(idx), Some(mean)) = (slot, self.sales.tail_mean(window)) {
                self.features.set_at(idx, mean);
            }
        }

        let calendar = CalendarFeatures::from_date(date);
        let calendar_fields = [
            (self.slots.day_of_week, calendar.day_of_week),
            (self.slots.day_of_month, calendar.day_of_month),
            (self.slots.month, calendar.month),
            (self.slots.is_weekend, calendar.is_weekend),
        ];
        for (slot, value) in calendar_fields {
            if let Some(idx) = slot {
                self.features.set_at(idx, value);
            }
        }
    }
}

/// Rolls a one-step model forward over a multi-day horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forecaster {
    max_horizon: usize,
    buffer_capacity: usize,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            max_horizon: MAX_FORECAST_DAYS,
            buffer_capacity: SALES_BUFFER_CAPACITY,
        }
    }
}

impl Forecaster {
    pub fn new(max_horizon: usize, buffer_capacity: usize) -> Result<Self> {
        if max_horizon == 0 || buffer_capacity == 0 {
            return Err(ForecastError::ValidationError(
                "Horizon cap and buffer capacity must be positive".to_string(),
            ));
        }

        Ok(Self {
            max_horizon,
            buffer_capacity,
        })
    }

    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(config.max_forecast_days, config.sales_buffer_capacity)
    }

    pub fn max_horizon(&self) -> usize {
        self.max_horizon
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Forecast `horizon_days` days after `seed_date`.
    ///
    /// `recent_observed` is the tail of observed sales up to `seed_date`,
    /// oldest first. When the model knows its feature order, the seed is
    /// re-aligned to it by name. The call either returns every day or fails
    /// as a whole.
    pub fn forecast<R: Regressor + ?Sized>(
        &self,
        model: &R,
        seed: &FeatureVector,
        seed_date: NaiveDate,
        recent_observed: &[f64],
        horizon_days: usize,
    ) -> Result<ForecastResult> {
        self.run(model, seed, seed_date, recent_observed, horizon_days, None)
    }

    /// Like [`Forecaster::forecast`], also returning every step's input vector
    pub fn forecast_with_trace<R: Regressor + ?Sized>(
        &self,
        model: &R,
        seed: &FeatureVector,
        seed_date: NaiveDate,
        recent_observed: &[f64],
        horizon_days: usize,
    ) -> Result<ForecastTrace> {
        let mut inputs = Vec::with_capacity(horizon_days.min(self.max_horizon));
        let result = self.run(
            model,
            seed,
            seed_date,
            recent_observed,
            horizon_days,
            Some(&mut inputs),
        )?;
        Ok(ForecastTrace { result, inputs })
    }

    /// Forecast from the last entry of a history window.
    ///
    /// The window's observed sales seed the rolling buffer.
    pub fn forecast_history(
        &self,
        artifact: &ModelArtifact,
        window: &HistoryWindow,
        horizon_days: usize,
    ) -> Result<ForecastResult> {
        self.check_horizon(horizon_days)?;
        let seed = window.seed()?;
        let recent = window.recent_observed(self.buffer_capacity);

        if recent.len() < self.buffer_capacity {
            warn!(
                store = window.store(),
                item = window.item(),
                days = recent.len(),
                "short history, rolling averages start from fewer points"
            );
        }

        let _span = info_span!(
            "forecast_history",
            store = window.store(),
            item = window.item(),
            horizon = horizon_days
        )
        .entered();
        self.forecast(artifact, &seed.features, seed.date, &recent, horizon_days)
    }

    fn check_horizon(&self, horizon_days: usize) -> Result<()> {
        if horizon_days == 0 || horizon_days > self.max_horizon {
            return Err(ForecastError::InvalidHorizonError {
                requested: horizon_days,
                max: self.max_horizon,
            });
        }
        Ok(())
    }

    fn run<R: Regressor + ?Sized>(
        &self,
        model: &R,
        seed: &FeatureVector,
        seed_date: NaiveDate,
        recent_observed: &[f64],
        horizon_days: usize,
        mut trace: Option<&mut Vec<FeatureVector>>,
    ) -> Result<ForecastResult> {
        self.check_horizon(horizon_days)?;
        let seed = match model.feature_schema() {
            Some(schema) => seed.align_to(schema)?,
            None => seed.clone(),
        };
        if let Some(required) = model.n_features() {
            if seed.len() < required {
                return Err(ForecastError::ValidationError(format!(
                    "Seed vector has {} features, {} needs {}",
                    seed.len(),
                    model.name(),
                    required
                )));
            }
        }
        if let Some(value) = recent_observed.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::ValidationError(format!(
                "Observed sales must be finite, got {}",
                value
            )));
        }

        let slots = FeatureSlots::resolve(seed.schema());
        let mut state = LoopState {
            features: seed,
            sales: RollingWindow::from_tail(recent_observed, self.buffer_capacity)?,
            slots,
        };
        let mut points = Vec::with_capacity(horizon_days);

        for day in 0..horizon_days {
            let date = offset_date(seed_date, day + 1)?;

            if let Some(inputs) = trace.as_deref_mut() {
                inputs.push(state.features.clone());
            }

            let raw = model.predict(state.features.values()).map_err(|e| match e {
                ForecastError::PredictionError(_) => e,
                other => ForecastError::PredictionError(other.to_string()),
            })?;
            if !raw.is_finite() {
                return Err(ForecastError::PredictionError(format!(
                    "{} returned {} for {}",
                    model.name(),
                    raw,
                    date
                )));
            }
            let prediction = raw.max(0.0);
            debug!(day, %date, raw, prediction, "forecast step");
            points.push(ForecastPoint {
                date,
                value: prediction,
            });

            if day + 1 == horizon_days {
                break;
            }
            state.advance(prediction, date);
        }

        Ok(ForecastResult { points })
    }
}

fn offset_date(seed_date: NaiveDate, days: usize) -> Result<NaiveDate> {
    seed_date
        .checked_add_days(Days::new(days as u64))
        .ok_or_else(|| date_overflow(seed_date))
}

fn date_overflow(date: NaiveDate) -> ForecastError {
    ForecastError::ValidationError(format!("Forecast dates overflow the calendar after {}", date))
}

/// Forecast with the default horizon cap and buffer capacity
pub fn forecast<R: Regressor + ?Sized>(
    model: &R,
    seed: &FeatureVector,
    seed_date: NaiveDate,
    recent_observed: &[f64],
    horizon_days: usize,
) -> Result<ForecastResult> {
    Forecaster::default().forecast(model, seed, seed_date, recent_observed, horizon_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Constant(f64);

    impl Regressor for Constant {
        fn predict(&self, _features: &[f64]) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn seed() -> FeatureVector {
        let schema = Arc::new(FeatureSchema::canonical());
        FeatureVector::from_named(schema, &[(names::UNIT_SALES_LAG1, 2.0)]).unwrap()
    }

    #[test]
    fn zero_and_oversized_horizons_are_rejected() {
        let date = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
        for horizon in [0, 31] {
            let err = forecast(&Constant(1.0), &seed(), date, &[], horizon).unwrap_err();
            assert!(matches!(
                err,
                ForecastError::InvalidHorizonError { requested, max: 30 } if requested == horizon
            ));
        }
    }

    #[test]
    fn slots_skip_absent_fields() {
        let schema = FeatureSchema::new([names::MONTH, "custom"]).unwrap();
        let slots = FeatureSlots::resolve(&schema);
        assert_eq!(slots.lag1, None);
        assert_eq!(slots.month, Some(0));
        assert!(slots.averages.iter().all(|(idx, _)| idx.is_none()));
    }

    #[test]
    fn calendar_advances_with_forecast_date() {
        // 2014-01-03 was a Friday; the first two predicted days fall on the weekend
        let date = NaiveDate::from_ymd_opt(2014, 1, 3).unwrap();
        let trace = Forecaster::default()
            .forecast_with_trace(&Constant(1.0), &seed(), date, &[], 4)
            .unwrap();

        let saturday = &trace.inputs[1];
        assert_eq!(saturday.get(names::DAY_OF_WEEK), Some(5.0));
        assert_eq!(saturday.get(names::IS_WEEKEND), Some(1.0));
        assert_eq!(saturday.get(names::DAY_OF_MONTH), Some(4.0));
        assert_eq!(saturday.get(names::MONTH), Some(1.0));

        let monday = &trace.inputs[3];
        assert_eq!(monday.get(names::DAY_OF_WEEK), Some(0.0));
        assert_eq!(monday.get(names::IS_WEEKEND), Some(0.0));
    }
}
