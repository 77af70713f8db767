//! Subcommand implementations

use crate::table;
use chrono::NaiveDate;
use demand_forecast::evaluation::backtest;
use demand_forecast::export::{display_rows, write_forecast_csv_file, RowKind};
use demand_forecast::{
    ArtifactCache, Dataset, ForecastConfig, ForecastError, Forecaster, LookupTable, Result,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Loaded configuration plus the lazily loaded model
pub struct App {
    config: ForecastConfig,
    cache: ArtifactCache,
}

impl App {
    /// Use `config_path` when given, else the defaults relative to the working directory
    pub fn from_config_file(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                let mut config = ForecastConfig::from_json_file(path)?;
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                config.artifacts = config.artifacts.relative_to(base);
                config
            }
            None => ForecastConfig::default(),
        };
        Ok(Self::new(config))
    }

    pub fn new(config: ForecastConfig) -> Self {
        let cache = ArtifactCache::new(config.artifacts.clone());
        Self { config, cache }
    }

    fn lookup(&self) -> Result<LookupTable> {
        LookupTable::from_csv(&self.config.artifacts.lookup)
    }

    fn dataset(&self) -> Result<Dataset> {
        let dataset = Dataset::from_csv(&self.config.artifacts.dataset)?;
        info!(rows = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    fn check_store(&self, store: u32) -> Result<()> {
        if !self.config.stores.contains(&store) {
            return Err(ForecastError::ValidationError(format!(
                "Store {} is not one of the configured stores {:?}",
                store, self.config.stores
            )));
        }
        Ok(())
    }

    fn check_as_of(&self, as_of: NaiveDate) -> Result<()> {
        if !self.config.in_forecast_window(as_of) {
            return Err(ForecastError::ValidationError(format!(
                "As-of date {} is outside {} to {}",
                as_of, self.config.forecast_start, self.config.forecast_end
            )));
        }
        Ok(())
    }

    pub fn stores(&self) -> Result<String> {
        let lookup = self.lookup()?;
        let counts: Vec<(u32, usize)> = self
            .config
            .stores
            .iter()
            .map(|&store| (store, lookup.items_for_store(store).len()))
            .collect();
        Ok(table::stores_table(&counts))
    }

    pub fn items(&self, store: u32) -> Result<String> {
        self.check_store(store)?;
        let items = self.lookup()?.items_for_store(store);
        if items.is_empty() {
            warn!(store, "no items listed for store");
        }
        Ok(table::items_table(&items))
    }

    pub fn info(&self) -> Result<String> {
        let artifact = self.cache.get_or_load()?;
        Ok(table::model_info(
            artifact.metadata(),
            artifact.scaler().is_some(),
        ))
    }

    /// Forecast table with the last `show_history` observed days in front
    pub fn forecast(
        &self,
        store: u32,
        item: u32,
        days: usize,
        as_of: Option<NaiveDate>,
        show_history: usize,
        output: Option<&PathBuf>,
    ) -> Result<String> {
        self.check_store(store)?;
        if let Some(date) = as_of {
            self.check_as_of(date)?;
        }

        let artifact = self.cache.get_or_load()?;
        let dataset = self.dataset()?;
        let history = dataset.history(store, item, as_of, self.config.history_days);
        let forecaster = Forecaster::from_config(&self.config)?;
        let result = forecaster.forecast_history(&artifact, &history, days)?;

        if let Some(path) = output {
            write_forecast_csv_file(&result, path)?;
            info!(path = %path.display(), days = result.len(), "wrote forecast CSV");
        }

        let rows = display_rows(&history, &result);
        let actual_rows = rows.iter().filter(|r| r.kind == RowKind::Actual).count();
        let skip = actual_rows.saturating_sub(show_history);
        Ok(table::forecast_table(&rows[skip..]))
    }

    pub fn backtest(&self, store: u32, item: u32, as_of: NaiveDate, days: usize) -> Result<String> {
        self.check_store(store)?;

        let artifact = self.cache.get_or_load()?;
        let dataset = self.dataset()?;
        let forecaster = Forecaster::from_config(&self.config)?;
        let run = backtest(
            &forecaster,
            &artifact,
            &dataset,
            store,
            item,
            as_of,
            days,
            self.config.history_days,
        )?;
        Ok(table::backtest_table(&run))
    }
}
