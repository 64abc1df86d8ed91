//! One-shot update run

use crate::batch::{UpdateBatch, UpdateBatchAssembler};
use crate::capability::{MetricsFetcher, SheetStore};
use crate::config::EngineConfig;
use crate::error::Result;
use chrono::{DateTime, TimeZone};
use std::fmt;
use tracing::{debug, info};

/// Fetches metrics for one petition and applies the resulting batch
///
/// Each call to [`Updater::run_once`] is independent; nothing is carried
/// between runs, so a missed run leaves a gap and a repeated run rewrites
/// the same cells.
#[derive(Debug, Clone)]
pub struct Updater<Tz: TimeZone> {
    petition: String,
    assembler: UpdateBatchAssembler<Tz>,
}

impl<Tz> Updater<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    /// Build an updater, validating `config` up front
    pub fn new<S: Into<String>>(petition: S, config: &EngineConfig, tz: &Tz) -> Result<Self> {
        Ok(Self {
            petition: petition.into(),
            assembler: UpdateBatchAssembler::new(config, tz)?,
        })
    }

    /// Petition the metrics are fetched for
    pub fn petition(&self) -> &str {
        &self.petition
    }

    pub fn assembler(&self) -> &UpdateBatchAssembler<Tz> {
        &self.assembler
    }

    /// Fetch, assemble, write values, then update charts
    ///
    /// Stops at the first failure. Values are written before any chart is
    /// touched, so a chart never points past the last written row. When no
    /// chart is due, the store is not asked to update charts at all.
    pub fn run_once<F, S>(&self, fetcher: &F, store: &S, now: &DateTime<Tz>) -> Result<UpdateBatch>
    where
        F: MetricsFetcher + ?Sized,
        S: SheetStore + ?Sized,
    {
        let metrics = fetcher.fetch(&self.petition)?;
        debug!(
            petition = %self.petition,
            signatures = metrics.signature_count,
            goal = metrics.signature_goal,
            "fetched metrics"
        );

        let batch = self.assembler.assemble(now, metrics)?;

        store.write_values(&batch.writes)?;
        if !batch.charts.is_empty() {
            store.update_charts(&batch.charts)?;
        }

        info!(
            petition = %self.petition,
            hourly_row = batch.hourly_row,
            daily_row = batch.daily_row,
            day_boundary = batch.day_boundary,
            writes = batch.writes.len(),
            charts = batch.charts.len(),
            "update applied"
        );
        Ok(batch)
    }
}
