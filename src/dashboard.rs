//! One dashboard evaluation: filter, the five views, the metrics.
//!
//! [`build`] is a pure function of the dataset and the filter. Front ends call
//! it again whenever a control changes; nothing is cached between calls.

use crate::dataset::Dataset;
use crate::filter::{filter, FilterSpec};
use crate::metrics::compute_metrics;
use crate::reports;
use crate::types::{
    DetailRow, MetricCards, Metrics, RankingRow, RegionShareRow, StateTotalRow, YearTotalRow,
};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

/// Everything the presentation layer renders for one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub filter: FilterSpec,
    /// Number of records that passed the filter.
    pub records: usize,
    pub state_totals: Vec<StateTotalRow>,
    pub yearly_series: Vec<YearTotalRow>,
    pub top_states: Vec<RankingRow>,
    pub regions: Vec<RegionShareRow>,
    pub detail: Vec<DetailRow>,
    pub metrics: Metrics,
}

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
pub struct DashboardSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub filter: &'a FilterSpec,
    pub records: usize,
    pub metrics: &'a Metrics,
    pub cards: MetricCards,
}

pub fn build(dataset: &Dataset, spec: &FilterSpec) -> Dashboard {
    let subset = filter(dataset, spec);
    debug!(
        "filter {}..={} matched {} of {} records",
        spec.year_min,
        spec.year_max,
        subset.len(),
        dataset.len()
    );

    Dashboard {
        filter: spec.clone(),
        records: subset.len(),
        state_totals: reports::state_region_totals(&subset),
        yearly_series: reports::yearly_series(&subset),
        top_states: reports::top_states(&subset),
        regions: reports::region_distribution(&subset),
        detail: reports::detail_table(&subset, spec.sort_key),
        metrics: compute_metrics(&subset),
    }
}

impl Dashboard {
    pub fn cards(&self) -> MetricCards {
        MetricCards::from(&self.metrics)
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    pub fn summary(&self, generated_at: DateTime<Utc>) -> DashboardSummary<'_> {
        DashboardSummary {
            generated_at,
            filter: &self.filter,
            records: self.records,
            metrics: &self.metrics,
            cards: self.cards(),
        }
    }
}
