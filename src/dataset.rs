//! The immutable in-memory production table.
//!
//! A [`Dataset`] is built once (usually by [`crate::loader`]) and only ever
//! read afterwards. It is handed by reference to the filter, the views and the
//! dashboard builder; there is no process-wide copy.

use crate::error::DatasetError;
use crate::filter::{FilterSpec, Selection};
use crate::types::{Record, SortKey};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
struct StateInfo {
    code: String,
    region: String,
}

/// Validates records one at a time while a dataset is being assembled.
///
/// The running total is bounded by `u64::MAX`, so any sum over a subset of
/// the finished dataset fits in a `u64`.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    records: Vec<Record>,
    states: BTreeMap<String, StateInfo>,
    seen: HashSet<(i32, String)>,
    total: u64,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, rejecting it if it contradicts what was already added.
    pub fn push(&mut self, record: Record) -> Result<(), DatasetError> {
        if let Some(info) = self.states.get(&record.state_name) {
            if info.region != record.region_name {
                return Err(DatasetError::ConflictingRegion {
                    state: record.state_name,
                    expected: info.region.clone(),
                    found: record.region_name,
                });
            }
            if info.code != record.state_code {
                return Err(DatasetError::ConflictingCode {
                    state: record.state_name,
                    expected: info.code.clone(),
                    found: record.state_code,
                });
            }
        }
        let Some(total) = self.total.checked_add(record.production_quantity) else {
            return Err(DatasetError::TotalOverflow {
                state: record.state_name,
                year: record.year,
            });
        };
        if !self.seen.insert((record.year, record.state_name.clone())) {
            return Err(DatasetError::DuplicateObservation {
                state: record.state_name,
                year: record.year,
            });
        }
        self.total = total;
        self.states
            .entry(record.state_name.clone())
            .or_insert_with(|| StateInfo {
                code: record.state_code.clone(),
                region: record.region_name.clone(),
            });
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self) -> Dataset {
        let years = self.records.iter().map(|r| r.year).collect();
        let regions = self.states.values().map(|s| s.region.clone()).collect();
        Dataset {
            records: self.records,
            states: self.states,
            years,
            regions,
        }
    }
}

/// All production records plus the distinct values used to populate filters.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    states: BTreeMap<String, StateInfo>,
    years: BTreeSet<i32>,
    regions: BTreeSet<String>,
}

impl Dataset {
    /// Build a dataset from records already in memory.
    pub fn from_records<I>(records: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut builder = DatasetBuilder::new();
        for record in records {
            builder.push(record)?;
        }
        Ok(builder.finish())
    }

    /// Records in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Distinct region names, ascending.
    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    /// Distinct state names, ascending.
    pub fn states(&self) -> impl Iterator<Item = &str> + Clone {
        self.states.keys().map(String::as_str)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn region_of(&self, state: &str) -> Option<&str> {
        self.states.get(state).map(|s| s.region.as_str())
    }

    pub fn code_of(&self, state: &str) -> Option<&str> {
        self.states.get(state).map(|s| s.code.as_str())
    }

    /// Earliest and latest year, or `None` for an empty dataset.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let first = *self.years.first()?;
        let last = *self.years.last()?;
        Some((first, last))
    }

    /// The filter the dashboard opens with: full year range, every region and
    /// state, detail table ordered by production.
    pub fn default_filter(&self) -> FilterSpec {
        let (year_min, year_max) = self.year_bounds().unwrap_or((i32::MIN, i32::MAX));
        FilterSpec {
            year_min,
            year_max,
            regions: Selection::All,
            states: Selection::All,
            sort_key: SortKey::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, state: &str, code: &str, region: &str, qty: u64) -> Record {
        Record::new(year, state, code, region, qty)
    }

    #[test]
    fn builds_distinct_indices() {
        let ds = Dataset::from_records(vec![
            rec(2001, "Bahia", "BA", "Nordeste", 10),
            rec(2000, "Bahia", "BA", "Nordeste", 5),
            rec(2000, "Goiás", "GO", "Centro-Oeste", 7),
        ])
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.year_bounds(), Some((2000, 2001)));
        assert_eq!(
            ds.regions().iter().cloned().collect::<Vec<_>>(),
            vec!["Centro-Oeste".to_string(), "Nordeste".to_string()]
        );
        assert_eq!(ds.states().collect::<Vec<_>>(), vec!["Bahia", "Goiás"]);
        assert_eq!(ds.region_of("Goiás"), Some("Centro-Oeste"));
        assert_eq!(ds.code_of("Bahia"), Some("BA"));
        assert_eq!(ds.records()[0].year, 2001);
    }

    #[test]
    fn rejects_duplicate_state_year() {
        let err = Dataset::from_records(vec![
            rec(2000, "Bahia", "BA", "Nordeste", 10),
            rec(2000, "Bahia", "BA", "Nordeste", 11),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::DuplicateObservation {
                state: "Bahia".into(),
                year: 2000
            }
        );
    }

    #[test]
    fn rejects_state_moving_region() {
        let err = Dataset::from_records(vec![
            rec(2000, "Bahia", "BA", "Nordeste", 10),
            rec(2001, "Bahia", "BA", "Sudeste", 11),
        ])
        .unwrap_err();
        assert!(matches!(err, DatasetError::ConflictingRegion { .. }));
    }

    #[test]
    fn rejects_state_changing_code() {
        let err = Dataset::from_records(vec![
            rec(2000, "Bahia", "BA", "Nordeste", 10),
            rec(2001, "Bahia", "BH", "Nordeste", 11),
        ])
        .unwrap_err();
        assert!(matches!(err, DatasetError::ConflictingCode { .. }));
    }

    #[test]
    fn rejects_total_past_u64_max() {
        let err = Dataset::from_records(vec![
            rec(2000, "Bahia", "BA", "Nordeste", u64::MAX),
            rec(2000, "Goiás", "GO", "Centro-Oeste", 1),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::TotalOverflow {
                state: "Goiás".into(),
                year: 2000
            }
        );
    }

    #[test]
    fn accepts_total_of_exactly_u64_max() {
        let ds = Dataset::from_records(vec![
            rec(2000, "Bahia", "BA", "Nordeste", u64::MAX - 1),
            rec(2001, "Bahia", "BA", "Nordeste", 1),
        ])
        .unwrap();
        let dash = crate::build(&ds, &ds.default_filter());
        assert_eq!(dash.metrics.total, u64::MAX);
        assert_eq!(dash.state_totals[0].production, u64::MAX);
    }

    #[test]
    fn default_filter_spans_every_year() {
        let ds = Dataset::from_records(vec![
            rec(1999, "Bahia", "BA", "Nordeste", 1),
            rec(2024, "Bahia", "BA", "Nordeste", 2),
        ])
        .unwrap();
        let spec = ds.default_filter();
        assert_eq!((spec.year_min, spec.year_max), (1999, 2024));
        assert!(spec.regions.is_all());
        assert!(spec.states.is_all());
        assert_eq!(spec.sort_key, SortKey::Production);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = DatasetBuilder::new().finish();
        assert!(ds.is_empty());
        assert_eq!(ds.year_bounds(), None);
    }
}
