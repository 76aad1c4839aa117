use crate::dataset::Dataset;
use crate::types::{Record, SortKey};
use serde::Serialize;
use std::collections::BTreeSet;

/// Records that passed a filter, borrowed from the dataset in source order.
pub type Subset<'a> = Vec<&'a Record>;

// Which names a categorical filter lets through.

/// Allowed values for a categorical column.
///
/// An empty selection means "no restriction", matching a dropdown left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Selection::All
        } else {
            Selection::Only(set)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn allows(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(name),
        }
    }
}

// Filter specification and application.

/// User-selected constraints applied before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    /// Inclusive.
    pub year_min: i32,
    /// Inclusive.
    pub year_max: i32,
    pub regions: Selection,
    pub states: Selection,
    pub sort_key: SortKey,
}

impl FilterSpec {
    /// A year-range filter with every region and state selected.
    pub fn years(year_min: i32, year_max: i32) -> Self {
        Self {
            year_min,
            year_max,
            regions: Selection::All,
            states: Selection::All,
            sort_key: SortKey::Production,
        }
    }

    pub fn with_regions(mut self, regions: Selection) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_states(mut self, states: Selection) -> Self {
        self.states = states;
        self
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Whether a record passes every predicate. An inverted year range
    /// matches nothing.
    pub fn matches(&self, record: &Record) -> bool {
        (self.year_min..=self.year_max).contains(&record.year)
            && self.regions.allows(&record.region_name)
            && self.states.allows(&record.state_name)
    }
}

/// Return the records of `dataset` that pass `spec`, in source order.
pub fn filter<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> Subset<'a> {
    dataset
        .records()
        .iter()
        .filter(|r| spec.matches(r))
        .collect()
}

// Terminal prompt parsing.

/// Parse `"2005-2010"` (or a single `"2008"`) into inclusive bounds.
pub fn parse_year_range(input: &str) -> Option<(i32, i32)> {
    let input = input.trim();
    match input.split_once('-') {
        Some((a, b)) => {
            let from = a.trim().parse().ok()?;
            let to = b.trim().parse().ok()?;
            Some((from, to))
        }
        None => {
            let year = input.parse().ok()?;
            Some((year, year))
        }
    }
}

/// Split a comma-separated list of names, ignoring blanks.
pub fn parse_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a selection from user-typed names, keeping only names in `known`.
///
/// Matching ignores case so `"bahia"` selects `"Bahia"`. Returns the selection
/// and the names that matched nothing.
pub fn resolve_selection<'a, K>(names: &[String], known: K) -> (Selection, Vec<String>)
where
    K: IntoIterator<Item = &'a str> + Clone,
{
    let mut selected = BTreeSet::new();
    let mut unknown = Vec::new();
    for name in names {
        let wanted = name.to_lowercase();
        let hit = known
            .clone()
            .into_iter()
            .find(|k| k.to_lowercase() == wanted);
        match hit {
            Some(k) => {
                selected.insert(k.to_string());
            }
            None => unknown.push(name.clone()),
        }
    }
    (Selection::from_names(selected), unknown)
}
