//! Command-line and environment configuration.

use crate::dataset::Dataset;
use crate::filter::{resolve_selection, FilterSpec};
use crate::types::SortKey;
use clap::{Parser, ValueEnum};
use log::warn;
use std::path::PathBuf;

/// Colour scheme of the terminal tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Dark => "Dark Mode",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "production_dashboard",
    version,
    about = "Explore agricultural production by state, region and year"
)]
pub struct Config {
    /// Production CSV (year, state_name, state_code, region_name, production_quantity).
    #[arg(long, env = "DASHBOARD_DATA", default_value = "dados_algodao.csv")]
    pub data: PathBuf,

    /// Directory the exported CSV and JSON files are written to.
    #[arg(long, env = "DASHBOARD_OUT_DIR", default_value = "dashboard_out")]
    pub out_dir: PathBuf,

    #[arg(long, env = "DASHBOARD_THEME", value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,

    /// Rows shown per table in the console preview.
    #[arg(long, env = "DASHBOARD_PREVIEW_ROWS", default_value_t = 5)]
    pub preview_rows: usize,

    /// Build one dashboard from the flags below, export it and exit.
    #[arg(long)]
    pub batch: bool,

    /// First year (inclusive); defaults to the earliest year in the data.
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year (inclusive); defaults to the latest year in the data.
    #[arg(long)]
    pub to: Option<i32>,

    /// Restrict to a region; repeat for several.
    #[arg(long = "region")]
    pub regions: Vec<String>,

    /// Restrict to a state; repeat for several.
    #[arg(long = "state")]
    pub states: Vec<String>,

    /// Detail table order: production, state or region.
    #[arg(long, default_value = "production")]
    pub sort: SortKey,
}

impl Config {
    /// The filter described by the command-line flags, on top of the
    /// dataset's default filter.
    pub fn filter_spec(&self, dataset: &Dataset) -> FilterSpec {
        let mut spec = dataset.default_filter();
        if let Some(from) = self.from {
            spec.year_min = from;
        }
        if let Some(to) = self.to {
            spec.year_max = to;
        }

        let (regions, unknown) =
            resolve_selection(&self.regions, dataset.regions().iter().map(String::as_str));
        for name in unknown {
            warn!("ignoring unknown region '{name}'");
        }
        let (states, unknown) = resolve_selection(&self.states, dataset.states());
        for name in unknown {
            warn!("ignoring unknown state '{name}'");
        }

        spec.with_regions(regions)
            .with_states(states)
            .with_sort_key(self.sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;
    use crate::types::Record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new(2000, "Bahia", "BA", "Nordeste", 1),
            Record::new(2010, "Paraná", "PR", "Sul", 2),
        ])
        .unwrap()
    }

    #[test]
    fn defaults() {
        let cfg = Config::parse_from(["production_dashboard"]);
        assert!(!cfg.batch);
        assert_eq!(cfg.sort, SortKey::Production);
        assert!(cfg.regions.is_empty());
        assert_eq!(cfg.filter_spec(&dataset()), dataset().default_filter());
    }

    #[test]
    fn batch_flags_build_filter() {
        let cfg = Config::parse_from([
            "production_dashboard",
            "--batch",
            "--from",
            "2005",
            "--region",
            "sul",
            "--region",
            "Atlantis",
            "--sort",
            "state",
            "--theme",
            "light",
        ]);
        assert_eq!(cfg.theme, Theme::Light);
        let spec = cfg.filter_spec(&dataset());
        assert_eq!((spec.year_min, spec.year_max), (2005, 2010));
        assert_eq!(spec.regions, Selection::from_names(["Sul"]));
        assert!(spec.states.is_all());
        assert_eq!(spec.sort_key, SortKey::StateName);
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().label(), "Dark Mode");
    }
}
