use crate::util::{format_int, format_number, format_percent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// One CSV row as it comes off the reader, before any validation.
///
/// The English headers are canonical; the Portuguese headers of the legacy
/// `dados_algodao.csv` export (`ano`, `estado`, `sigla`, `regiao`, `producao`)
/// are accepted too.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(alias = "ano")]
    pub year: Option<String>,
    #[serde(alias = "estado")]
    pub state_name: Option<String>,
    #[serde(alias = "sigla")]
    pub state_code: Option<String>,
    #[serde(alias = "regiao")]
    pub region_name: Option<String>,
    #[serde(alias = "producao")]
    pub production_quantity: Option<String>,
}

/// A single (state, year) production observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub year: i32,
    pub state_name: String,
    pub state_code: String,
    pub region_name: String,
    /// Tonnes.
    pub production_quantity: u64,
}

impl Record {
    pub fn new(
        year: i32,
        state_name: impl Into<String>,
        state_code: impl Into<String>,
        region_name: impl Into<String>,
        production_quantity: u64,
    ) -> Self {
        Self {
            year,
            state_name: state_name.into(),
            state_code: state_code.into(),
            region_name: region_name.into(),
            production_quantity,
        }
    }
}

/// Ordering applied to the detail table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending by summed production.
    #[default]
    Production,
    /// Ascending by state name.
    StateName,
    /// Ascending by region name.
    RegionName,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "producao" => Ok(SortKey::Production),
            "state" | "state_name" | "estado" => Ok(SortKey::StateName),
            "region" | "region_name" | "regiao" => Ok(SortKey::RegionName),
            other => Err(format!(
                "unknown sort key '{other}' (expected production, state or region)"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Production => write!(f, "production"),
            SortKey::StateName => write!(f, "state"),
            SortKey::RegionName => write!(f, "region"),
        }
    }
}

fn display_tonnes(n: &u64) -> String {
    format_int(*n)
}

fn display_share(p: &f64) -> String {
    format_percent(*p)
}

/// Map view: one row per state present in the subset.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct StateTotalRow {
    #[serde(rename = "StateCode")]
    #[tabled(rename = "Code")]
    pub state_code: String,
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state_name: String,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region_name: String,
    #[serde(rename = "Production")]
    #[tabled(rename = "Production (ton)", display_with = "display_tonnes")]
    pub production: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct YearTotalRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Production")]
    #[tabled(rename = "Production (ton)", display_with = "display_tonnes")]
    pub production: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state_name: String,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region_name: String,
    #[serde(rename = "Production")]
    #[tabled(rename = "Production (ton)", display_with = "display_tonnes")]
    pub production: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RegionShareRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region_name: String,
    #[serde(rename = "Production")]
    #[tabled(rename = "Production (ton)", display_with = "display_tonnes")]
    pub production: u64,
    /// Share of the subset total, in percent.
    #[serde(rename = "SharePct")]
    #[tabled(rename = "Share", display_with = "display_share")]
    pub share_pct: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DetailRow {
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state_name: String,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region_name: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Production")]
    #[tabled(rename = "Production (ton)", display_with = "display_tonnes")]
    pub production: u64,
}

/// The four summary statistics of a subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total: u64,
    pub yearly_average: f64,
    pub leading_state: String,
    pub growth_percent: f64,
}

impl Metrics {
    /// Fallback reported for an empty subset.
    pub fn empty() -> Self {
        Self {
            total: 0,
            yearly_average: 0.0,
            leading_state: "N/A".to_string(),
            growth_percent: 0.0,
        }
    }
}

/// Display strings of the four metric cards.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MetricCards {
    #[tabled(rename = "Total Production")]
    pub total: String,
    #[tabled(rename = "Yearly Average")]
    pub yearly_average: String,
    #[tabled(rename = "Leading State")]
    pub leading_state: String,
    #[tabled(rename = "Growth")]
    pub growth: String,
}

impl From<&Metrics> for MetricCards {
    fn from(m: &Metrics) -> Self {
        Self {
            total: format!("{} ton", format_number(m.total as f64)),
            yearly_average: format!("{} ton/year", format_number(m.yearly_average)),
            leading_state: m.leading_state.clone(),
            growth: format_percent(m.growth_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_accepts_english_and_portuguese_names() {
        assert_eq!("production".parse::<SortKey>(), Ok(SortKey::Production));
        assert_eq!(" State ".parse::<SortKey>(), Ok(SortKey::StateName));
        assert_eq!("regiao".parse::<SortKey>(), Ok(SortKey::RegionName));
        assert!("volume".parse::<SortKey>().is_err());
    }

    #[test]
    fn sort_key_display_parses_back() {
        for key in [SortKey::Production, SortKey::StateName, SortKey::RegionName] {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
    }

    #[test]
    fn metric_cards_use_suffix_formatting() {
        let metrics = Metrics {
            total: 2_500_000,
            yearly_average: 1500.0,
            leading_state: "Mato Grosso".to_string(),
            growth_percent: 12.345,
        };
        let cards = MetricCards::from(&metrics);
        assert_eq!(cards.total, "2.5M ton");
        assert_eq!(cards.yearly_average, "2K ton/year");
        assert_eq!(cards.leading_state, "Mato Grosso");
        assert_eq!(cards.growth, "12.3%");
    }

    #[test]
    fn empty_metrics_cards() {
        let cards = MetricCards::from(&Metrics::empty());
        assert_eq!(cards.total, "0 ton");
        assert_eq!(cards.yearly_average, "0 ton/year");
        assert_eq!(cards.leading_state, "N/A");
        assert_eq!(cards.growth, "0.0%");
    }
}
