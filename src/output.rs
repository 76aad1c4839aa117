use crate::config::Theme;
use crate::dashboard::Dashboard;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub const MAP_FILE: &str = "map_state_totals.csv";
pub const SERIES_FILE: &str = "yearly_series.csv";
pub const TOP_FILE: &str = "top_states.csv";
pub const REGIONS_FILE: &str = "region_distribution.csv";
pub const DETAIL_FILE: &str = "detail_table.csv";
pub const SUMMARY_FILE: &str = "summary.json";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for r in rows {
        wtr.serialize(r)
            .with_context(|| format!("writing row to {}", path.display()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("serializing summary")?;
    fs::write(path, s).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write every view as CSV plus `summary.json` into `out_dir`, creating it if
/// needed. Returns the written paths.
pub fn export_dashboard(
    dashboard: &Dashboard,
    out_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut written = Vec::new();
    let mut target = |name: &str| {
        let path = out_dir.join(name);
        written.push(path.clone());
        path
    };
    write_csv(&target(MAP_FILE), &dashboard.state_totals)?;
    write_csv(&target(SERIES_FILE), &dashboard.yearly_series)?;
    write_csv(&target(TOP_FILE), &dashboard.top_states)?;
    write_csv(&target(REGIONS_FILE), &dashboard.regions)?;
    write_csv(&target(DETAIL_FILE), &dashboard.detail)?;
    write_json(&target(SUMMARY_FILE), &dashboard.summary(generated_at))?;
    for path in &written {
        info!("wrote {}", path.display());
    }
    Ok(written)
}

/// Render up to `max_rows` rows as a table styled for `theme`.
pub fn render_table<T>(rows: &[T], max_rows: usize, theme: Theme) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    let mut table = Table::new(slice);
    match theme {
        Theme::Dark => table.with(Style::rounded()),
        Theme::Light => table.with(Style::markdown()),
    };
    table.to_string()
}

pub fn preview_table_rows<T>(title: &str, rows: &[T], max_rows: usize, theme: Theme)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if rows.len() > max_rows {
        println!("(showing {} of {} rows)", max_rows, rows.len());
    }
    println!("{}\n", render_table(rows, max_rows, theme));
}

/// Print the metric cards followed by a preview of each view.
pub fn print_dashboard(dashboard: &Dashboard, theme: Theme, max_rows: usize) {
    let f = &dashboard.filter;
    println!(
        "Production {}–{} | sort: {} | {} records\n",
        f.year_min, f.year_max, f.sort_key, dashboard.records
    );
    preview_table_rows("Summary", &[dashboard.cards()], 1, theme);
    preview_table_rows("Production by State", &dashboard.state_totals, max_rows, theme);
    preview_table_rows("Production over Time", &dashboard.yearly_series, max_rows, theme);
    preview_table_rows("Top 10 Producing States", &dashboard.top_states, max_rows, theme);
    preview_table_rows("Distribution by Region", &dashboard.regions, max_rows, theme);
    preview_table_rows("Detailed Data", &dashboard.detail, max_rows, theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YearTotalRow;

    fn rows() -> Vec<YearTotalRow> {
        vec![
            YearTotalRow {
                year: 2000,
                production: 1_234_567,
            },
            YearTotalRow {
                year: 2001,
                production: 10,
            },
        ]
    }

    #[test]
    fn render_uses_thousands_separators() {
        let out = render_table(&rows(), 5, Theme::Light);
        assert!(out.contains("1,234,567"));
        assert!(out.contains("Production (ton)"));
        assert!(out.contains("| Year"));
    }

    #[test]
    fn render_limits_rows() {
        let out = render_table(&rows(), 1, Theme::Dark);
        assert!(out.contains("2000"));
        assert!(!out.contains("2001"));
    }

    #[test]
    fn render_empty() {
        let empty: Vec<YearTotalRow> = Vec::new();
        assert_eq!(render_table(&empty, 5, Theme::Dark), "(no rows)");
    }
}
