// The five aggregation views behind the dashboard.
//
// Every view takes the same filtered subset and groups it independently.
// Grouping goes through `BTreeMap`, so rows come out in key order and ties in
// the sorted views are resolved by that order. An empty subset yields an
// empty view.
use crate::types::{
    DetailRow, RankingRow, Record, RegionShareRow, SortKey, StateTotalRow, YearTotalRow,
};
use std::collections::BTreeMap;

/// Number of states in the ranking view.
pub const TOP_N: usize = 10;
/// Maximum number of rows in the detail table.
pub const DETAIL_ROW_LIMIT: usize = 100;

/// Map view: total production per state, keyed by code, name and region.
pub fn state_region_totals(subset: &[&Record]) -> Vec<StateTotalRow> {
    let mut map: BTreeMap<(&str, &str, &str), u64> = BTreeMap::new();
    for r in subset {
        let key = (
            r.state_code.as_str(),
            r.state_name.as_str(),
            r.region_name.as_str(),
        );
        *map.entry(key).or_default() += r.production_quantity;
    }
    map.into_iter()
        .map(|((code, state, region), production)| StateTotalRow {
            state_code: code.to_string(),
            state_name: state.to_string(),
            region_name: region.to_string(),
            production,
        })
        .collect()
}

/// Time series: total production per year, ascending by year.
pub fn yearly_series(subset: &[&Record]) -> Vec<YearTotalRow> {
    let mut map: BTreeMap<i32, u64> = BTreeMap::new();
    for r in subset {
        *map.entry(r.year).or_default() += r.production_quantity;
    }
    map.into_iter()
        .map(|(year, production)| YearTotalRow { year, production })
        .collect()
}

/// The [`TOP_N`] states with the largest totals, largest first.
///
/// Equal totals keep alphabetical state order. Fewer states than `TOP_N`
/// returns all of them.
pub fn top_states(subset: &[&Record]) -> Vec<RankingRow> {
    let mut map: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for r in subset {
        *map.entry((r.state_name.as_str(), r.region_name.as_str()))
            .or_default() += r.production_quantity;
    }
    let mut totals: Vec<((&str, &str), u64)> = map.into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
        .into_iter()
        .take(TOP_N)
        .enumerate()
        .map(|(idx, ((state, region), production))| RankingRow {
            rank: idx + 1,
            state_name: state.to_string(),
            region_name: region.to_string(),
            production,
        })
        .collect()
}

/// Distribution view: total production per region with its share of the
/// subset total.
pub fn region_distribution(subset: &[&Record]) -> Vec<RegionShareRow> {
    let mut map: BTreeMap<&str, u64> = BTreeMap::new();
    for r in subset {
        *map.entry(r.region_name.as_str()).or_default() += r.production_quantity;
    }
    let grand_total: u64 = map.values().sum();
    map.into_iter()
        .map(|(region, production)| {
            let share_pct = if grand_total == 0 {
                0.0
            } else {
                production as f64 / grand_total as f64 * 100.0
            };
            RegionShareRow {
                region_name: region.to_string(),
                production,
                share_pct,
            }
        })
        .collect()
}

/// Detail table: production per state, region and year, ordered by
/// `sort_key` and cut to [`DETAIL_ROW_LIMIT`] rows.
///
/// The base data has one record per state and year, so the sum normally sees
/// a single value; it still sums so duplicated input would not drop rows.
pub fn detail_table(subset: &[&Record], sort_key: SortKey) -> Vec<DetailRow> {
    let mut map: BTreeMap<(&str, &str, i32), u64> = BTreeMap::new();
    for r in subset {
        *map.entry((r.state_name.as_str(), r.region_name.as_str(), r.year))
            .or_default() += r.production_quantity;
    }
    let mut rows: Vec<DetailRow> = map
        .into_iter()
        .map(|((state, region, year), production)| DetailRow {
            state_name: state.to_string(),
            region_name: region.to_string(),
            year,
            production,
        })
        .collect();

    // Stable sorts: equal keys stay in (state, region, year) order.
    match sort_key {
        SortKey::Production => rows.sort_by(|a, b| b.production.cmp(&a.production)),
        SortKey::StateName => rows.sort_by(|a, b| a.state_name.cmp(&b.state_name)),
        SortKey::RegionName => rows.sort_by(|a, b| a.region_name.cmp(&b.region_name)),
    }
    rows.truncate(DETAIL_ROW_LIMIT);
    rows
}
