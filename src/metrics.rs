use crate::types::{Metrics, Record};
use crate::util::mean;
use std::collections::BTreeMap;

/// Compute the four headline statistics of a subset.
///
/// Degenerate input never fails: an empty subset gives [`Metrics::empty`],
/// fewer than two distinct years or a zero first-year total give 0% growth.
pub fn compute_metrics(subset: &[&Record]) -> Metrics {
    if subset.is_empty() {
        return Metrics::empty();
    }

    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    let mut by_state: BTreeMap<&str, u64> = BTreeMap::new();
    let mut total = 0u64;
    for r in subset {
        total += r.production_quantity;
        *by_year.entry(r.year).or_default() += r.production_quantity;
        *by_state.entry(r.state_name.as_str()).or_default() += r.production_quantity;
    }

    let yearly_totals: Vec<u64> = by_year.values().copied().collect();

    Metrics {
        total,
        yearly_average: mean(&yearly_totals),
        leading_state: leading_state(&by_state),
        growth_percent: growth_percent(&by_year),
    }
}

// First state with the maximum total; states iterate alphabetically.
fn leading_state(by_state: &BTreeMap<&str, u64>) -> String {
    let mut best: Option<(&str, u64)> = None;
    for (&state, &total) in by_state {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((state, total)),
        }
    }
    best.map(|(state, _)| state.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

// Percentage change between the earliest and latest year totals; a zero
// first-year total reports 0.
fn growth_percent(by_year: &BTreeMap<i32, u64>) -> f64 {
    if by_year.len() < 2 {
        return 0.0;
    }
    let (Some((_, &first)), Some((_, &last))) =
        (by_year.first_key_value(), by_year.last_key_value())
    else {
        return 0.0;
    };
    if first == 0 {
        return 0.0;
    }
    (last as f64 - first as f64) / first as f64 * 100.0
}
