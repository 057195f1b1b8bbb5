//! Derived metrics — pure functions of items + layout state.
//!
//! Nothing here mutates; the engine recomputes these on every snapshot so
//! totals and progress can never go stale.

use serde::Serialize;

use crate::models::{parse_numeric, GenericItem};

use super::session::LayoutState;

/// Headline numbers for the summary panel, recomputed per snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Completion percentage, clamped to 0..=100.
    pub progress: u8,
    pub metric_value: f64,
    pub metric_label: &'static str,
}

/// Compute the per-layout summary metrics.
pub fn compute(items: &[GenericItem], state: &LayoutState) -> DerivedMetrics {
    match state {
        LayoutState::Form { values } => {
            let filled = values
                .values()
                .filter(|v| !v.is_empty() && parse_numeric(v) != Some(0.0))
                .count();
            DerivedMetrics {
                progress: percentage(filled, items.len()),
                metric_value: filled as f64,
                metric_label: "Fields Filled",
            }
        }
        LayoutState::Catalog { quantities } => {
            let any_in_cart = quantities.values().any(|q| *q > 0);
            DerivedMetrics {
                progress: if any_in_cart { 100 } else { 0 },
                metric_value: cart_total(items, state),
                metric_label: "Cart Value",
            }
        }
        LayoutState::Checklist { checked } => {
            let done = checked.values().filter(|c| **c).count();
            DerivedMetrics {
                progress: percentage(done, items.len()),
                metric_value: done as f64,
                metric_label: "Tasks Done",
            }
        }
    }
}

/// The value business rules monitor: cart total for catalogs, the live
/// form total otherwise. Checklist sessions keep their seeded item values,
/// so their tracked value is the seeded numeric sum.
pub fn tracked_value(items: &[GenericItem], state: &LayoutState) -> f64 {
    match state {
        LayoutState::Catalog { .. } => cart_total(items, state),
        LayoutState::Form { values } => values.values().filter_map(|v| parse_numeric(v)).sum(),
        LayoutState::Checklist { .. } => {
            items.iter().filter_map(|i| parse_numeric(&i.value)).sum()
        }
    }
}

/// Σ quantity × price over the cart. Zero for non-catalog states.
pub fn cart_total(items: &[GenericItem], state: &LayoutState) -> f64 {
    let LayoutState::Catalog { quantities } = state else {
        return 0.0;
    };
    items
        .iter()
        .map(|item| {
            let qty = quantities.get(&item.id).copied().unwrap_or(0);
            f64::from(qty) * item.price()
        })
        .sum()
}

fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = ((count as f64 / total as f64) * 100.0).round();
    pct.min(100.0) as u8
}
