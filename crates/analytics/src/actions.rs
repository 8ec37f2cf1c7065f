//! Action-type breakdown across a filtered snapshot.

use adboard_core::types::{ActionKind, AdRecord};
use serde::Serialize;

use crate::rates::ratio;

/// One fixed row per reportable action category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionBreakdown {
    pub action: ActionKind,
    pub label: &'static str,
    pub count: u64,
    /// Sum of per-record unit costs, as the upstream dashboard reports it.
    /// A sum of averages has no clean unit; kept for display parity.
    pub cost: f64,
    /// `cost / count`, the figure the dashboard displays.
    pub cost_per_action: f64,
    /// Count-weighted alternative: attributed spend divided by total count.
    pub weighted_cost_per_action: f64,
}

/// Always returns exactly six rows in [`ActionKind::ALL`] order, zeroed when
/// the snapshot is empty. Categories without an upstream unit cost (post
/// engagement, post reactions) report zero for every cost column.
pub fn breakdown_actions(records: &[AdRecord]) -> Vec<ActionBreakdown> {
    ActionKind::ALL
        .iter()
        .map(|&action| {
            let mut count = 0u64;
            let mut cost = 0.0;
            let mut attributed_cost = 0.0;

            for record in records {
                let record_count = action.count_in(&record.actions);
                count += record_count;
                if let Some(unit_cost) = action.cost_in(&record.action_costs) {
                    cost += unit_cost;
                    attributed_cost += unit_cost * record_count as f64;
                }
            }

            ActionBreakdown {
                action,
                label: action.label(),
                count,
                cost,
                cost_per_action: ratio(cost, count as f64),
                weighted_cost_per_action: ratio(attributed_cost, count as f64),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::record;

    #[test]
    fn always_six_rows_in_declared_order() {
        let rows = breakdown_actions(&[]);
        let labels: Vec<&str> = rows.iter().map(|row| row.label).collect();
        assert_eq!(
            labels,
            vec![
                "Landing Page Views",
                "Link Clicks",
                "Page Engagement",
                "Post Engagement",
                "Post Reactions",
                "Video Views",
            ]
        );
        assert!(rows.iter().all(|row| row.count == 0 && row.cost == 0.0));
    }

    #[test]
    fn counts_and_costs_sum_across_records() {
        let mut a = record("a", "2024-05-01", "A");
        a.actions.link_click = 10;
        a.action_costs.link_click = 0.50;
        let mut b = record("b", "2024-05-02", "A");
        b.actions.link_click = 30;
        b.action_costs.link_click = 0.10;

        let rows = breakdown_actions(&[a, b]);
        let link_clicks = &rows[1];
        assert_eq!(link_clicks.count, 40);
        assert!((link_clicks.cost - 0.60).abs() < 1e-9);
        // Display figure: summed unit costs over total count.
        assert!((link_clicks.cost_per_action - 0.015).abs() < 1e-9);
        // Weighted figure: (0.50*10 + 0.10*30) / 40 = 0.20.
        assert!((link_clicks.weighted_cost_per_action - 0.20).abs() < 1e-9);
    }

    #[test]
    fn uncosted_categories_count_but_never_cost() {
        let mut a = record("a", "2024-05-01", "A");
        a.actions.post_reaction = 25;
        let rows = breakdown_actions(&[a]);
        let reactions = &rows[4];
        assert_eq!(reactions.count, 25);
        assert_eq!(reactions.cost, 0.0);
        assert_eq!(reactions.cost_per_action, 0.0);
        assert_eq!(reactions.weighted_cost_per_action, 0.0);
    }

    #[test]
    fn zero_count_rows_guard_the_division() {
        let mut a = record("a", "2024-05-01", "A");
        a.action_costs.video_view = 2.0;
        let rows = breakdown_actions(&[a]);
        let video = &rows[5];
        assert_eq!(video.count, 0);
        assert!((video.cost - 2.0).abs() < 1e-9);
        assert_eq!(video.cost_per_action, 0.0);
    }
}
