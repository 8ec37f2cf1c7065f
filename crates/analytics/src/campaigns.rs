//! Per-campaign performance rows, in first-seen order.

use std::collections::HashMap;

use adboard_core::types::AdRecord;
use serde::Serialize;

use crate::rates::percentage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignPerformance {
    pub campaign_name: String,
    pub spend: f64,
    pub impressions: u64,
    pub actions: u64,
    /// Actions per impression, as a percentage.
    pub ctr: f64,
}

/// One row per distinct campaign name, ordered by first appearance in the
/// snapshot rather than by any metric.
pub fn rank_campaigns(records: &[AdRecord]) -> Vec<CampaignPerformance> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<CampaignPerformance> = Vec::new();

    for record in records {
        let slot = *index
            .entry(record.campaign_name.as_str())
            .or_insert_with(|| {
                rows.push(CampaignPerformance {
                    campaign_name: record.campaign_name.clone(),
                    spend: 0.0,
                    impressions: 0,
                    actions: 0,
                    ctr: 0.0,
                });
                rows.len() - 1
            });
        let row = &mut rows[slot];
        row.spend += record.spend;
        row.impressions += record.impressions;
        row.actions += record.actions.total();
    }

    for row in &mut rows {
        row.ctr = percentage(row.actions as f64, row.impressions as f64);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::record;

    #[test]
    fn empty_snapshot_yields_no_rows() {
        assert!(rank_campaigns(&[]).is_empty());
    }

    #[test]
    fn one_row_per_distinct_campaign() {
        let mut a = record("a", "2024-05-01", "A");
        a.spend = 100.0;
        let mut b = record("b", "2024-05-01", "B");
        b.spend = 50.0;
        let mut a2 = record("c", "2024-05-02", "A");
        a2.spend = 25.0;

        let rows = rank_campaigns(&[a, b, a2]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].campaign_name, "A");
        assert_eq!(rows[0].spend, 125.0);
        assert_eq!(rows[1].campaign_name, "B");
        assert_eq!(rows[1].spend, 50.0);
    }

    #[test]
    fn rows_keep_first_seen_order() {
        let records = vec![
            record("a", "2024-05-01", "Zeta"),
            record("b", "2024-05-01", "Alpha"),
            record("c", "2024-05-02", "Zeta"),
            record("d", "2024-05-02", "Mid"),
        ];
        let names: Vec<String> = rank_campaigns(&records)
            .into_iter()
            .map(|row| row.campaign_name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn ctr_derives_from_summed_totals_with_zero_guard() {
        let mut a = record("a", "2024-05-01", "A");
        a.impressions = 1000;
        a.actions.link_click = 12;
        let mut a2 = record("b", "2024-05-02", "A");
        a2.impressions = 1000;
        a2.actions.video_view = 8;

        let rows = rank_campaigns(&[a, a2]);
        assert!((rows[0].ctr - 1.0).abs() < 1e-9);

        let no_impressions = rank_campaigns(&[record("c", "2024-05-01", "B")]);
        assert_eq!(no_impressions[0].ctr, 0.0);
    }
}
