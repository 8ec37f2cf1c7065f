//! Whole-dataset rollup plus the two per-date chart series.

use std::collections::BTreeMap;

use adboard_core::types::AdRecord;
use chrono::NaiveDate;
use serde::Serialize;

use crate::rates::{percentage, ratio};

/// One point in a date-keyed chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Totals and derived averages across a filtered snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_impressions: u64,
    /// Sum of all seven per-record action counts.
    pub total_actions: u64,
    /// Landing-page-view count; the upstream dashboard reports it as leads.
    pub total_leads: u64,
    pub total_spend: f64,
    pub total_reach: u64,
    /// Actions per impression, as a percentage.
    pub average_ctr: f64,
    /// Impressions per uniquely reached user.
    pub average_frequency: f64,
    pub average_cost_per_action: f64,
    pub spend_over_time: Vec<TimeSeriesPoint>,
    pub impressions_over_time: Vec<TimeSeriesPoint>,
}

/// Single pass over the snapshot for totals and the per-date accumulation;
/// the derived averages come out of a second, constant-time step with zero
/// guards. An empty snapshot produces the all-zero summary.
pub fn summarize(records: &[AdRecord]) -> AnalyticsSummary {
    let mut summary = AnalyticsSummary::default();
    let mut by_date: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();

    for record in records {
        summary.total_impressions += record.impressions;
        summary.total_spend += record.spend;
        summary.total_reach += record.reach;
        summary.total_actions += record.actions.total();
        summary.total_leads += record.actions.landing_page_view;

        let slot = by_date.entry(record.date_start).or_insert((0.0, 0));
        slot.0 += record.spend;
        slot.1 += record.impressions;
    }

    summary.average_ctr = percentage(
        summary.total_actions as f64,
        summary.total_impressions as f64,
    );
    summary.average_frequency = ratio(
        summary.total_impressions as f64,
        summary.total_reach as f64,
    );
    summary.average_cost_per_action =
        ratio(summary.total_spend, summary.total_actions as f64);

    // BTreeMap iteration is date-ascending, which is exactly the order the
    // chart series need.
    summary.spend_over_time = by_date
        .iter()
        .map(|(&date, &(spend, _))| TimeSeriesPoint { date, value: spend })
        .collect();
    summary.impressions_over_time = by_date
        .iter()
        .map(|(&date, &(_, impressions))| TimeSeriesPoint {
            date,
            value: impressions as f64,
        })
        .collect();

    summary
}
