//! Period rollups — groups records into day, ISO-week, or month buckets.
//!
//! The three entry points share one accumulator: additive metrics are
//! summed, and both numerator/denominator pairs and per-record rate sums
//! are tracked so either [`RateMode`] can finalize a bucket.

use std::collections::BTreeMap;

use adboard_core::types::{ActionKind, AdRecord, RateMode};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::rates::{mean, percentage, ratio};

/// Structured bucket key. Ordering is structural, so week keys compare
/// correctly across year boundaries where their string labels would not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKey {
    Day(NaiveDate),
    /// ISO-8601 week; `year` is the week-numbering year, which differs from
    /// the calendar year in the first and last days of some years.
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// Rendered key: `YYYY-MM-DD`, `YYYY-Www`, or `YYYY-MM`.
    pub fn label(&self) -> String {
        match self {
            PeriodKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            PeriodKey::Week { year, week } => format!("{year}-W{week:02}"),
            PeriodKey::Month { year, month } => format!("{year}-{month:02}"),
        }
    }
}

/// One finalized calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    pub key: PeriodKey,
    pub label: String,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub landing_page_views: u64,
    pub cost_per_landing_page_view: f64,
    pub link_clicks: u64,
    pub cost_per_link_click: f64,
    pub page_engagements: u64,
    pub cost_per_page_engagement: f64,
    pub video_views: u64,
    pub cost_per_video_view: f64,
    /// Member rows folded into this bucket.
    pub records: u64,
}

impl PeriodBucket {
    /// Labeled per-action cost set consumed by the cost-per-result chart.
    pub fn cost_per_result(&self) -> Vec<CostPerResult> {
        vec![
            CostPerResult::new(ActionKind::LandingPageView, self.cost_per_landing_page_view),
            CostPerResult::new(ActionKind::LinkClick, self.cost_per_link_click),
            CostPerResult::new(ActionKind::PageEngagement, self.cost_per_page_engagement),
            CostPerResult::new(ActionKind::VideoView, self.cost_per_video_view),
        ]
    }
}

/// A single labeled point in the cost-per-result projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostPerResult {
    pub action: ActionKind,
    pub label: &'static str,
    pub cost: f64,
}

impl CostPerResult {
    fn new(action: ActionKind, cost: f64) -> Self {
        Self {
            action,
            label: action.label(),
            cost,
        }
    }
}

/// Group records into one bucket per distinct day, ascending.
pub fn aggregate_by_day(records: &[AdRecord], mode: RateMode) -> Vec<PeriodBucket> {
    aggregate(records, mode, |record| PeriodKey::Day(record.date_start))
}

/// Group records into ISO-8601 week buckets, ascending.
pub fn aggregate_by_week(records: &[AdRecord], mode: RateMode) -> Vec<PeriodBucket> {
    aggregate(records, mode, |record| {
        let week = record.date_start.iso_week();
        PeriodKey::Week {
            year: week.year(),
            week: week.week(),
        }
    })
}

/// Group records into calendar-month buckets, ascending. Unlike the day and
/// week variants, every month between the earliest and latest record is
/// present, zero-filled when no record falls in it, so the series has no
/// gaps. An empty snapshot has no min/max and yields an empty series.
pub fn aggregate_by_month(records: &[AdRecord], mode: RateMode) -> Vec<PeriodBucket> {
    let mut buckets: BTreeMap<PeriodKey, BucketAccumulator> = BTreeMap::new();

    let span = records
        .iter()
        .map(|record| record.date_start)
        .fold(None::<(NaiveDate, NaiveDate)>, |span, date| match span {
            None => Some((date, date)),
            Some((min, max)) => Some((min.min(date), max.max(date))),
        });
    if let Some((min, max)) = span {
        let (mut year, mut month) = (min.year(), min.month());
        while (year, month) <= (max.year(), max.month()) {
            buckets.insert(PeriodKey::Month { year, month }, BucketAccumulator::default());
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }

    for record in records {
        let key = PeriodKey::Month {
            year: record.date_start.year(),
            month: record.date_start.month(),
        };
        buckets.entry(key).or_default().add(record);
    }

    finalize(buckets, mode)
}

fn aggregate(
    records: &[AdRecord],
    mode: RateMode,
    key_of: impl Fn(&AdRecord) -> PeriodKey,
) -> Vec<PeriodBucket> {
    let mut buckets: BTreeMap<PeriodKey, BucketAccumulator> = BTreeMap::new();
    for record in records {
        buckets.entry(key_of(record)).or_default().add(record);
    }
    finalize(buckets, mode)
}

fn finalize(buckets: BTreeMap<PeriodKey, BucketAccumulator>, mode: RateMode) -> Vec<PeriodBucket> {
    debug!(buckets = buckets.len(), ?mode, "finalizing period buckets");
    buckets
        .into_iter()
        .map(|(key, acc)| acc.finalize(key, mode))
        .collect()
}

/// Per-costed-action running sums within one bucket.
#[derive(Debug, Clone, Copy, Default)]
struct CostAccumulator {
    count: u64,
    /// Sum of per-record unit costs, for the record-mean mode.
    unit_cost_sum: f64,
    /// Sum of unit cost times count, i.e. attributed spend, for the
    /// weighted mode.
    attributed_cost: f64,
}

#[derive(Debug, Clone, Default)]
struct BucketAccumulator {
    spend: f64,
    impressions: u64,
    clicks: u64,
    records: u64,
    ctr_sum: f64,
    cpc_sum: f64,
    cpm_sum: f64,
    /// Aligned with [`ActionKind::COSTED`].
    costs: [CostAccumulator; 4],
}

impl BucketAccumulator {
    fn add(&mut self, record: &AdRecord) {
        self.spend += record.spend;
        self.impressions += record.impressions;
        self.clicks += record.clicks;
        self.ctr_sum += record.ctr;
        self.cpc_sum += record.cpc;
        self.cpm_sum += record.cpm;
        self.records += 1;

        for (slot, kind) in self.costs.iter_mut().zip(ActionKind::COSTED) {
            let count = kind.count_in(&record.actions);
            let unit_cost = kind.cost_in(&record.action_costs).unwrap_or(0.0);
            slot.count += count;
            slot.unit_cost_sum += unit_cost;
            slot.attributed_cost += unit_cost * count as f64;
        }
    }

    fn cost_per_action(&self, slot: usize, mode: RateMode) -> f64 {
        let acc = &self.costs[slot];
        match mode {
            RateMode::Weighted => ratio(acc.attributed_cost, acc.count as f64),
            RateMode::RecordMean => mean(acc.unit_cost_sum, self.records),
        }
    }

    fn finalize(&self, key: PeriodKey, mode: RateMode) -> PeriodBucket {
        let (ctr, cpc, cpm) = match mode {
            RateMode::Weighted => (
                percentage(self.clicks as f64, self.impressions as f64),
                ratio(self.spend, self.clicks as f64),
                ratio(self.spend, self.impressions as f64) * 1000.0,
            ),
            RateMode::RecordMean => (
                mean(self.ctr_sum, self.records),
                mean(self.cpc_sum, self.records),
                mean(self.cpm_sum, self.records),
            ),
        };

        PeriodBucket {
            label: key.label(),
            key,
            spend: self.spend,
            impressions: self.impressions,
            clicks: self.clicks,
            ctr,
            cpc,
            cpm,
            landing_page_views: self.costs[0].count,
            cost_per_landing_page_view: self.cost_per_action(0, mode),
            link_clicks: self.costs[1].count,
            cost_per_link_click: self.cost_per_action(1, mode),
            page_engagements: self.costs[2].count,
            cost_per_page_engagement: self.cost_per_action(2, mode),
            video_views: self.costs[3].count,
            cost_per_video_view: self.cost_per_action(3, mode),
            records: self.records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::record;

    #[test]
    fn day_buckets_merge_same_date_records() {
        let mut a = record("a", "2024-05-01", "A");
        a.spend = 100.0;
        a.impressions = 1000;
        a.clicks = 10;
        let mut b = record("b", "2024-05-01", "B");
        b.spend = 50.0;
        b.impressions = 500;
        b.clicks = 5;

        let buckets = aggregate_by_day(&[a, b], RateMode::Weighted);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].label, "2024-05-01");
        assert_eq!(buckets[0].spend, 150.0);
        assert_eq!(buckets[0].impressions, 1500);
        assert_eq!(buckets[0].records, 2);
    }

    #[test]
    fn additive_metrics_are_conserved_across_buckets() {
        let mut records = vec![
            record("a", "2024-05-01", "A"),
            record("b", "2024-05-02", "A"),
            record("c", "2024-05-02", "B"),
            record("d", "2024-06-20", "B"),
        ];
        for (i, r) in records.iter_mut().enumerate() {
            r.spend = 10.0 * (i as f64 + 1.0);
            r.impressions = 100 * (i as u64 + 1);
        }
        let total_spend: f64 = records.iter().map(|r| r.spend).sum();
        let total_impressions: u64 = records.iter().map(|r| r.impressions).sum();

        let buckets = aggregate_by_day(&records, RateMode::Weighted);
        let bucket_spend: f64 = buckets.iter().map(|b| b.spend).sum();
        let bucket_impressions: u64 = buckets.iter().map(|b| b.impressions).sum();
        assert!((bucket_spend - total_spend).abs() < 1e-9);
        assert_eq!(bucket_impressions, total_impressions);
    }

    #[test]
    fn weighted_and_record_mean_rates_diverge_on_uneven_volumes() {
        let mut small = record("a", "2024-05-01", "A");
        small.impressions = 100;
        small.clicks = 1;
        small.ctr = 1.0;
        let mut large = record("b", "2024-05-01", "A");
        large.impressions = 300;
        large.clicks = 9;
        large.ctr = 3.0;
        let records = vec![small, large];

        let naive = aggregate_by_day(&records, RateMode::RecordMean);
        assert!((naive[0].ctr - 2.0).abs() < 1e-9);

        let weighted = aggregate_by_day(&records, RateMode::Weighted);
        assert!((weighted[0].ctr - 2.5).abs() < 1e-9);
    }

    #[test]
    fn zero_click_bucket_has_zero_cpc_not_nan() {
        let mut a = record("a", "2024-05-01", "A");
        a.spend = 40.0;
        let buckets = aggregate_by_day(&[a], RateMode::Weighted);
        assert_eq!(buckets[0].cpc, 0.0);
        assert_eq!(buckets[0].ctr, 0.0);
    }

    #[test]
    fn week_buckets_follow_iso_numbering_across_year_end() {
        // 2019-12-28 falls in ISO week 2019-W52; 2019-12-30 in 2020-W01.
        let records = vec![
            record("late", "2019-12-30", "A"),
            record("early", "2019-12-28", "A"),
        ];
        let buckets = aggregate_by_week(&records, RateMode::Weighted);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2019-W52", "2020-W01"]);
    }

    #[test]
    fn week_ordering_is_structural_not_lexicographic() {
        let records = vec![
            record("b", "2024-03-05", "A"), // 2024-W10
            record("a", "2024-02-28", "A"), // 2024-W09
        ];
        let buckets = aggregate_by_week(&records, RateMode::Weighted);
        assert_eq!(buckets[0].key, PeriodKey::Week { year: 2024, week: 9 });
        assert_eq!(buckets[1].key, PeriodKey::Week { year: 2024, week: 10 });
    }

    #[test]
    fn month_series_fills_gaps_with_zeroed_buckets() {
        let mut jan = record("a", "2024-01-15", "A");
        jan.spend = 75.0;
        let mut mar = record("b", "2024-03-10", "A");
        mar.spend = 25.0;

        let buckets = aggregate_by_month(&[jan, mar], RateMode::Weighted);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(buckets[1].records, 0);
        assert_eq!(buckets[1].spend, 0.0);
        assert_eq!(buckets[1].ctr, 0.0);
    }

    #[test]
    fn month_prefill_crosses_year_boundaries() {
        let buckets = aggregate_by_month(
            &[
                record("a", "2023-11-20", "A"),
                record("b", "2024-02-02", "A"),
            ],
            RateMode::Weighted,
        );
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn empty_input_yields_empty_series_for_every_granularity() {
        assert!(aggregate_by_day(&[], RateMode::Weighted).is_empty());
        assert!(aggregate_by_week(&[], RateMode::Weighted).is_empty());
        assert!(aggregate_by_month(&[], RateMode::Weighted).is_empty());
    }

    #[test]
    fn aggregation_is_deterministic() {
        let mut a = record("a", "2024-05-01", "A");
        a.spend = 12.5;
        a.impressions = 400;
        let records = vec![a, record("b", "2024-05-03", "B")];

        let first = aggregate_by_day(&records, RateMode::Weighted);
        let second = aggregate_by_day(&records, RateMode::Weighted);
        assert_eq!(first, second);
    }

    #[test]
    fn cost_per_result_projects_the_four_costed_kinds() {
        let mut a = record("a", "2024-05-01", "A");
        a.actions.link_click = 10;
        a.action_costs.link_click = 0.8;
        let buckets = aggregate_by_day(&[a], RateMode::Weighted);

        let projection = buckets[0].cost_per_result();
        assert_eq!(projection.len(), 4);
        assert_eq!(projection[1].label, "Link Clicks");
        assert!((projection[1].cost - 0.8).abs() < 1e-9);
    }
}
