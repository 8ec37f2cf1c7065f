//! Aggregation engines for the ads dashboard — period rollups, whole-dataset
//! summaries, campaign rankings, and action-type breakdowns.
//!
//! Every function here is a pure, deterministic transformation of an
//! in-memory record slice. None of them mutate their input, so callers can
//! run them concurrently over the same filtered snapshot; when a newer
//! filter cycle starts, its results simply replace the older ones.

pub mod actions;
pub mod campaigns;
pub mod period;
pub mod summary;

mod rates;
#[cfg(test)]
pub(crate) mod testutil;

pub use actions::{breakdown_actions, ActionBreakdown};
pub use campaigns::{rank_campaigns, CampaignPerformance};
pub use period::{
    aggregate_by_day, aggregate_by_month, aggregate_by_week, CostPerResult, PeriodBucket,
    PeriodKey,
};
pub use summary::{summarize, AnalyticsSummary, TimeSeriesPoint};
