//! Record fixtures shared by the engine tests.

use adboard_core::types::{AdRecord, RawAdRecord};

/// A typed record with the given identity and date; everything else zeroed.
/// Tests set the metric fields they care about directly.
pub(crate) fn record(id: &str, date: &str, campaign: &str) -> AdRecord {
    AdRecord::from_raw(RawAdRecord {
        id: id.to_string(),
        date_start: date.to_string(),
        campaign_name: campaign.to_string(),
        ..Default::default()
    })
    .expect("fixture date must parse")
}
