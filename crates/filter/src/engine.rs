//! Predicate evaluation — applies a [`FilterSpec`] conjunction to a snapshot.

use adboard_core::types::AdRecord;
use tracing::debug;

use crate::spec::FilterSpec;

/// Return the records satisfying every set predicate. Unset predicates are
/// no-ops, so an empty spec returns the input unchanged.
pub fn apply_filters(records: &[AdRecord], spec: &FilterSpec) -> Vec<AdRecord> {
    if spec.is_empty() {
        return records.to_vec();
    }

    let filtered: Vec<AdRecord> = records
        .iter()
        .filter(|record| matches(record, spec))
        .cloned()
        .collect();
    debug!(
        total = records.len(),
        kept = filtered.len(),
        "applied filter spec"
    );
    filtered
}

fn matches(record: &AdRecord, spec: &FilterSpec) -> bool {
    if let Some(range) = &spec.date_range {
        if !range.contains(record.date_start) {
            return false;
        }
    }
    if !spec.campaigns.is_empty()
        && !spec
            .campaigns
            .iter()
            .any(|name| name == &record.campaign_name)
    {
        return false;
    }
    if !matches_any_substring(&record.partner, &spec.partners) {
        return false;
    }
    if !matches_any_substring(&record.order_id, &spec.order_ids) {
        return false;
    }
    if let Some(objective) = &spec.objective {
        if !contains_ci(&record.objective, objective) {
            return false;
        }
    }
    if let Some(customer) = &spec.customer {
        if !contains_ci(&record.customer_name, customer) {
            return false;
        }
    }
    if let Some(range) = &spec.spend {
        if !range.contains(record.spend) {
            return false;
        }
    }
    if let Some(range) = &spec.frequency {
        if !range.contains(record.frequency) {
            return false;
        }
    }
    true
}

/// Any-of match; an empty needle set matches everything.
fn matches_any_substring(haystack: &str, needles: &[String]) -> bool {
    needles.is_empty() || needles.iter().any(|needle| contains_ci(haystack, needle))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
