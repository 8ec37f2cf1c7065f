use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One campaign/day performance row as exported by the upstream ads API.
///
/// The export is loosely typed: numerics arrive as JSON numbers or quoted
/// strings depending on the path the row took, and absent fields are common.
/// Everything numeric deserializes leniently and coerces to zero. Dates stay
/// raw strings here; [`AdRecord::from_raw`] parses and truncates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAdRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub other_id: String,
    #[serde(default)]
    pub campaign_name: String,
    #[serde(default)]
    pub date_start: String,
    #[serde(default)]
    pub date_stop: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default, rename = "DisplayName")]
    pub display_name: String,
    #[serde(default)]
    pub partner: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub unique_clicks: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub reach: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub spend: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cpc: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cpm: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub frequency: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unique_ctr: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_lead: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub unique_actions_link_click: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_landing_page_view: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_link_click: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_omni_landing_page_view: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_page_engagement: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_post_engagement: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_post_reaction: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub actions_video_view: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_per_action_type_landing_page_view: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_per_action_type_link_click: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_per_action_type_page_engagement: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_per_action_type_video_view: f64,
    #[serde(default)]
    pub created_at: String,
}

/// One immutable campaign/day performance row. Engines only read these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    /// Stable row identity, unique within a snapshot.
    pub id: String,
    /// Row id assigned by the upstream export, kept for traceability.
    pub source_id: String,
    pub campaign_name: String,
    pub objective: String,
    /// Upstream `DisplayName`: the customer the campaign belongs to.
    pub customer_name: String,
    pub partner: String,
    pub order_id: String,
    pub date_start: NaiveDate,
    pub date_stop: NaiveDate,
    pub impressions: u64,
    pub clicks: u64,
    pub unique_clicks: u64,
    pub reach: u64,
    /// Currency spent on this row's day.
    pub spend: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub frequency: f64,
    pub unique_ctr: f64,
    /// Landing-page-view conversions the upstream export reports as leads.
    pub leads: u64,
    pub unique_link_clicks: u64,
    pub actions: ActionCounts,
    pub action_costs: ActionCosts,
    /// Upstream ingest timestamp, used to reconcile duplicate ids.
    pub created_at: Option<DateTime<Utc>>,
}

impl AdRecord {
    /// Convert an upstream row into the typed record.
    ///
    /// Returns `None` when `date_start` cannot be parsed; `date_stop` falls
    /// back to `date_start` when missing or malformed. When the export omits
    /// `id` the original row id stands in for it.
    pub fn from_raw(raw: RawAdRecord) -> Option<Self> {
        let date_start = parse_calendar_date(&raw.date_start)?;
        let date_stop = parse_calendar_date(&raw.date_stop).unwrap_or(date_start);
        let id = if raw.id.is_empty() {
            raw.other_id.clone()
        } else {
            raw.id.clone()
        };

        Some(Self {
            id,
            source_id: raw.other_id,
            campaign_name: raw.campaign_name,
            objective: raw.objective,
            customer_name: raw.display_name,
            partner: raw.partner,
            order_id: raw.order_id,
            date_start,
            date_stop,
            impressions: raw.impressions,
            clicks: raw.clicks,
            unique_clicks: raw.unique_clicks,
            reach: raw.reach,
            spend: raw.spend,
            ctr: raw.ctr,
            cpc: raw.cpc,
            cpm: raw.cpm,
            frequency: raw.frequency,
            unique_ctr: raw.unique_ctr,
            leads: raw.actions_lead,
            unique_link_clicks: raw.unique_actions_link_click,
            actions: ActionCounts {
                landing_page_view: raw.actions_landing_page_view,
                link_click: raw.actions_link_click,
                omni_landing_page_view: raw.actions_omni_landing_page_view,
                page_engagement: raw.actions_page_engagement,
                post_engagement: raw.actions_post_engagement,
                post_reaction: raw.actions_post_reaction,
                video_view: raw.actions_video_view,
            },
            action_costs: ActionCosts {
                landing_page_view: raw.cost_per_action_type_landing_page_view,
                link_click: raw.cost_per_action_type_link_click,
                page_engagement: raw.cost_per_action_type_page_engagement,
                video_view: raw.cost_per_action_type_video_view,
            },
            created_at: parse_timestamp(&raw.created_at),
        })
    }
}

/// Per-action-type conversion counts. All additive across rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    pub landing_page_view: u64,
    pub link_click: u64,
    pub omni_landing_page_view: u64,
    pub page_engagement: u64,
    pub post_engagement: u64,
    pub post_reaction: u64,
    pub video_view: u64,
}

impl ActionCounts {
    /// Sum across all seven tracked action types.
    pub fn total(&self) -> u64 {
        self.landing_page_view
            + self.link_click
            + self.omni_landing_page_view
            + self.page_engagement
            + self.post_engagement
            + self.post_reaction
            + self.video_view
    }
}

/// Upstream per-row cost-per-action figures for the four costed action
/// types. Non-additive; averaging rules live in the analytics crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionCosts {
    pub landing_page_view: f64,
    pub link_click: f64,
    pub page_engagement: f64,
    pub video_view: f64,
}

/// The six reportable action categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    LandingPageView,
    LinkClick,
    PageEngagement,
    PostEngagement,
    PostReaction,
    VideoView,
}

impl ActionKind {
    /// All six categories, in the order reports present them.
    pub const ALL: [ActionKind; 6] = [
        ActionKind::LandingPageView,
        ActionKind::LinkClick,
        ActionKind::PageEngagement,
        ActionKind::PostEngagement,
        ActionKind::PostReaction,
        ActionKind::VideoView,
    ];

    /// The categories the upstream export carries a unit cost for.
    pub const COSTED: [ActionKind; 4] = [
        ActionKind::LandingPageView,
        ActionKind::LinkClick,
        ActionKind::PageEngagement,
        ActionKind::VideoView,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::LandingPageView => "Landing Page Views",
            ActionKind::LinkClick => "Link Clicks",
            ActionKind::PageEngagement => "Page Engagement",
            ActionKind::PostEngagement => "Post Engagement",
            ActionKind::PostReaction => "Post Reactions",
            ActionKind::VideoView => "Video Views",
        }
    }

    pub fn count_in(&self, counts: &ActionCounts) -> u64 {
        match self {
            ActionKind::LandingPageView => counts.landing_page_view,
            ActionKind::LinkClick => counts.link_click,
            ActionKind::PageEngagement => counts.page_engagement,
            ActionKind::PostEngagement => counts.post_engagement,
            ActionKind::PostReaction => counts.post_reaction,
            ActionKind::VideoView => counts.video_view,
        }
    }

    /// Unit cost reported upstream, when the export carries one.
    pub fn cost_in(&self, costs: &ActionCosts) -> Option<f64> {
        match self {
            ActionKind::LandingPageView => Some(costs.landing_page_view),
            ActionKind::LinkClick => Some(costs.link_click),
            ActionKind::PageEngagement => Some(costs.page_engagement),
            ActionKind::VideoView => Some(costs.video_view),
            ActionKind::PostEngagement | ActionKind::PostReaction => None,
        }
    }
}

/// How aggregates finalize non-additive rate metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMode {
    /// Recompute each rate from summed numerators and denominators.
    #[default]
    Weighted,
    /// Arithmetic mean of per-record rates, matching the upstream dashboard.
    RecordMean,
}

/// Parse an upstream date that may be a bare `YYYY-MM-DD` or carry a time
/// component after `T` or a space; anything past the date part is dropped.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split(&['T', ' '][..]).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    // Exports without an offset are taken as UTC.
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = coerce_f64(&value);
    if number.is_sign_negative() {
        return Ok(0);
    }
    Ok(number as u64)
}

fn coerce_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
