use super::assignment::{
    self, AssignmentOptions, AssignmentSummary, DEFAULT_MAX_DISTANCE_MILES, DEFAULT_STALE_DAYS,
};
use super::domain::{Lead, Setter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A setter carrying more than this many active leads gets flagged.
pub const OVERLOAD_THRESHOLD: usize = 20;
const TOP_PERFORMER_COUNT: usize = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CronOptions {
    pub dry_run: bool,
    pub stale_days: i64,
    #[serde(rename = "maxDistance")]
    pub max_distance_miles: f64,
}

impl Default for CronOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            stale_days: DEFAULT_STALE_DAYS,
            max_distance_miles: DEFAULT_MAX_DISTANCE_MILES,
        }
    }
}

/// Per-setter activity counts, recomputed by scanning the lead list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetterStats {
    pub setter_id: String,
    pub name: String,
    pub total: usize,
    pub claimed: usize,
    pub dispositioned: usize,
    pub stale: usize,
}

/// Everything the daily run produces. A deterministic function of the input
/// snapshot: two dry runs over the same data yield identical results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCronResult {
    pub stale_lead_ids: Vec<String>,
    pub reassignment: AssignmentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<Lead>>,
    pub setter_stats: Vec<SetterStats>,
    pub notifications: Vec<String>,
}

/// Sequence the daily maintenance pass: stale-lead detection, redistribution,
/// per-setter stats, and notification text. Delivery of the notifications is
/// the caller's concern; nothing here performs I/O.
pub fn run_daily_cron(
    leads: &[Lead],
    setters: &[Setter],
    options: &CronOptions,
    now: DateTime<Utc>,
) -> DailyCronResult {
    let assignment_options = AssignmentOptions {
        max_distance_miles: options.max_distance_miles,
        dry_run: options.dry_run,
        ..AssignmentOptions::default()
    };

    let reassigned = assignment::reassign_stale_leads(
        leads,
        setters,
        &assignment_options,
        options.stale_days,
        now,
    );
    let stale_lead_ids = reassigned.stale_lead_ids;
    let reassignment = reassigned.outcome.summary;

    // Stats reflect the snapshot the run started from, matching what the
    // team saw before redistribution took effect.
    let setter_stats: Vec<SetterStats> = setters
        .iter()
        .filter(|setter| setter.is_active)
        .map(|setter| {
            let owned: Vec<&Lead> = leads
                .iter()
                .filter(|lead| lead.claimed_by.as_deref() == Some(setter.id.as_str()))
                .collect();
            let claimed = owned
                .iter()
                .filter(|lead| lead.dispositioned_at.is_none())
                .count();
            let dispositioned = owned.len() - claimed;
            let stale = owned
                .iter()
                .filter(|lead| stale_lead_ids.iter().any(|id| *id == lead.id))
                .count();
            SetterStats {
                setter_id: setter.id.clone(),
                name: setter.name.clone(),
                total: owned.len(),
                claimed,
                dispositioned,
                stale,
            }
        })
        .collect();

    let notifications = build_notifications(
        &stale_lead_ids,
        &reassignment,
        &setter_stats,
        options,
    );

    info!(
        stale = stale_lead_ids.len(),
        reassigned = reassignment.total_assigned,
        dry_run = options.dry_run,
        "daily cron pass complete"
    );

    DailyCronResult {
        stale_lead_ids,
        reassignment,
        leads: reassigned.outcome.leads,
        setter_stats,
        notifications,
    }
}

fn build_notifications(
    stale_lead_ids: &[String],
    reassignment: &AssignmentSummary,
    setter_stats: &[SetterStats],
    options: &CronOptions,
) -> Vec<String> {
    let mut notifications = Vec::new();

    notifications.push(format!(
        "{} stale lead(s) detected (no disposition within {} days)",
        stale_lead_ids.len(),
        options.stale_days
    ));

    let suffix = if options.dry_run { " (dry run)" } else { "" };
    notifications.push(format!(
        "Reassigned {} stale lead(s) across {} setter(s){}",
        reassignment.total_assigned,
        reassignment.per_setter.len(),
        suffix
    ));

    for stats in setter_stats {
        if stats.claimed > OVERLOAD_THRESHOLD {
            notifications.push(format!(
                "{} is carrying {} active leads",
                stats.name, stats.claimed
            ));
        }
    }

    let mut performers: Vec<&SetterStats> = setter_stats
        .iter()
        .filter(|stats| stats.dispositioned > 0)
        .collect();
    performers.sort_by(|a, b| {
        b.dispositioned
            .cmp(&a.dispositioned)
            .then_with(|| a.setter_id.cmp(&b.setter_id))
    });
    if !performers.is_empty() {
        let line = performers
            .iter()
            .take(TOP_PERFORMER_COUNT)
            .map(|stats| format!("{} ({} dispositioned)", stats.name, stats.dispositioned))
            .collect::<Vec<_>>()
            .join(", ");
        notifications.push(format!("Top performers: {line}"));
    }

    notifications
}
