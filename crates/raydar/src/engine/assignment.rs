use super::domain::{Coordinates, Lead, LeadStatus, Setter, SolarCategory};
use super::geo;
use super::knockability;
use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_MAX_DISTANCE_MILES: f64 = 50.0;
pub const DEFAULT_STALE_DAYS: i64 = 5;

/// Tuning knobs for a single allocation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentOptions {
    /// Furthest a lead may sit from a setter's home to be assignable.
    #[serde(rename = "maxDistance")]
    pub max_distance_miles: f64,
    /// When set, only leads in these solar categories are considered. When
    /// unset, every category except `poor` is eligible.
    pub only_categories: Option<Vec<SolarCategory>>,
    /// Restrict the run to leads nobody owns yet.
    pub only_unclaimed: bool,
    /// Compute the full result without proposing any record updates.
    pub dry_run: bool,
    /// Process leads in knockability order instead of input order. Changes
    /// the greedy distribution; off by default to match the historical
    /// input-order behavior.
    pub order_by_knockability: bool,
}

impl Default for AssignmentOptions {
    fn default() -> Self {
        Self {
            max_distance_miles: DEFAULT_MAX_DISTANCE_MILES,
            only_categories: None,
            only_unclaimed: true,
            dry_run: false,
            order_by_knockability: false,
        }
    }
}

/// One lead-to-setter decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDecision {
    pub lead_id: String,
    pub setter_id: String,
    pub distance_miles: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetterAssignmentCount {
    pub setter_id: String,
    pub name: String,
    pub assigned: usize,
}

/// Aggregate view of an allocation run. Per-setter counts are emitted in
/// setter-id order so repeated dry runs over the same snapshot serialize
/// identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub total_considered: usize,
    pub total_assigned: usize,
    pub total_skipped: usize,
    pub dry_run: bool,
    pub assignments: Vec<AssignmentDecision>,
    pub per_setter: Vec<SetterAssignmentCount>,
    pub errors: Vec<String>,
}

/// Result of an allocation run. `leads`/`setters` carry the proposed record
/// updates and are omitted on dry runs; the caller applies them to storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<Lead>>,
    #[serde(rename = "users", skip_serializing_if = "Option::is_none")]
    pub setters: Option<Vec<Setter>>,
    pub summary: AssignmentSummary,
}

/// Stale-lead redistribution result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleReassignment {
    pub stale_lead_ids: Vec<String>,
    #[serde(flatten)]
    pub outcome: AssignmentOutcome,
}

/// Greedy distance/workload-balancing allocation over unclaimed leads.
///
/// Each eligible lead is matched to the in-range setter with the lowest
/// current workload, ties broken by distance. Workload counters are seeded
/// from pre-existing claims and incremented as the run proceeds, so the
/// output is order-dependent by design (greedy online balancing).
pub fn auto_assign(
    leads: &[Lead],
    setters: &[Setter],
    options: &AssignmentOptions,
    now: DateTime<Utc>,
) -> AssignmentOutcome {
    let candidates: Vec<usize> = leads
        .iter()
        .enumerate()
        .filter(|(_, lead)| lead_eligible(lead, options))
        .map(|(index, _)| index)
        .collect();

    allocate(leads, setters, candidates, options, now, false)
}

/// Identical computation to [`auto_assign`] with `dry_run` forced on; used to
/// show "N leads would go to M setters" before committing.
pub fn preview_assignments(
    leads: &[Lead],
    setters: &[Setter],
    options: &AssignmentOptions,
    now: DateTime<Utc>,
) -> AssignmentSummary {
    let preview = AssignmentOptions {
        dry_run: true,
        ..options.clone()
    };
    auto_assign(leads, setters, &preview, now).summary
}

/// Leads claimed (or later) but never dispositioned, whose ownership
/// timestamp is older than `stale_days`. A lead with no ownership timestamp
/// cannot be aged and is never stale.
pub fn stale_leads(leads: &[Lead], stale_days: i64, now: DateTime<Utc>) -> Vec<&Lead> {
    let cutoff = now - Duration::days(stale_days);
    leads
        .iter()
        .filter(|lead| {
            lead.status.is_claimed_or_later()
                && lead.dispositioned_at.is_none()
                && lead
                    .ownership_reference()
                    .map_or(false, |owned_at| owned_at < cutoff)
        })
        .collect()
}

/// Redistribute stale leads with the same greedy allocation, excluding each
/// lead's current owner from its candidate pool so the lead actually moves.
pub fn reassign_stale_leads(
    leads: &[Lead],
    setters: &[Setter],
    options: &AssignmentOptions,
    stale_days: i64,
    now: DateTime<Utc>,
) -> StaleReassignment {
    let stale_lead_ids: Vec<String> = stale_leads(leads, stale_days, now)
        .iter()
        .map(|lead| lead.id.clone())
        .collect();
    // Stale leads are already claimed; only the coordinate requirement
    // applies here, the unclaimed/category filters do not.
    let candidates: Vec<usize> = leads
        .iter()
        .enumerate()
        .filter(|(_, lead)| {
            stale_lead_ids.iter().any(|id| *id == lead.id) && lead.coordinates().is_some()
        })
        .map(|(index, _)| index)
        .collect();

    let outcome = allocate(leads, setters, candidates, options, now, true);

    StaleReassignment {
        stale_lead_ids,
        outcome,
    }
}

fn lead_eligible(lead: &Lead, options: &AssignmentOptions) -> bool {
    if options.only_unclaimed && (lead.status != LeadStatus::Unclaimed || lead.claimed_by.is_some())
    {
        return false;
    }
    if lead.coordinates().is_none() {
        return false;
    }
    match &options.only_categories {
        Some(allowed) => lead
            .solar_category
            .map_or(false, |category| allowed.contains(&category)),
        // Default policy: poor-roof leads are never worth a knock.
        None => lead.solar_category != Some(SolarCategory::Poor),
    }
}

/// Active (not yet dispositioned) leads currently claimed by each setter.
fn seeded_workloads<'a>(leads: &[Lead], setters: &'a [Setter]) -> BTreeMap<&'a str, usize> {
    setters
        .iter()
        .map(|setter| {
            let load = leads
                .iter()
                .filter(|lead| {
                    lead.claimed_by.as_deref() == Some(setter.id.as_str())
                        && lead.dispositioned_at.is_none()
                })
                .count();
            (setter.id.as_str(), load)
        })
        .collect()
}

fn allocate(
    leads: &[Lead],
    setters: &[Setter],
    mut candidates: Vec<usize>,
    options: &AssignmentOptions,
    now: DateTime<Utc>,
    exclude_current_owner: bool,
) -> AssignmentOutcome {
    if options.order_by_knockability {
        let current_hour = now.hour();
        let mut scored: Vec<(u8, usize)> = candidates
            .iter()
            .map(|&index| (knockability::score(&leads[index], current_hour, now).total, index))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| leads[a.1].id.cmp(&leads[b.1].id)));
        candidates = scored.into_iter().map(|(_, index)| index).collect();
    }

    let eligible_setters: Vec<(&Setter, Coordinates)> = setters
        .iter()
        .filter(|setter| setter.is_active)
        .filter_map(|setter| setter.home().map(|home| (setter, home)))
        .collect();
    let mut workloads = seeded_workloads(leads, setters);

    let mut updated_leads = leads.to_vec();
    let mut assignments = Vec::new();
    let mut per_setter: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total_skipped = 0usize;
    let total_considered = candidates.len();

    for index in candidates {
        let lead = &leads[index];
        let Some(origin) = lead.coordinates() else {
            total_skipped += 1;
            continue;
        };
        let excluded_owner = if exclude_current_owner {
            lead.claimed_by.as_deref().or(lead.assigned_to.as_deref())
        } else {
            None
        };

        let mut best: Option<(usize, f64, &Setter)> = None;
        for (setter, home) in &eligible_setters {
            if excluded_owner == Some(setter.id.as_str()) {
                continue;
            }
            let distance = geo::distance_miles(origin, *home);
            if !distance.is_finite() || distance > options.max_distance_miles {
                continue;
            }
            let load = workloads.get(setter.id.as_str()).copied().unwrap_or(0);
            let better = match &best {
                None => true,
                Some((best_load, best_distance, best_setter)) => {
                    match load.cmp(best_load).then_with(|| {
                        distance
                            .partial_cmp(best_distance)
                            .unwrap_or(Ordering::Equal)
                    }) {
                        Ordering::Less => true,
                        Ordering::Greater => false,
                        Ordering::Equal => setter.id < best_setter.id,
                    }
                }
            };
            if better {
                best = Some((load, distance, *setter));
            }
        }

        let Some((load, distance, chosen)) = best else {
            debug!(lead_id = %lead.id, "no setter within range, skipping lead");
            total_skipped += 1;
            continue;
        };

        assignments.push(AssignmentDecision {
            lead_id: lead.id.clone(),
            setter_id: chosen.id.clone(),
            distance_miles: distance,
            reason: format!("{distance:.1} mi from home, {load} active leads at assignment"),
        });
        *per_setter.entry(chosen.id.as_str()).or_insert(0) += 1;
        // The running count, not storage, drives later decisions in this run.
        *workloads.entry(chosen.id.as_str()).or_insert(0) += 1;

        if !options.dry_run {
            let updated = &mut updated_leads[index];
            updated.assigned_to = Some(chosen.id.clone());
            updated.assigned_at = Some(now);
            updated.auto_assigned = true;
            updated.claimed_by = Some(chosen.id.clone());
            updated.claimed_at = Some(now);
            updated.status = LeadStatus::Claimed;
        }
    }

    let per_setter = per_setter
        .into_iter()
        .map(|(setter_id, assigned)| SetterAssignmentCount {
            setter_id: setter_id.to_string(),
            name: setters
                .iter()
                .find(|s| s.id == setter_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            assigned,
        })
        .collect();

    let summary = AssignmentSummary {
        total_considered,
        total_assigned: assignments.len(),
        total_skipped,
        dry_run: options.dry_run,
        assignments,
        per_setter,
        errors: Vec::new(),
    };

    debug!(
        assigned = summary.total_assigned,
        skipped = summary.total_skipped,
        dry_run = summary.dry_run,
        "allocation run complete"
    );

    let (leads, setters) = if options.dry_run {
        (None, None)
    } else {
        (Some(updated_leads), Some(setters.to_vec()))
    };

    AssignmentOutcome {
        leads,
        setters,
        summary,
    }
}
