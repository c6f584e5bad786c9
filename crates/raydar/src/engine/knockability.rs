use super::domain::{Lead, SolarCategory};
use chrono::{DateTime, Utc};
use serde::Serialize;

const SOLAR_WEIGHT: f64 = 40.0;
const NO_SOLAR_DATA_POINTS: f64 = 20.0;
// No real clustering signal yet; the fixed baseline keeps component weights
// summing to 100 until neighborhood density is wired in.
const CLUSTERING_BASELINE: f64 = 5.0;

/// Per-component breakdown of a knockability score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub solar: f64,
    pub freshness: f64,
    pub time_of_day: f64,
    pub clustering: f64,
}

/// Composite priority score (0-100) used to sort leads for a setter's
/// attention, with human-readable reasons for each component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockabilityScore {
    pub total: u8,
    pub components: ComponentScores,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLead {
    pub lead_id: String,
    pub score: KnockabilityScore,
}

/// Weighted sum of solar fit (40), freshness (30), time-of-day fit (20), and
/// clustering (10). The total is a rounded sum, not re-normalized: 100 is
/// reachable only when every component hits its cap.
pub fn score(lead: &Lead, current_hour: u32, now: DateTime<Utc>) -> KnockabilityScore {
    let mut reasons = Vec::with_capacity(4);

    let solar = match (lead.solar_score, lead.solar_category) {
        (Some(numeric), _) => {
            let clamped = numeric.clamp(0.0, 100.0);
            let points = clamped / 100.0 * SOLAR_WEIGHT;
            reasons.push(format!("solar score {clamped:.0} of 100"));
            points
        }
        (None, Some(category)) => {
            let points = match category {
                SolarCategory::Great => 40.0,
                SolarCategory::Good => 30.0,
                SolarCategory::Solid => 20.0,
                SolarCategory::Poor => 5.0,
            };
            reasons.push(format!("solar category {}", category.label()));
            points
        }
        (None, None) => {
            reasons.push("no solar data".to_string());
            NO_SOLAR_DATA_POINTS
        }
    };

    let freshness = match lead.freshness_reference() {
        Some(reference) => {
            let days = (now - reference).num_days();
            let points = if days <= 2 {
                30.0
            } else if days <= 7 {
                20.0
            } else if days <= 14 {
                10.0
            } else {
                5.0
            };
            reasons.push(format!("last activity {} day(s) ago", days.max(0)));
            points
        }
        None => {
            reasons.push("no activity timestamps".to_string());
            5.0
        }
    };

    let time_of_day = match current_hour {
        9..=12 => {
            reasons.push("morning knocking window".to_string());
            20.0
        }
        13..=17 => {
            reasons.push("afternoon knocking window".to_string());
            15.0
        }
        18..=20 => {
            reasons.push("evening knocking window".to_string());
            10.0
        }
        _ => {
            reasons.push("outside knocking hours".to_string());
            5.0
        }
    };

    reasons.push("clustering baseline".to_string());

    let components = ComponentScores {
        solar,
        freshness,
        time_of_day,
        clustering: CLUSTERING_BASELINE,
    };
    let total = (solar + freshness + time_of_day + CLUSTERING_BASELINE)
        .round()
        .clamp(0.0, 100.0) as u8;

    KnockabilityScore {
        total,
        components,
        reasons,
    }
}

/// Score every lead and order descending by total. Ties break on lead id so
/// the ordering is deterministic regardless of input order.
pub fn rank(leads: &[Lead], current_hour: u32, now: DateTime<Utc>) -> Vec<RankedLead> {
    let mut ranked: Vec<RankedLead> = leads
        .iter()
        .map(|lead| RankedLead {
            lead_id: lead.id.clone(),
            score: score(lead, current_hour, now),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total
            .cmp(&a.score.total)
            .then_with(|| a.lead_id.cmp(&b.lead_id))
    });
    ranked
}
