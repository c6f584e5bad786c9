use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roof quality classification attached to a lead by the solar data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarCategory {
    Poor,
    Solid,
    Good,
    Great,
}

impl SolarCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Solid => "Solid",
            Self::Good => "Good",
            Self::Great => "Great",
        }
    }
}

/// Disposition lifecycle of a lead. `Unclaimed` is the only state in which a
/// lead has no owner; every other state is "claimed or later".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    #[default]
    Unclaimed,
    Claimed,
    NotHome,
    Interested,
    NotInterested,
    Appointment,
    Sale,
    GoBack,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unclaimed => "Unclaimed",
            Self::Claimed => "Claimed",
            Self::NotHome => "Not Home",
            Self::Interested => "Interested",
            Self::NotInterested => "Not Interested",
            Self::Appointment => "Appointment",
            Self::Sale => "Sale",
            Self::GoBack => "Go Back",
        }
    }

    pub const fn is_claimed_or_later(self) -> bool {
        !matches!(self, Self::Unclaimed)
    }
}

/// A WGS84 point. Geometry over these treats (longitude, latitude) as planar,
/// which is acceptable at neighborhood scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A sales prospect. Wire names follow the surrounding system's camelCase
/// JSON; timestamps are ISO-8601 UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_category: Option<SolarCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_score: Option<f64>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub auto_assigned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispositioned_at: Option<DateTime<Utc>>,
}

impl Lead {
    /// Leads without both coordinates are ineligible for any geo work.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Timestamp freshness is measured from: last disposition, falling back
    /// to creation.
    pub fn freshness_reference(&self) -> Option<DateTime<Utc>> {
        self.dispositioned_at.or(self.created_at)
    }

    /// Timestamp staleness is measured from: assignment, falling back to the
    /// original claim.
    pub fn ownership_reference(&self) -> Option<DateTime<Utc>> {
        self.assigned_at.or(self.claimed_at)
    }
}

/// A field agent ("setter") eligible to receive leads. Workload is always
/// recounted from the lead list, never stored, so the counter cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setter {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_longitude: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Setter {
    /// Geocoded home location; setters without one cannot take distance-based
    /// assignments.
    pub fn home(&self) -> Option<Coordinates> {
        match (self.home_latitude, self.home_longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

/// A manager-drawn polygon owning a geographic region. The boundary is
/// treated as closed even when the first and last vertices differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub id: String,
    pub owner_id: String,
    pub boundary: Vec<Coordinates>,
}
