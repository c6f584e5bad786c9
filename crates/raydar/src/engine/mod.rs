//! The computation core: everything here is synchronous, allocation-free of
//! I/O, and operates on snapshots of leads, setters, and territories that the
//! caller has already loaded. The engine proposes updated records; applying
//! them to storage is the caller's job.

pub mod assignment;
pub mod cron;
pub mod domain;
pub mod geo;
pub mod knockability;
pub mod territory;

pub use assignment::{
    auto_assign, preview_assignments, reassign_stale_leads, stale_leads, AssignmentDecision,
    AssignmentOptions, AssignmentOutcome, AssignmentSummary, SetterAssignmentCount,
    StaleReassignment,
};
pub use cron::{run_daily_cron, CronOptions, DailyCronResult, SetterStats};
pub use domain::{Coordinates, Lead, LeadStatus, Setter, SolarCategory, Territory};
pub use knockability::{KnockabilityScore, RankedLead};
pub use territory::find_territory;
