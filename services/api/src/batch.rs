use crate::infra::load_snapshot;
use chrono::Utc;
use clap::Args;
use raydar::engine::{
    preview_assignments, run_daily_cron, AssignmentOptions, AssignmentSummary, CronOptions,
};
use raydar::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CronRunArgs {
    /// JSON snapshot of leads and users exported from the storage layer
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Compute the full report without proposing record updates
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Days without disposition before a claimed lead counts as stale
    #[arg(long)]
    pub(crate) stale_days: Option<i64>,
    /// Furthest a lead may sit from a setter's home, in miles
    #[arg(long)]
    pub(crate) max_distance: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// JSON snapshot of leads and users exported from the storage layer
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Furthest a lead may sit from a setter's home, in miles
    #[arg(long)]
    pub(crate) max_distance: Option<f64>,
    /// Process leads in knockability order instead of input order
    #[arg(long)]
    pub(crate) by_knockability: bool,
}

pub(crate) fn run_daily_cron_batch(args: CronRunArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(&args.snapshot)?;

    let mut options = CronOptions {
        dry_run: args.dry_run,
        ..CronOptions::default()
    };
    if let Some(stale_days) = args.stale_days {
        options.stale_days = stale_days;
    }
    if let Some(max_distance) = args.max_distance {
        options.max_distance_miles = max_distance;
    }

    let result = run_daily_cron(&snapshot.leads, &snapshot.users, &options, Utc::now());

    println!(
        "Daily cron pass over {} lead(s), {} user(s){}",
        snapshot.leads.len(),
        snapshot.users.len(),
        if options.dry_run { " [dry run]" } else { "" }
    );
    for line in &result.notifications {
        println!("  {line}");
    }

    println!("\nPer-setter activity:");
    for stats in &result.setter_stats {
        println!(
            "  {}: {} total, {} active, {} dispositioned, {} stale",
            stats.name, stats.total, stats.claimed, stats.dispositioned, stats.stale
        );
    }

    render_summary(&result.reassignment);
    Ok(())
}

pub(crate) fn run_assignment_preview(args: PreviewArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(&args.snapshot)?;

    let mut options = AssignmentOptions {
        order_by_knockability: args.by_knockability,
        ..AssignmentOptions::default()
    };
    if let Some(max_distance) = args.max_distance {
        options.max_distance_miles = max_distance;
    }

    let summary = preview_assignments(&snapshot.leads, &snapshot.users, &options, Utc::now());

    println!(
        "{} of {} eligible lead(s) would be assigned to {} setter(s); {} out of range",
        summary.total_assigned,
        summary.total_considered,
        summary.per_setter.len(),
        summary.total_skipped
    );
    render_summary(&summary);
    Ok(())
}

fn render_summary(summary: &AssignmentSummary) {
    if summary.assignments.is_empty() {
        return;
    }
    println!("\nAssignments:");
    for decision in &summary.assignments {
        println!(
            "  {} -> {} ({})",
            decision.lead_id, decision.setter_id, decision.reason
        );
    }
}
