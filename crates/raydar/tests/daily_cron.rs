use chrono::{Duration, Utc};
use raydar::engine::{run_daily_cron, CronOptions, Lead, LeadStatus, Setter};

fn lead(id: &str) -> Lead {
    let mut lead: Lead =
        serde_json::from_str(&format!(r#"{{ "id": "{id}" }}"#)).expect("lead parses");
    lead.latitude = Some(40.0);
    lead.longitude = Some(-111.0);
    lead
}

fn claimed_lead(id: &str, owner: &str, days_ago: i64) -> Lead {
    let mut lead = lead(id);
    lead.status = LeadStatus::Claimed;
    lead.claimed_by = Some(owner.to_string());
    lead.claimed_at = Some(Utc::now() - Duration::days(days_ago));
    lead
}

fn setter(id: &str, name: &str) -> Setter {
    Setter {
        id: id.to_string(),
        name: name.to_string(),
        home_latitude: Some(40.0),
        home_longitude: Some(-111.0),
        is_active: true,
    }
}

#[test]
fn daily_run_moves_stale_leads_and_reports_on_the_team() {
    let now = Utc::now();
    let mut dispositioned = claimed_lead("sold", "s2", 9);
    dispositioned.status = LeadStatus::Sale;
    dispositioned.dispositioned_at = Some(now - Duration::days(8));

    let leads = vec![
        claimed_lead("stale-a", "s1", 10),
        claimed_lead("stale-b", "s1", 7),
        claimed_lead("working", "s2", 2),
        dispositioned,
        lead("unclaimed"),
    ];
    let setters = vec![setter("s1", "Ana"), setter("s2", "Ben")];

    let result = run_daily_cron(&leads, &setters, &CronOptions::default(), now);

    assert_eq!(
        result.stale_lead_ids,
        vec!["stale-a".to_string(), "stale-b".to_string()]
    );
    assert_eq!(result.reassignment.total_assigned, 2);
    for decision in &result.reassignment.assignments {
        assert_eq!(decision.setter_id, "s2", "owner must be excluded");
    }

    let updated = result.leads.expect("updates proposed");
    let stale_a = updated
        .iter()
        .find(|l| l.id == "stale-a")
        .expect("stale-a present");
    assert_eq!(stale_a.claimed_by.as_deref(), Some("s2"));
    assert_eq!(stale_a.status, LeadStatus::Claimed);
    assert!(stale_a.auto_assigned);
    let untouched = updated
        .iter()
        .find(|l| l.id == "working")
        .expect("working present");
    assert_eq!(untouched.claimed_by.as_deref(), Some("s2"));

    assert!(result.notifications[0].starts_with("2 stale lead(s)"));
    assert!(result.notifications[1].starts_with("Reassigned 2"));
    assert!(result
        .notifications
        .iter()
        .any(|line| line.contains("Top performers: Ben (1 dispositioned)")));
}

#[test]
fn inactive_setters_are_invisible_to_the_daily_run() {
    let now = Utc::now();
    let leads = vec![claimed_lead("stale-a", "s1", 10)];
    let mut retired = setter("s2", "Ben");
    retired.is_active = false;
    let setters = vec![setter("s1", "Ana"), retired];

    let result = run_daily_cron(&leads, &setters, &CronOptions::default(), now);

    // The only alternative setter is inactive, so the stale lead stays put.
    assert_eq!(result.reassignment.total_assigned, 0);
    assert_eq!(result.reassignment.total_skipped, 1);
    assert_eq!(result.setter_stats.len(), 1, "inactive setters have no stats");
    assert_eq!(result.setter_stats[0].setter_id, "s1");
}

#[test]
fn custom_stale_threshold_is_honored() {
    let now = Utc::now();
    let leads = vec![claimed_lead("aging", "s1", 3)];
    let setters = vec![setter("s1", "Ana"), setter("s2", "Ben")];

    let default_run = run_daily_cron(&leads, &setters, &CronOptions::default(), now);
    assert!(default_run.stale_lead_ids.is_empty());

    let aggressive = CronOptions {
        stale_days: 2,
        ..CronOptions::default()
    };
    let aggressive_run = run_daily_cron(&leads, &setters, &aggressive, now);
    assert_eq!(aggressive_run.stale_lead_ids, vec!["aging".to_string()]);
}
