use chrono::{Duration, Utc};
use raydar::engine::{
    auto_assign, geo, preview_assignments, AssignmentOptions, Lead, LeadStatus, Setter,
    SolarCategory,
};

fn lead(id: &str, lat: f64, lng: f64, category: SolarCategory) -> Lead {
    let mut lead: Lead =
        serde_json::from_str(&format!(r#"{{ "id": "{id}" }}"#)).expect("lead parses");
    lead.latitude = Some(lat);
    lead.longitude = Some(lng);
    lead.solar_category = Some(category);
    lead.created_at = Some(Utc::now() - Duration::days(1));
    lead
}

fn setter(id: &str, name: &str, lat: f64, lng: f64) -> Setter {
    Setter {
        id: id.to_string(),
        name: name.to_string(),
        home_latitude: Some(lat),
        home_longitude: Some(lng),
        is_active: true,
    }
}

#[test]
fn every_assignment_is_within_max_distance() {
    let leads = vec![
        lead("near", 40.00, -111.00, SolarCategory::Good),
        lead("mid", 40.30, -111.00, SolarCategory::Good),
        lead("far", 44.00, -111.00, SolarCategory::Good),
    ];
    let setters = vec![setter("s1", "Ana", 40.0, -111.0)];
    let options = AssignmentOptions {
        max_distance_miles: 25.0,
        ..AssignmentOptions::default()
    };

    let outcome = auto_assign(&leads, &setters, &options, Utc::now());

    for decision in &outcome.summary.assignments {
        assert!(
            decision.distance_miles <= options.max_distance_miles,
            "{} assigned at {} mi",
            decision.lead_id,
            decision.distance_miles
        );
    }
    assert_eq!(outcome.summary.total_assigned, 2);
    assert_eq!(outcome.summary.total_skipped, 1);
}

#[test]
fn workload_balance_splits_leads_between_equidistant_setters() {
    // Three leads equidistant from two setters: the greedy balancer must
    // produce a 2/1 split, never all three to one setter.
    let leads = vec![
        lead("l1", 40.0, -111.0, SolarCategory::Good),
        lead("l2", 40.0, -111.0, SolarCategory::Good),
        lead("l3", 40.0, -111.0, SolarCategory::Good),
    ];
    let setters = vec![
        setter("s1", "Ana", 40.1, -111.0),
        setter("s2", "Ben", 39.9, -111.0),
    ];

    let outcome = auto_assign(&leads, &setters, &AssignmentOptions::default(), Utc::now());

    assert_eq!(outcome.summary.total_assigned, 3);
    let counts: Vec<usize> = outcome
        .summary
        .per_setter
        .iter()
        .map(|entry| entry.assigned)
        .collect();
    let max = counts.iter().copied().max().expect("two setters counted");
    let min = counts.iter().copied().min().expect("two setters counted");
    assert_eq!((max, min), (2, 1), "expected a 2/1 split, got {counts:?}");
}

#[test]
fn workload_seeds_count_existing_claims() {
    // Ana already carries two active leads, so the fresh lead goes to Ben
    // even though Ana is closer.
    let mut existing_one = lead("owned-1", 40.0, -111.0, SolarCategory::Good);
    existing_one.status = LeadStatus::Claimed;
    existing_one.claimed_by = Some("s1".to_string());
    let mut existing_two = existing_one.clone();
    existing_two.id = "owned-2".to_string();

    let leads = vec![
        existing_one,
        existing_two,
        lead("fresh", 40.0, -111.0, SolarCategory::Good),
    ];
    let setters = vec![
        setter("s1", "Ana", 40.01, -111.0),
        setter("s2", "Ben", 40.20, -111.0),
    ];

    let outcome = auto_assign(&leads, &setters, &AssignmentOptions::default(), Utc::now());

    assert_eq!(outcome.summary.total_assigned, 1);
    assert_eq!(outcome.summary.assignments[0].lead_id, "fresh");
    assert_eq!(outcome.summary.assignments[0].setter_id, "s2");
}

#[test]
fn dry_run_omits_updates_and_matches_preview() {
    let leads = vec![
        lead("l1", 40.0, -111.0, SolarCategory::Great),
        lead("l2", 40.0, -111.0, SolarCategory::Poor),
    ];
    let setters = vec![setter("s1", "Ana", 40.0, -111.0)];
    let now = Utc::now();
    let options = AssignmentOptions {
        dry_run: true,
        ..AssignmentOptions::default()
    };

    let outcome = auto_assign(&leads, &setters, &options, now);
    assert!(outcome.leads.is_none());
    assert!(outcome.setters.is_none());
    assert!(outcome.summary.dry_run);

    let preview = preview_assignments(&leads, &setters, &AssignmentOptions::default(), now);
    assert_eq!(outcome.summary, preview);

    // Repeated previews over unchanged input serialize identically.
    let again = preview_assignments(&leads, &setters, &AssignmentOptions::default(), now);
    let first = serde_json::to_string(&preview).expect("summary serializes");
    let second = serde_json::to_string(&again).expect("summary serializes");
    assert_eq!(first, second);
}

#[test]
fn claimed_leads_are_untouched_when_only_unclaimed_is_set() {
    let mut claimed = lead("claimed", 40.0, -111.0, SolarCategory::Good);
    claimed.status = LeadStatus::Interested;
    claimed.claimed_by = Some("s9".to_string());

    let leads = vec![claimed, lead("open", 40.0, -111.0, SolarCategory::Good)];
    let setters = vec![setter("s1", "Ana", 40.0, -111.0)];

    let outcome = auto_assign(&leads, &setters, &AssignmentOptions::default(), Utc::now());

    assert_eq!(outcome.summary.total_assigned, 1);
    let updated = outcome.leads.expect("updates returned");
    assert_eq!(updated[0].claimed_by.as_deref(), Some("s9"));
    assert_eq!(updated[0].status, LeadStatus::Interested);
    assert_eq!(updated[1].claimed_by.as_deref(), Some("s1"));
}

#[test]
fn reported_distances_agree_with_the_haversine() {
    let leads = vec![lead("l1", 40.0, -111.0, SolarCategory::Good)];
    let setters = vec![setter("s1", "Ana", 40.2, -111.1)];

    let outcome = auto_assign(&leads, &setters, &AssignmentOptions::default(), Utc::now());

    let decision = &outcome.summary.assignments[0];
    let expected = geo::distance_miles(
        raydar::engine::Coordinates::new(40.0, -111.0),
        raydar::engine::Coordinates::new(40.2, -111.1),
    );
    assert!((decision.distance_miles - expected).abs() < 1e-9);
}
