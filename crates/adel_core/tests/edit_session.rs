mod common;

use adel_core::{
    CommitOutcome, EditField, EditSession, EditSessionError, GatewayError, Project,
    ProjectGateway, ProjectUpdate, ProjectValidationError,
};
use common::{sample_project, FakeGateway};

#[test]
fn begin_seeds_draft_from_project() {
    let project = sample_project(12);
    let mut session = EditSession::new();

    let draft = session.begin(&project).unwrap().clone();
    assert_eq!(draft.name, "Project 12");
    assert_eq!(draft.progress, 35);
    assert_eq!(draft.budget, "10000");
    assert_eq!(draft.budget_used, "2500.5");
    assert_eq!(draft.deadline, "2025-09-30");
    assert_eq!(session.target_id(), Some(12));
    assert_eq!(session.original_deadline(), Some("2025-09-30T00:00:00.000Z"));
}

#[test]
fn deadline_seed_ignores_time_of_day_and_offset() {
    let mut session = EditSession::new();
    for raw in [
        "2025-03-10",
        "2025-03-10T00:00:00Z",
        "2025-03-10T00:00:00.000Z",
        "2025-03-10T23:59:59-08:00",
        "2025-03-10T00:30:00+09:00",
        "2025-03-10 21:15:00",
    ] {
        let mut project = Project::new(1, "Clinic");
        project.deadline = Some(raw.to_string());
        let draft = session.begin(&project).unwrap();
        assert_eq!(draft.deadline, "2025-03-10", "source deadline {raw}");
    }
}

#[test]
fn edits_never_touch_the_source_project() {
    let project = sample_project(4);
    let snapshot = project.clone();
    let mut session = EditSession::new();
    session.begin(&project).unwrap();

    session.update_field(EditField::Name, "Renamed").unwrap();
    session.update_field(EditField::Progress, "90").unwrap();
    session.update_field(EditField::Budget, "").unwrap();
    session.update_field(EditField::Deadline, "2026-01-15").unwrap();

    assert_eq!(project, snapshot);
    assert_eq!(session.draft().unwrap().name, "Renamed");
}

#[test]
fn commit_builds_partial_payload_and_clears_session() {
    let gateway = FakeGateway::with_projects(vec![sample_project(8)]);
    let project = sample_project(8);
    let mut session = EditSession::new();
    session.begin(&project).unwrap();
    session.update_field(EditField::Budget, "").unwrap();
    session.update_field(EditField::BudgetUsed, "").unwrap();
    session.update_field(EditField::Deadline, "").unwrap();
    session.update_field(EditField::Progress, "60").unwrap();

    let outcome = session.commit(&gateway).unwrap();
    assert_eq!(outcome, CommitOutcome::Committed { target_id: 8 });
    assert!(outcome.requires_refresh());
    assert!(!session.is_open());

    let sent = gateway.sent_updates.borrow();
    assert_eq!(
        sent.as_slice(),
        &[(
            8,
            ProjectUpdate {
                name: "Project 8".to_string(),
                progress: 60,
                description: Some("Clean water for the district".to_string()),
                deadline: None,
                budget: None,
                budget_used: 0.0,
            }
        )]
    );
}

#[test]
fn failed_commit_preserves_draft_and_retry_resends_identical_payload() {
    let gateway = FakeGateway::with_projects(vec![sample_project(5)]);
    gateway.fail_next_update();
    let mut session = EditSession::new();
    session.begin(&sample_project(5)).unwrap();
    session.update_field(EditField::Name, "Solar pumps").unwrap();

    let first = session.commit(&gateway).unwrap();
    assert_eq!(
        first,
        CommitOutcome::Failed {
            target_id: 5,
            error: GatewayError::Network("connection reset".to_string()),
        }
    );
    assert!(session.is_open());
    assert!(!session.is_commit_in_flight());
    assert_eq!(session.draft().unwrap().name, "Solar pumps");

    let second = session.commit(&gateway).unwrap();
    assert_eq!(second, CommitOutcome::Committed { target_id: 5 });

    let sent = gateway.sent_updates.borrow();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[test]
fn second_commit_is_blocked_while_first_is_in_flight() {
    let mut session = EditSession::new();
    session.begin(&sample_project(3)).unwrap();

    let pending = session.prepare_commit().unwrap();
    assert_eq!(
        session.prepare_commit().unwrap_err(),
        EditSessionError::CommitInFlight(3)
    );

    session.finish_commit(&pending, Err(GatewayError::Network("timeout".to_string())));
    assert!(session.prepare_commit().is_ok());
}

#[test]
fn commit_without_session_is_rejected() {
    let gateway = FakeGateway::default();
    let mut session = EditSession::new();
    assert_eq!(
        session.commit(&gateway).unwrap_err(),
        EditSessionError::NoActiveSession
    );
    assert!(gateway.sent_updates.borrow().is_empty());
}

#[test]
fn cancel_discards_draft_without_network_call() {
    let gateway = FakeGateway::default();
    let mut session = EditSession::new();
    session.begin(&sample_project(2)).unwrap();
    session.update_field(EditField::Name, "draft only").unwrap();

    session.cancel();
    session.cancel();

    assert!(!session.is_open());
    assert!(gateway.sent_updates.borrow().is_empty());
    assert_eq!(
        session.update_field(EditField::Name, "x").unwrap_err(),
        EditSessionError::NoActiveSession
    );
}

#[test]
fn begin_replaces_open_draft() {
    let mut session = EditSession::new();
    session.begin(&sample_project(1)).unwrap();
    session.update_field(EditField::Name, "unsaved").unwrap();

    session.begin(&sample_project(2)).unwrap();
    assert_eq!(session.target_id(), Some(2));
    assert_eq!(session.draft().unwrap().name, "Project 2");
}

#[test]
fn late_success_for_replaced_session_leaves_new_draft_open() {
    let mut session = EditSession::new();
    session.begin(&sample_project(1)).unwrap();
    let pending = session.prepare_commit().unwrap();

    session.begin(&sample_project(2)).unwrap();
    let outcome = session.finish_commit(&pending, Ok(()));

    assert_eq!(outcome, CommitOutcome::Committed { target_id: 1 });
    assert_eq!(session.target_id(), Some(2));
    assert!(!session.is_commit_in_flight());
}

#[test]
fn begin_rejects_invalid_project_and_keeps_existing_session() {
    let mut session = EditSession::new();
    session.begin(&sample_project(1)).unwrap();

    let err = session.begin(&Project::new(9, "   ")).unwrap_err();
    assert_eq!(
        err,
        EditSessionError::InvalidProject(ProjectValidationError::BlankName(9))
    );
    assert_eq!(session.target_id(), Some(1));
}

#[test]
fn refresh_after_commit_reflects_the_change() {
    let gateway = FakeGateway::with_projects(vec![sample_project(6)]);
    let source = gateway.list_projects().unwrap().remove(0);
    let mut session = EditSession::new();
    session.begin(&source).unwrap();
    session.update_field(EditField::Progress, "100").unwrap();

    assert_eq!(source.progress, Some(35));
    session.commit(&gateway).unwrap();

    let refreshed = gateway.list_projects().unwrap();
    assert_eq!(refreshed[0].progress, Some(100));
    assert_eq!(source.progress, Some(35));
}
