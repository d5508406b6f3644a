use adel_core::{overdue_count, Decimal, EditDraft, Project, ProjectStatus, ProjectUpdate};

#[test]
fn project_decodes_api_shape_with_string_decimals() {
    let value = serde_json::json!({
        "id": 17,
        "name": "Mobile clinic",
        "description": "Monthly rural visits",
        "progress": 45,
        "budget": "12000.00",
        "budgetUsed": 3100.25,
        "deadline": "2025-11-01T00:00:00.000Z",
        "status": "overdue",
        "isOverdue": true
    });

    let project: Project = serde_json::from_value(value).unwrap();
    assert_eq!(project.id, 17);
    assert_eq!(project.budget.as_ref().map(Decimal::value), Some(12_000.0));
    assert_eq!(project.budget_used.as_ref().map(Decimal::value), Some(3_100.25));
    assert_eq!(project.status, ProjectStatus::Overdue);
    assert!(project.counts_as_overdue());
}

#[test]
fn missing_optional_fields_take_defaults() {
    let project: Project =
        serde_json::from_value(serde_json::json!({"id": 2, "name": "Seed bank"})).unwrap();

    assert_eq!(project.progress_percent(), 0);
    assert_eq!(project.budget, None);
    assert_eq!(project.deadline, None);
    assert_eq!(project.status, ProjectStatus::Active);
    assert!(!project.is_overdue);
}

#[test]
fn unknown_status_and_blank_decimal_are_tolerated() {
    let project: Project = serde_json::from_value(serde_json::json!({
        "id": 3,
        "name": "Library",
        "budget": "",
        "budgetUsed": null,
        "status": "on_hold"
    }))
    .unwrap();

    assert_eq!(project.status, ProjectStatus::Other);
    assert_eq!(project.budget, None);
    assert_eq!(project.budget_used, None);
}

#[test]
fn malformed_decimal_is_rejected() {
    let result = serde_json::from_value::<Project>(serde_json::json!({
        "id": 4,
        "name": "Bridge",
        "budget": "a lot"
    }));
    assert!(result.is_err());
}

#[test]
fn update_payload_uses_camel_case_and_explicit_nulls() {
    let update = ProjectUpdate {
        name: "Mobile clinic".to_string(),
        progress: 50,
        description: None,
        deadline: None,
        budget: None,
        budget_used: 0.0,
    };

    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json["budgetUsed"], 0.0);
    assert!(json["deadline"].is_null());
    assert!(json["budget"].is_null());
    assert!(json.get("budget_used").is_none());
}

#[test]
fn overdue_count_of_empty_list_is_zero() {
    assert_eq!(overdue_count(&[]), 0);
}

#[test]
fn edit_draft_shows_decimal_text_as_sent_by_the_api() {
    let project: Project = serde_json::from_value(serde_json::json!({
        "id": 5,
        "name": "Clinic",
        "budget": "5000.00",
        "budgetUsed": "120.50"
    }))
    .unwrap();

    let draft = EditDraft::from_project(&project);
    assert_eq!(draft.budget, "5000.00");
    assert_eq!(draft.budget_used, "120.50");

    let echoed = serde_json::to_value(&project).unwrap();
    assert_eq!(echoed["budget"], 5000.0);
}
