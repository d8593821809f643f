//! Integration tests for the report endpoints, seeding data through the
//! public API and pinning the reference date so assertions are stable.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_entity, get, send_json};
use serde_json::json;

#[tokio::test]
async fn delay_risk_flags_a_project_behind_plan() {
    let app = common::build_test_app();

    let project = create_entity(
        app.clone(),
        "/api/v1/projects",
        json!({ "name": "Atrasado" }),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    // Halfway through the planned window with no reported progress.
    create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({
            "title": "d1",
            "project_id": project_id,
            "planned_start": "2024-01-01",
            "planned_due": "2024-01-11",
            "percent_complete": 0
        }),
    )
    .await;

    let response = get(app, "/api/v1/reports/delay-risk?today=2024-01-06").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["project_name"], "Atrasado");
    assert_eq!(row["planned_pct_today"], "50%");
    assert_eq!(row["actual_pct_today"], "0%");
    assert_eq!(row["gap_planned_vs_actual"], "50%");
    assert_eq!(row["open_demands"], 1);
    assert_eq!(row["risk"], "Alto");
    assert_eq!(row["trend"], "Atraso provável");
    assert!(row.get("score").is_none());
}

#[tokio::test]
async fn delay_risk_reports_a_finished_project_as_on_schedule() {
    let app = common::build_test_app();

    let project = create_entity(
        app.clone(),
        "/api/v1/projects",
        json!({ "name": "Entregue", "due_date": "2024-01-10" }),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let demand = create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({
            "title": "d1",
            "project_id": project_id,
            "planned_start": "2024-01-01",
            "planned_due": "2024-01-10",
            "percent_complete": 100
        }),
    )
    .await;
    let demand_id = demand["id"].as_str().unwrap();
    send_json(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/demands/{demand_id}/status"),
        json!({ "status": "Concluído" }),
    )
    .await;

    let response = get(app, "/api/v1/reports/delay-risk?today=2024-02-01").await;
    let json = body_json(response).await;
    let row = &json["data"][0];
    assert_eq!(row["risk"], "Baixo");
    assert_eq!(row["trend"], "No prazo");
    assert_eq!(row["projected_delay_days"], 0);
    assert_eq!(row["open_demands"], 0);
}

#[tokio::test]
async fn delay_risk_skips_projects_without_demands() {
    let app = common::build_test_app();
    create_entity(app.clone(), "/api/v1/projects", json!({ "name": "Vazio" })).await;

    let json = body_json(get(app, "/api/v1/reports/delay-risk?today=2024-01-06").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delay_risk_rejects_an_invalid_date() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/reports/delay-risk?today=not-a-date").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn dashboard_aggregates_counts() {
    let app = common::build_test_app();

    create_entity(app.clone(), "/api/v1/projects", json!({ "name": "P" })).await;
    create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({ "title": "a", "project_id": "p1", "priority": "Urgente" }),
    )
    .await;
    let demand = create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({ "title": "b", "project_id": "p1" }),
    )
    .await;
    let id = demand["id"].as_str().unwrap();
    send_json(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/demands/{id}/status"),
        json!({ "status": "Concluído" }),
    )
    .await;

    let json = body_json(get(app, "/api/v1/reports/dashboard").await).await;
    let data = &json["data"];
    assert_eq!(data["total_projects"], 1);
    assert_eq!(data["total_demands"], 2);
    assert_eq!(data["done_demands"], 1);
    assert_eq!(data["urgent_demands"], 1);
    assert_eq!(data["completion_rate"], 50.0);
    assert_eq!(data["by_status"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn board_returns_a_column_per_status() {
    let app = common::build_test_app();

    create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({ "title": "a", "project_id": "p1" }),
    )
    .await;
    create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({ "title": "b", "project_id": "p2" }),
    )
    .await;

    let json = body_json(get(app.clone(), "/api/v1/board").await).await;
    let columns = json["data"].as_array().unwrap();
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[0]["status"], "A Fazer");
    assert_eq!(columns[0]["total"], 2);

    let json = body_json(get(app, "/api/v1/board?project_id=p1").await).await;
    assert_eq!(json["data"][0]["total"], 1);
}

#[tokio::test]
async fn s_curve_returns_planned_and_actual_series() {
    let app = common::build_test_app();

    let demand = create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({ "title": "a", "project_id": "p1", "planned_due": "2024-02-01" }),
    )
    .await;
    let id = demand["id"].as_str().unwrap();
    send_json(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/demands/{id}/status"),
        json!({ "status": "Concluído" }),
    )
    .await;

    let json = body_json(get(app, "/api/v1/reports/s-curve").await).await;
    let planned = json["data"]["planned"].as_array().unwrap();
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0]["date"], "2024-02-01");
    assert_eq!(planned[0]["cumulative"], 1);
    assert_eq!(json["data"]["actual"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn gantt_supports_demand_and_project_levels() {
    let app = common::build_test_app();

    let project = create_entity(
        app.clone(),
        "/api/v1/projects",
        json!({ "name": "Obra" }),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({
            "title": "fase 1",
            "project_id": project_id,
            "planned_start": "2024-01-01",
            "planned_due": "2024-01-15",
            "percent_complete": 50
        }),
    )
    .await;
    create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({
            "title": "fase 2",
            "project_id": project_id,
            "planned_start": "2024-01-10",
            "planned_due": "2024-02-01"
        }),
    )
    .await;
    // No window at all, so no bar.
    create_entity(
        app.clone(),
        "/api/v1/demands",
        json!({ "title": "sem datas", "project_id": project_id }),
    )
    .await;

    let json = body_json(get(app.clone(), "/api/v1/reports/gantt").await).await;
    let tasks = json["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["project"], "Obra");

    let json = body_json(get(app.clone(), "/api/v1/reports/gantt?level=project").await).await;
    let tasks = json["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Obra");
    assert_eq!(tasks[0]["start"], "2024-01-01");
    assert_eq!(tasks[0]["end"], "2024-02-01");

    let response = get(app, "/api/v1/reports/gantt?level=week").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
