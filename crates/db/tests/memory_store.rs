//! Integration tests for the in-memory store: round-trip fidelity,
//! whole-collection replace semantics, and delete-by-id.

use demandas_core::model::{
    CreateDemand, CreateProject, CreateStage, Demand, Project, Stage, Status,
};
use demandas_db::{MemoryStore, Store};

fn sample_project(name: &str) -> Project {
    Project::new(CreateProject {
        name: name.into(),
        description: Some("desc".into()),
        status: None,
        responsible: Some("Ana".into()),
        due_date: Some("2024-06-30".into()),
    })
    .unwrap()
}

fn sample_demand(project_id: &str, title: &str) -> Demand {
    Demand::new(CreateDemand {
        title: title.into(),
        description: Some("detalhe".into()),
        project_id: project_id.into(),
        stage_id: Some("eta_1".into()),
        status: None,
        priority: None,
        responsible: Some("Bruno".into()),
        planned_start: Some("2024-01-01".into()),
        actual_start: Some("2024-01-03".into()),
        planned_due: Some("2024-02-01".into()),
        actual_due: None,
        percent_complete: Some(30),
        tags: Some(vec!["infra".into(), "urgente".into()]),
        comments: Some(vec!["primeiro comentário".into()]),
    })
    .unwrap()
}

fn sample_stage(name: &str, order: i32) -> Stage {
    Stage::new(CreateStage {
        name: name.into(),
        description: None,
        order: Some(order),
    })
    .unwrap()
}

#[tokio::test]
async fn round_trip_preserves_every_field() {
    let store = MemoryStore::default();

    let projects = vec![sample_project("Alpha"), sample_project("Beta")];
    let demands = vec![
        sample_demand(&projects[0].id, "Tarefa 1"),
        sample_demand(&projects[1].id, "Tarefa 2"),
    ];
    let stages = vec![sample_stage("Design", 1), sample_stage("Dev", 2)];

    store.save_projects(&projects).await.unwrap();
    store.save_demands(&demands).await.unwrap();
    store.save_stages(&stages).await.unwrap();

    assert_eq!(store.load_projects().await.unwrap(), projects);
    assert_eq!(store.load_demands().await.unwrap(), demands);
    assert_eq!(store.load_stages().await.unwrap(), stages);
}

#[tokio::test]
async fn save_replaces_the_whole_collection() {
    let store = MemoryStore::default();

    let first = vec![sample_project("Alpha"), sample_project("Beta")];
    store.save_projects(&first).await.unwrap();

    // Saving a shorter collection drops the record absent from it.
    let second = vec![first[0].clone()];
    store.save_projects(&second).await.unwrap();

    let loaded = store.load_projects().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Alpha");
}

#[tokio::test]
async fn delete_removes_by_id_and_reports_misses() {
    let store = MemoryStore::default();

    let demands = vec![sample_demand("p1", "A"), sample_demand("p1", "B")];
    store.save_demands(&demands).await.unwrap();

    assert!(store.delete_demand(&demands[0].id).await.unwrap());
    assert!(!store.delete_demand("dem_missing").await.unwrap());
    assert_eq!(store.load_demands().await.unwrap().len(), 1);
}

#[tokio::test]
async fn status_change_survives_a_round_trip() {
    let store = MemoryStore::default();

    let mut demand = sample_demand("p1", "A");
    demand.set_status(Status::Done);
    store.save_demands(std::slice::from_ref(&demand)).await.unwrap();

    let loaded = store.load_demands().await.unwrap();
    assert_eq!(loaded[0].status, Status::Done);
    assert_eq!(loaded[0].percent_complete, 100);
    assert!(loaded[0].completed_at.is_some());
}

#[tokio::test]
async fn empty_store_loads_empty_collections() {
    let store = MemoryStore::default();
    assert!(store.load_projects().await.unwrap().is_empty());
    assert!(store.load_demands().await.unwrap().is_empty());
    assert!(store.load_stages().await.unwrap().is_empty());
    store.health_check().await.unwrap();
}
