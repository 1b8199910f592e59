#![allow(dead_code)]

use std::sync::Arc;

use arbor_core::{
    params::{CreateNode, CreateProject, Id},
    wbs::FixedClock,
    Engine, EngineBuilder, Node,
};
use jiff::civil::{date, Date};
use tempfile::TempDir;

/// The date every test engine believes is today.
pub fn today() -> Date {
    date(2026, 6, 15)
}

/// Helper function to create a test engine with a pinned clock
pub async fn create_test_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let engine = EngineBuilder::new()
        .with_database_path(Some(&db_path))
        .with_clock(Arc::new(FixedClock(today())))
        .build()
        .await
        .expect("Failed to create engine");
    (temp_dir, engine)
}

pub async fn create_project(engine: &Engine, name: &str) -> u64 {
    engine
        .create_project(&CreateProject {
            name: name.to_string(),
            description: None,
        })
        .await
        .expect("Failed to create project")
        .id
}

pub async fn add_node(engine: &Engine, project_id: u64, parent_id: Option<u64>, level: &str) -> Node {
    engine
        .create_node(&CreateNode {
            project_id,
            parent_id,
            level: level.to_string(),
            name: format!("{level} work"),
            ..Default::default()
        })
        .await
        .expect("Failed to create node")
}

pub async fn fetch(engine: &Engine, id: u64) -> Node {
    engine
        .get_node(&Id { id })
        .await
        .expect("Failed to get node")
        .expect("Node should exist")
}
