//! Tests for the engine module.

use jiff::civil::date;
use tempfile::TempDir;

use super::*;
use crate::{
    models::{Level, NodeStatus},
    params::{CreateNode, CreateProject, DeleteProject, GetTree, Id, SetProgress, UpdateNode},
    wbs::FixedClock,
};

/// Helper function to create a test engine
async fn create_test_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let engine = EngineBuilder::new()
        .with_database_path(Some(&db_path))
        .with_clock(Arc::new(FixedClock(date(2026, 6, 15))))
        .build()
        .await
        .expect("Failed to create engine");
    (temp_dir, engine)
}

async fn create_project(engine: &Engine) -> u64 {
    engine
        .create_project(&CreateProject {
            name: "Test Project".to_string(),
            description: None,
        })
        .await
        .expect("Failed to create project")
        .id
}

async fn add_node(engine: &Engine, project_id: u64, parent_id: Option<u64>, level: &str) -> Node {
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

#[tokio::test]
async fn test_builder_creates_missing_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("nested").join("dir").join("arbor.db");

    let engine = EngineBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create engine");

    assert!(db_path.exists());
    assert_eq!(engine.database_path(), db_path.as_path());
}

#[tokio::test]
async fn test_retry_limit_has_a_floor_of_one() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let engine = EngineBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_retry_limit(0)
        .build()
        .await
        .expect("Failed to create engine");

    assert_eq!(engine.retry_limit, 1);
}

#[tokio::test]
async fn test_get_tree_nested_and_flat() {
    let (_temp_dir, engine) = create_test_engine().await;
    let project_id = create_project(&engine).await;

    let root = add_node(&engine, project_id, None, "L1").await;
    let child = add_node(&engine, project_id, Some(root.id), "L2").await;
    let second_root = add_node(&engine, project_id, None, "L1").await;
    add_node(&engine, project_id, Some(child.id), "L3").await;

    let nested = engine
        .get_tree(&GetTree {
            project_id,
            flat: false,
        })
        .await
        .expect("Failed to get tree");
    let TreeView::Nested(forest) = &nested else {
        panic!("expected nested view");
    };
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].node.id, root.id);
    assert_eq!(forest[1].node.id, second_root.id);
    assert_eq!(forest[0].children[0].children[0].node.code, "1.1.1");
    assert_eq!(nested.len(), 4);

    let flat = engine
        .get_tree(&GetTree {
            project_id,
            flat: true,
        })
        .await
        .expect("Failed to get tree");
    let TreeView::Flat(nodes) = &flat else {
        panic!("expected flat view");
    };
    let codes: Vec<&str> = nodes.iter().map(|n| n.code.as_str()).collect();
    assert_eq!(codes, vec!["1", "1.1", "1.1.1", "2"]);
}

#[tokio::test]
async fn test_tree_view_json_nests_children() {
    let (_temp_dir, engine) = create_test_engine().await;
    let project_id = create_project(&engine).await;
    let root = add_node(&engine, project_id, None, "L1").await;
    add_node(&engine, project_id, Some(root.id), "L2").await;

    let json = engine
        .get_tree(&GetTree {
            project_id,
            flat: false,
        })
        .await
        .expect("Failed to get tree")
        .to_json()
        .expect("Failed to serialize tree");

    let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    assert_eq!(value[0]["code"], "1");
    assert_eq!(value[0]["children"][0]["code"], "1.1");
    assert_eq!(value[0]["children"][0]["level"], "L2");
}

#[tokio::test]
async fn test_update_node_progress_validates_range() {
    let (_temp_dir, engine) = create_test_engine().await;
    let project_id = create_project(&engine).await;
    let leaf = add_node(&engine, project_id, None, "L1").await;

    let result = engine
        .update_node_progress(&SetProgress {
            id: leaf.id,
            progress: 101,
        })
        .await;
    assert!(matches!(result, Err(WbsError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_update_node_rejects_unknown_status() {
    let (_temp_dir, engine) = create_test_engine().await;
    let project_id = create_project(&engine).await;
    let leaf = add_node(&engine, project_id, None, "L1").await;

    let result = engine
        .update_node(&UpdateNode {
            id: leaf.id,
            status: Some("finished".to_string()),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(WbsError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_delete_project_requires_confirmation() {
    let (_temp_dir, engine) = create_test_engine().await;
    let project_id = create_project(&engine).await;

    let result = engine
        .delete_project(&DeleteProject {
            id: project_id,
            confirmed: false,
        })
        .await;
    assert!(matches!(result, Err(WbsError::InvalidInput { .. })));

    let deleted = engine
        .delete_project(&DeleteProject {
            id: project_id,
            confirmed: true,
        })
        .await
        .expect("Failed to delete project");
    assert_eq!(deleted.map(|p| p.id), Some(project_id));
    assert!(engine
        .get_project(&Id { id: project_id })
        .await
        .expect("Failed to get project")
        .is_none());
}

#[tokio::test]
async fn test_statistics_use_engine_clock() {
    let (_temp_dir, engine) = create_test_engine().await;
    let project_id = create_project(&engine).await;

    let root = add_node(&engine, project_id, None, "L1").await;
    let late = add_node(&engine, project_id, Some(root.id), "L2").await;
    let done = add_node(&engine, project_id, Some(root.id), "L2").await;

    engine
        .update_node(&UpdateNode {
            id: late.id,
            end_date: Some("2026-06-14".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to update node");
    engine
        .update_node_progress(&SetProgress {
            id: done.id,
            progress: 100,
        })
        .await
        .expect("Failed to set progress");

    let stats = engine
        .project_statistics(&Id { id: project_id })
        .await
        .expect("Failed to get statistics");

    assert_eq!(stats.total_nodes, 3);
    assert_eq!(stats.nodes_per_level.get(&Level::L1), Some(&1));
    assert_eq!(stats.nodes_per_level.get(&Level::L2), Some(&2));
    assert_eq!(stats.leaf_count, 2);
    assert_eq!(stats.leaves_per_status.get(&NodeStatus::Completed), Some(&1));
    assert_eq!(stats.leaves_per_status.get(&NodeStatus::Pending), Some(&1));
    assert_eq!(stats.delayed_leaves, 1);
    assert_eq!(stats.overall_progress, 50);
}

#[tokio::test]
async fn test_statistics_for_empty_project() {
    let (_temp_dir, engine) = create_test_engine().await;
    let project_id = create_project(&engine).await;

    let stats = engine
        .project_statistics(&Id { id: project_id })
        .await
        .expect("Failed to get statistics");
    assert_eq!(stats.total_nodes, 0);
    assert_eq!(stats.overall_progress, 0);
}
