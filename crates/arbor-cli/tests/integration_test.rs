//! Integration tests comparing CLI output with the core Display
//! implementations, against a database shared by the engine and the binary.

use std::process::Command;

use arbor_core::{
    display::{Forest, Projects},
    params::{CreateNode, CreateProject, GetTree, SetProgress},
    Engine, EngineBuilder, TreeView,
};
use tempfile::TempDir;

/// Helper function to create a test engine with temporary database
async fn create_test_engine() -> (Engine, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");

    let engine = EngineBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .await
        .expect("Failed to create engine");

    (engine, temp_dir)
}

/// Run a CLI command and capture its output
fn run_cli_command(engine: &Engine, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_arbor"))
        .arg("--no-color")
        .arg("--database-file")
        .arg(engine.database_path())
        .args(args)
        .output()
        .expect("Failed to run CLI command");
    assert!(
        output.status.success(),
        "arbor {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

#[tokio::test]
async fn test_project_list_matches_display() {
    let (engine, _temp_dir) = create_test_engine().await;
    for name in ["Bridge", "Harbour"] {
        engine
            .create_project(&CreateProject {
                name: name.to_string(),
                description: Some(format!("{name} works")),
            })
            .await
            .unwrap();
    }

    let projects = engine.list_projects().await.unwrap();
    let expected = format!("# Projects\n\n{}", Projects(&projects));

    assert_eq!(run_cli_command(&engine, &["project", "list"]), expected);
}

#[tokio::test]
async fn test_tree_output_matches_display() {
    let (engine, _temp_dir) = create_test_engine().await;
    let project = engine
        .create_project(&CreateProject {
            name: "Bridge".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let root = engine
        .create_node(&CreateNode {
            project_id: project.id,
            level: "L1".to_string(),
            name: "Deck".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let mut leaves = Vec::new();
    for name in ["Formwork", "Rebar", "Pour"] {
        leaves.push(
            engine
                .create_node(&CreateNode {
                    project_id: project.id,
                    parent_id: Some(root.id),
                    level: "L2".to_string(),
                    name: name.to_string(),
                    ..Default::default()
                })
                .await
                .unwrap(),
        );
    }
    engine
        .update_node_progress(&SetProgress {
            id: leaves[0].id,
            progress: 100,
        })
        .await
        .unwrap();

    let TreeView::Nested(forest) = engine
        .get_tree(&GetTree {
            project_id: project.id,
            flat: false,
        })
        .await
        .unwrap()
    else {
        panic!("expected nested tree");
    };
    let expected = format!("# Project {}\n\n{}", project.id, Forest(&forest));

    let output = run_cli_command(&engine, &["tree", &project.id.to_string()]);
    assert_eq!(output, expected);
    assert!(output.contains("**1** Deck (L1, ➤ In Progress, 33%)"));
}

#[tokio::test]
async fn test_cli_writes_are_visible_to_engine() {
    let (engine, _temp_dir) = create_test_engine().await;

    run_cli_command(&engine, &["project", "create", "Tunnel"]);
    run_cli_command(&engine, &["node", "add", "1", "Boring"]);
    run_cli_command(&engine, &["node", "add", "1", "Segment ring", "-p", "1", "-l", "L2"]);
    run_cli_command(&engine, &["node", "progress", "2", "60"]);

    let root = engine
        .get_node(&arbor_core::params::Id { id: 1 })
        .await
        .unwrap()
        .expect("root exists");
    assert_eq!(root.progress, 60);
    assert_eq!(root.code, "1");
}
