use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary database location for CLI tests
fn create_cli_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("cli_test.db");
    (temp_dir, db_path)
}

/// Command with --no-color and the test database already set
fn arbor_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("arbor").expect("Failed to find arbor binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

/// Creates project 1 with root 1 ("Foundations") and leaf 2 ("Excavation").
fn seed_project(db_path: &Path) {
    arbor_cmd(db_path)
        .args(["project", "create", "Bridge"])
        .assert()
        .success();
    arbor_cmd(db_path)
        .args(["node", "add", "1", "Foundations"])
        .assert()
        .success();
    arbor_cmd(db_path)
        .args(["node", "add", "1", "Excavation", "--parent", "1", "--level", "L2"])
        .assert()
        .success();
}

#[test]
fn test_cli_default_command_lists_projects() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    arbor_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Projects"))
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_cli_create_project_with_description() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    arbor_cmd(&db_path)
        .args([
            "project",
            "create",
            "Harbour",
            "--description",
            "Quay extension",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project with ID: 1"))
        .stdout(predicate::str::contains("# 1. Harbour"))
        .stdout(predicate::str::contains("Quay extension"));

    arbor_cmd(&db_path)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Harbour (ID: 1)"));
}

#[test]
fn test_cli_node_codes_follow_hierarchy() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    arbor_cmd(&db_path)
        .args(["project", "create", "Bridge"])
        .assert()
        .success();

    arbor_cmd(&db_path)
        .args(["node", "add", "1", "Foundations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created node 1 with ID: 1"));
    arbor_cmd(&db_path)
        .args(["node", "add", "1", "Piers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created node 2 with ID: 2"));
    arbor_cmd(&db_path)
        .args(["node", "add", "1", "Excavation", "-p", "2", "-l", "L2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created node 2.1 with ID: 3"))
        .stdout(predicate::str::contains("- Parent: 2"));
}

#[test]
fn test_cli_rejects_level_mismatch() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["node", "add", "1", "Too deep", "--parent", "1", "--level", "L3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to add node"))
        .stderr(predicate::str::contains("Level mismatch"));
}

#[test]
fn test_cli_progress_rolls_up_to_parent() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["node", "progress", "2", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated node 1.1 with ID: 2"))
        .stdout(predicate::str::contains("- Progress: 40%"));

    arbor_cmd(&db_path)
        .args(["node", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Progress: 40%"))
        .stdout(predicate::str::contains("- Status: ➤ In Progress"));
}

#[test]
fn test_cli_progress_on_group_is_rejected() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["node", "progress", "1", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to set progress"))
        .stderr(predicate::str::contains("child node(s)"));
}

#[test]
fn test_cli_progress_out_of_range_is_rejected() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["node", "progress", "2", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("progress"));
}

#[test]
fn test_cli_tree_outline_and_json() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["tree", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Project 1"))
        .stdout(predicate::str::contains("- **1** Foundations (L1"))
        .stdout(predicate::str::contains("  - **1.1** Excavation (L2"));

    arbor_cmd(&db_path)
        .args(["tree", "1", "--flat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **1.1** Excavation"))
        .stdout(predicate::str::contains("  - **1.1**").not());

    arbor_cmd(&db_path)
        .args(["tree", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"children\""))
        .stdout(predicate::str::contains("\"code\": \"1.1\""));
}

#[test]
fn test_cli_tree_of_missing_project_fails() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    arbor_cmd(&db_path)
        .args(["tree", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project with ID 99 not found"));
}

#[test]
fn test_cli_update_node_lists_changes() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args([
            "node",
            "update",
            "2",
            "--name",
            "Excavation and shoring",
            "--end",
            "2026-05-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes made:"))
        .stdout(predicate::str::contains("- Name: Excavation and shoring"))
        .stdout(predicate::str::contains("- End: 2026-05-01"));
}

#[test]
fn test_cli_move_and_delete_node() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);
    arbor_cmd(&db_path)
        .args(["node", "add", "1", "Piers"])
        .assert()
        .success();

    arbor_cmd(&db_path)
        .args(["node", "move", "2", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Code: 2.1"));

    arbor_cmd(&db_path)
        .args(["node", "delete", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted node 2 'Piers' (ID: 3)"));

    arbor_cmd(&db_path)
        .args(["node", "show", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node with ID 2 not found"));
}

#[test]
fn test_cli_assignments() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["assign", "add", "2", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Assigned person 7 to node 2"));
    arbor_cmd(&db_path)
        .args(["assign", "add", "2", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Notice:"));

    arbor_cmd(&db_path)
        .args(["assign", "replace", "2", "8", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Person 8"))
        .stdout(predicate::str::contains("- Person 9"))
        .stdout(predicate::str::contains("- Person 7").not());

    arbor_cmd(&db_path)
        .args(["assign", "remove", "2", "8"])
        .assert()
        .success();
    arbor_cmd(&db_path)
        .args(["assign", "list", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Person 9"))
        .stdout(predicate::str::contains("- Person 8").not());
}

#[test]
fn test_cli_delayed_lists_overdue_leaves() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);
    arbor_cmd(&db_path)
        .args(["node", "update", "2", "--end", "2000-01-01"])
        .assert()
        .success();

    arbor_cmd(&db_path)
        .args(["delayed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Delayed work in project 1"))
        .stdout(predicate::str::contains("Excavation"))
        .stdout(predicate::str::contains("due 2000-01-01"));

    arbor_cmd(&db_path)
        .args(["node", "progress", "2", "100"])
        .assert()
        .success();
    arbor_cmd(&db_path)
        .args(["delayed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No delayed work."));
}

#[test]
fn test_cli_project_stats() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["project", "stats", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Statistics for project 1"))
        .stdout(predicate::str::contains("- Overall progress: 0%"));
}

#[test]
fn test_cli_delete_project_requires_confirmation() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_project(&db_path);

    arbor_cmd(&db_path)
        .args(["project", "delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to delete project"));

    arbor_cmd(&db_path)
        .args(["project", "delete", "1", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted project 'Bridge' (ID: 1)"));

    arbor_cmd(&db_path)
        .args(["project", "delete", "1", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Notice: Project with ID 1 not found"));
}

#[test]
fn test_cli_help_lists_commands() {
    Command::cargo_bin("arbor")
        .expect("Failed to find arbor binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("delayed"))
        .stdout(predicate::str::contains("serve"));
}
