//! Tests for TOML game scripts.

use std::fs;
use tempfile::TempDir;

use quantum_games::{GameScript, Outcome, Player, Position, SelectionFault, SessionError, Square};

const TRIANGLE: &str = r#"
name = "triangle"

[[steps]]
action = "move"
cells = [0, 1]

[[steps]]
action = "move"
cells = [3, 3]
expect = "rejected"

[[steps]]
action = "move"
cells = [1, 2]

[[steps]]
action = "move"
cells = [2, 0]

[[steps]]
action = "collapse"
cell = 2
"#;

#[test]
fn test_script_from_file_runs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("triangle.toml");
    fs::write(&path, TRIANGLE).expect("Failed to write script");

    let script = GameScript::from_file(&path).expect("Load failed");
    assert_eq!(script.name(), "triangle");

    let run = script.run().expect("Run failed");
    assert_eq!(run.snapshots().len(), 4);
    assert_eq!(run.rejections().len(), 1);
    assert_eq!(run.rejections()[0].step, 1);
    assert_eq!(
        run.rejections()[0].error,
        SessionError::InvalidSelection(SelectionFault::SameCell(3))
    );

    let last = run.final_snapshot();
    assert_eq!(last.board().get(Position::TopRight), Square::Occupied(Player::X));
    assert_eq!(*last.to_move(), Player::O);
}

#[test]
fn test_missing_file_is_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = GameScript::from_file(dir.path().join("nope.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read script file"));
}

#[test]
fn test_expected_rejection_that_succeeds_fails_run() {
    let script = GameScript::from_toml(
        r#"
[[steps]]
action = "move"
cells = [0, 1]
expect = "rejected"
"#,
    )
    .unwrap();
    let err = script.run().unwrap_err();
    assert!(err.message.contains("expected to be rejected"));
}

#[test]
fn test_script_reaches_win() {
    let script = GameScript::from_toml(
        r#"
name = "diagonal"
steps = [
  { action = "move", cells = [0, 4] },
  { action = "move", cells = [1, 2] },
  { action = "move", cells = [0, 4] },
  { action = "collapse", cell = 0 },
  { action = "move", cells = [1, 2] },
  { action = "collapse", cell = 1 },
  { action = "move", cells = [5, 8] },
  { action = "move", cells = [3, 6] },
  { action = "move", cells = [5, 8] },
  { action = "collapse", cell = 5 },
  { action = "move", cells = [3, 6], expect = "rejected" },
  { action = "reset" },
]
"#,
    )
    .unwrap();
    let run = script.run().unwrap();

    let before_reset = &run.snapshots()[run.snapshots().len() - 2];
    assert_eq!(before_reset.outcome(), Some(Outcome::Winner(Player::X)));
    assert!(run.final_snapshot().moves().is_empty());
}

#[test]
fn test_bundled_demo_scripts_run() {
    let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");

    let triangle = GameScript::from_file(demos.join("triangle.toml")).unwrap().run().unwrap();
    assert_eq!(triangle.final_snapshot().board().open_positions().len(), 6);

    let diagonal = GameScript::from_file(demos.join("diagonal.toml")).unwrap().run().unwrap();
    assert_eq!(diagonal.rejections().len(), 1);
    assert_eq!(
        diagonal.final_snapshot().outcome(),
        Some(Outcome::Winner(Player::X))
    );
}
