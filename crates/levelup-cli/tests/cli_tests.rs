//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FAST_CONFIG: &str = r#"
[timings]
correct_delay_ms = 0
reveal_delay_ms = 0
match_reveal_ms = 0
match_settle_ms = 0
mismatch_delay_ms = 0
reject_pause_ms = 0
reject_settle_ms = 0
speech_timeout_ms = 1000
reject_speech_timeout_ms = 1000
"#;

fn levelup() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("levelup").unwrap()
}

/// A temp directory with a zero-delay config and its own data file.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("levelup.toml"), FAST_CONFIG).unwrap();
        Self { dir }
    }

    fn data_path(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    fn cmd(&self) -> Command {
        let mut cmd = levelup();
        cmd.current_dir(self.dir.path())
            .env_remove("LEVELUP_DATA")
            .arg("--data")
            .arg(self.data_path())
            .arg("--config")
            .arg(self.dir.path().join("levelup.toml"));
        cmd
    }

    fn run(&self, args: &[&str]) {
        self.cmd().args(args).assert().success();
    }

    fn data(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.data_path()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// One student with a single list.
    fn with_list(name: &str, words: &str) -> Self {
        let ws = Self::new();
        ws.run(&["student", "add", name]);
        ws.run(&["list", "add", name, "quest", "--words", words]);
        ws
    }
}

// ---------------------------------------------------------------------------
// Basics
// ---------------------------------------------------------------------------

#[test]
fn help_output() {
    levelup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Spelling quests and memory match",
        ));
}

#[test]
fn version_output() {
    levelup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("levelup"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    levelup()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created levelup.toml"));

    let text = std::fs::read_to_string(dir.path().join("levelup.toml")).unwrap();
    assert!(text.contains("correct_delay_ms = 3000"));

    levelup()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    levelup()
        .current_dir(dir.path())
        .arg("--config")
        .arg("nope.toml")
        .args(["student", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

// ---------------------------------------------------------------------------
// Students and lists
// ---------------------------------------------------------------------------

#[test]
fn student_add_and_list() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["student", "add", "  Maya "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Maya."));
    ws.cmd()
        .args(["student", "add", "Maya"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ws.cmd()
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maya"));

    let data = ws.data();
    assert_eq!(data["students"]["Maya"]["weeklyGoal"], 10);
    assert_eq!(data["students"]["Maya"]["role"], "Hero");
}

#[test]
fn goal_zero_restores_default() {
    let ws = Workspace::new();
    ws.run(&["student", "add", "Maya"]);
    ws.run(&["student", "goal", "Maya", "3"]);
    assert_eq!(ws.data()["students"]["Maya"]["weeklyGoal"], 3);
    ws.run(&["student", "goal", "Maya", "0"]);
    assert_eq!(ws.data()["students"]["Maya"]["weeklyGoal"], 10);
}

#[test]
fn unknown_student_is_reported() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["stats", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown student: Ghost"));
}

#[test]
fn list_words_are_normalized() {
    let ws = Workspace::with_list("Maya", " Cat, ,DOG ,fish");
    let words = &ws.data()["students"]["Maya"]["lists"]["quest"]["words"];
    assert_eq!(*words, serde_json::json!(["cat", "dog", "fish"]));

    ws.run(&["list", "toggle", "Maya", "quest"]);
    assert_eq!(ws.data()["students"]["Maya"]["lists"]["quest"]["hidden"], true);
    ws.cmd()
        .args(["list", "show", "Maya"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archived"));
}

#[test]
fn list_export_import_between_students() {
    let ws = Workspace::with_list("Maya", "cat, dog");
    ws.run(&["student", "add", "Leo"]);
    let doc = ws.dir.path().join("quest.json");
    ws.run(&[
        "list",
        "export",
        "Maya",
        "quest",
        "--out",
        doc.to_str().unwrap(),
    ]);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&doc).unwrap()).unwrap();
    assert_eq!(raw["type"], "levelup-list");

    ws.cmd()
        .args(["list", "import", "Leo"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported list quest."));
    assert_eq!(
        ws.data()["students"]["Leo"]["lists"]["quest"]["words"],
        serde_json::json!(["cat", "dog"])
    );
}

#[test]
fn list_import_rejects_wrong_type() {
    let ws = Workspace::with_list("Maya", "cat");
    let doc = ws.dir.path().join("bad.json");
    std::fs::write(&doc, r#"{"type":"other","name":"x","words":["owl"]}"#).unwrap();
    ws.cmd()
        .args(["list", "import", "Maya"])
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid import"));
    assert!(ws.data()["students"]["Maya"]["lists"].get("x").is_none());
}

// ---------------------------------------------------------------------------
// Spelling practice
// ---------------------------------------------------------------------------

#[test]
fn practice_single_word_first_try() {
    let ws = Workspace::with_list("Maya", "cat");
    ws.cmd()
        .args(["practice", "Maya", "--list", "quest"])
        .write_stdin("CAT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("+30 XP"))
        .stdout(predicate::str::contains("Quest complete!"));

    let maya = &ws.data()["students"]["Maya"];
    assert_eq!(maya["xp"], 30);
    assert_eq!(maya["weeklyProgress"], 1);
    assert_eq!(maya["medals"]["gold"], 1);
    assert_eq!(maya["history"]["cat"]["times"].as_array().unwrap().len(), 1);
}

#[test]
fn practice_reveal_after_five_misses() {
    let ws = Workspace::with_list("Maya", "cat");
    ws.cmd()
        .args(["practice", "Maya"])
        .write_stdin("kat\nkat\nkat\nkat\nkat\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stuck?"))
        .stdout(predicate::str::contains("The word was: cat"));

    let maya = &ws.data()["students"]["Maya"];
    assert_eq!(maya["xp"], 0);
    assert_eq!(maya["history"]["cat"]["missed"], 5);
    assert_eq!(maya["weeklyProgress"], 0);
}

#[test]
fn practice_paused_ignores_guesses() {
    let ws = Workspace::with_list("Maya", "cat");
    ws.cmd()
        .args(["practice", "Maya"])
        .write_stdin(":pause\ncat\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("See you next time!"));
    assert_eq!(ws.data()["students"]["Maya"]["xp"], 0);
}

#[test]
fn practice_help_sounds_out_word() {
    let ws = Workspace::with_list("Maya", "ship");
    ws.cmd()
        .args(["practice", "Maya"])
        .write_stdin(":help\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("shhh"));
}

#[test]
fn practice_with_no_words_fails() {
    let ws = Workspace::new();
    ws.run(&["student", "add", "Maya"]);
    ws.cmd()
        .args(["practice", "Maya"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no words"));
}

#[test]
fn hidden_lists_skipped_for_all_lists() {
    let ws = Workspace::with_list("Maya", "cat");
    ws.run(&["list", "toggle", "Maya", "quest"]);
    ws.cmd()
        .args(["practice", "Maya"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no words"));

    // Named selection still reaches an archived list.
    ws.cmd()
        .args(["practice", "Maya", "--list", "quest"])
        .write_stdin("cat\n")
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// Memory match
// ---------------------------------------------------------------------------

#[test]
fn memory_single_pair_wins() {
    let ws = Workspace::with_list("Maya", "sun");
    ws.cmd()
        .args(["memory", "Maya", "--seed", "7"])
        .write_stdin("1\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Find: sun"))
        .stdout(predicate::str::contains("Board cleared!"));

    let maya = &ws.data()["students"]["Maya"];
    assert_eq!(maya["xp"], 55);
    assert_eq!(maya["medals"]["gold"], 1);
    assert_eq!(maya["weeklyProgress"], 1);
}

#[test]
fn memory_rejects_bad_input() {
    let ws = Workspace::with_list("Maya", "sun");
    ws.cmd()
        .args(["memory", "Maya"])
        .write_stdin("zebra\n0\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type a card number"))
        .stdout(predicate::str::contains("can't be flipped"));
    assert_eq!(ws.data()["students"]["Maya"]["xp"], 0);
}

// ---------------------------------------------------------------------------
// Backup and stats
// ---------------------------------------------------------------------------

#[test]
fn full_export_and_import() {
    let ws = Workspace::with_list("Maya", "cat");
    ws.cmd()
        .args(["practice", "Maya"])
        .write_stdin("cat\n")
        .assert()
        .success();
    let before = ws.data();

    ws.cmd()
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 student(s)"));
    let backup = ws.dir.path().join("levelup_quest_backup.json");
    assert!(backup.exists());

    ws.run(&["student", "remove", "Maya"]);
    ws.cmd()
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 student(s)."));
    assert_eq!(ws.data(), before);
}

#[test]
fn import_of_list_export_leaves_data_alone() {
    let ws = Workspace::with_list("Maya", "cat, dog");
    let doc = ws.dir.path().join("quest.json");
    ws.run(&[
        "list",
        "export",
        "Maya",
        "quest",
        "--out",
        doc.to_str().unwrap(),
    ]);
    let before = std::fs::read_to_string(ws.data_path()).unwrap();

    ws.cmd()
        .arg("import")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid import"));
    for raw in ["[]", "{}"] {
        std::fs::write(&doc, raw).unwrap();
        ws.cmd().arg("import").arg(&doc).assert().failure();
    }
    assert_eq!(std::fs::read_to_string(ws.data_path()).unwrap(), before);
}

#[test]
fn import_browser_backup() {
    let ws = Workspace::new();
    let backup = ws.dir.path().join("levelup_quest_backup.json");
    std::fs::write(
        &backup,
        r#"{"students":{"Maya":{"lists":{"animals":["cat","dog"],"old":["owl"]},
            "sentences":{"animals":["The cat naps."]},
            "listConfigs":{"old":{"visible":false}},
            "xp":80,"history":{},"goalHistory":[]}},
           "config":{"voiceURI":"Samantha"}}"#,
    )
    .unwrap();

    ws.cmd()
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 student(s)."));
    let data = ws.data();
    let maya = &data["students"]["Maya"];
    assert_eq!(maya["xp"], 80);
    assert_eq!(maya["lists"]["animals"]["words"], serde_json::json!(["cat", "dog"]));
    assert_eq!(maya["lists"]["old"]["hidden"], true);
    assert_eq!(data["config"]["voiceId"], "Samantha");
}

#[test]
fn corrupt_data_starts_fresh() {
    let ws = Workspace::new();
    std::fs::write(ws.data_path(), "{ definitely not json").unwrap();
    ws.cmd()
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No students yet"));
}

#[test]
fn stats_after_practice() {
    let ws = Workspace::with_list("Maya", "cat");
    ws.cmd()
        .args(["practice", "Maya"])
        .write_stdin("dog\ncat\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("+20 XP"));

    ws.cmd()
        .args(["stats", "Maya"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 1"))
        .stdout(predicate::str::contains("90%"))
        .stdout(predicate::str::contains("Needs practice: cat"));

    let out = ws.cmd().args(["stats", "Maya", "--json"]).output().unwrap();
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["xp"], 20);
    assert_eq!(summary["words"][0]["accuracy"], 90);
}
