use assert_cmd::cargo::cargo_bin_cmd;
use bugscan_testing::{StubServer, TestWorld};
use predicates::prelude::*;

#[test]
fn test_cli_version() {
    let mut cmd = cargo_bin_cmd!("bugscan");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bugscan"));
}

#[test]
fn test_cli_help_lists_subcommands() {
    let mut cmd = cargo_bin_cmd!("bugscan");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("logs"))
        .stdout(predicate::str::contains("endpoints"))
        .stdout(predicate::str::contains("patterns"));
}

#[test]
fn test_argument_error_exits_two() {
    let mut cmd = cargo_bin_cmd!("bugscan");
    cmd.args(["run", "--timeout-secs", "soon"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_workdir_exits_two() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("not-here");

    let mut cmd = cargo_bin_cmd!("bugscan");
    cmd.arg("--workdir")
        .arg(&missing)
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Working directory unavailable"));
}

#[test]
fn test_workdir_from_environment() {
    let world = TestWorld::new()
        .with_patterns(&["panic"])
        .with_log("x.log", "panic\n");

    let mut cmd = cargo_bin_cmd!("bugscan");
    cmd.env("BUGSCAN_WORKDIR", world.workdir())
        .env_remove("RUST_LOG")
        .arg("logs")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[x.log | Line 1]: panic"));
}

#[test]
fn test_logs_subcommand_does_not_probe_or_write() {
    let world = TestWorld::new()
        .with_patterns(&["panic", "OutOfMemory"])
        .with_log("api/server.log", "ok\nOutOfMemory\n")
        .with_log("worker.log", "Kernel PANIC detected\n")
        .with_endpoints(&["http://127.0.0.1:1/never"]);

    let result = world.run(&["logs"]).unwrap();

    assert_eq!(result.code(), Some(1));
    insta::assert_snapshot!(result.stdout(), @r"
    Scanned 2 log files.
    Found 2 issues.
    [server.log | Line 2]: OutOfMemory
    [worker.log | Line 1]: Kernel PANIC detected
    ");
    assert!(!world.report_path().exists());
}

#[test]
fn test_logs_without_pattern_source_exits_two() {
    let world = TestWorld::new().with_log("x.log", "panic\n");

    let result = world.run(&["logs"]).unwrap();
    assert_eq!(result.code(), Some(2));
}

#[test]
fn test_endpoints_subcommand() {
    let ok = StubServer::with_status(200);
    let missing = StubServer::with_status(404);
    let world = TestWorld::new().with_endpoints(&[ok.url("/"), missing.url("/gone")]);

    let result = world.run(&["endpoints", "--format", "json"]).unwrap();

    assert_eq!(result.code(), Some(1));
    let json = result.json().unwrap();
    assert_eq!(json["checked"], 2);
    assert_eq!(json["skipped"], 0);
    assert_eq!(json["issues"].as_array().unwrap().len(), 1);
    assert_eq!(json["issues"][0]["url"], missing.url("/gone"));
    assert_eq!(json["issues"][0]["code"], 404);
}

#[test]
fn test_endpoints_all_healthy_exits_zero() {
    let ok = StubServer::with_status(200);
    let world = TestWorld::new().with_endpoints(&[ok.url("/")]);

    let result = world.run(&["endpoints"]).unwrap();

    assert!(result.success());
    assert!(result.stdout().contains("Checked 1 endpoints."));
    assert!(result.stdout().contains("No issues found."));
}

#[test]
fn test_patterns_subcommand_lists_rejections() {
    let world = TestWorld::new().with_patterns(&["panic", "", "(unclosed", "Out Of Memory"]);

    let result = world.run(&["patterns", "--format", "json"]).unwrap();

    assert!(result.success());
    let json = result.json().unwrap();
    assert_eq!(json["loaded"], true);
    assert_eq!(json["accepted"][0], "panic");
    assert_eq!(json["accepted"][1], "Out Of Memory");
    assert_eq!(json["rejected"][0]["pattern"], "(unclosed");
}

#[test]
fn test_patterns_without_source_exits_two() {
    let world = TestWorld::new();

    let result = world.run(&["patterns"]).unwrap();

    assert_eq!(result.code(), Some(2));
    assert!(result.stdout().contains("Pattern source could not be loaded."));
}

#[test]
fn test_patterns_rejects_probe_flags() {
    let world = TestWorld::new().with_patterns(&["panic"]);

    let result = world.run(&["patterns", "--timeout-secs", "3"]).unwrap();

    assert_eq!(result.code(), Some(2));
    assert!(result.stderr().contains("--timeout-secs"));
}
