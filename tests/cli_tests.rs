use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("dockerlint").unwrap()
}

fn json_output(args: &[&str]) -> serde_json::Value {
    let output = cmd().args(args).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

fn write_dockerfile(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn check_clean_file_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "FROM alpine:3.19\nRUN echo hi\n");

    cmd().args(["check", file.to_str().unwrap()]).assert().success();
}

#[test]
fn check_missing_source_image_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "EXPOSE 8080\n");

    cmd()
        .args(["check", file.to_str().unwrap()])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn check_json_output_reports_the_expected_code() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "EXPOSE 8080\n");

    let parsed = json_output(&["check", file.to_str().unwrap(), "--format", "json"]);
    let diagnostics = parsed["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["code"].as_str().unwrap(), "NoSourceImage");
    assert_eq!(parsed["summary"]["errors"].as_u64().unwrap(), 1);
}

#[test]
fn check_scans_every_dockerfile_under_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_dockerfile(dir.path(), "Dockerfile", "EXPOSE 8080\n");
    write_dockerfile(dir.path(), "Dockerfile.prod", "EXPOSE 9090\n");
    write_dockerfile(dir.path(), "not-a-dockerfile.txt", "EXPOSE 8080\n");

    let parsed = json_output(&["check", dir.path().to_str().unwrap(), "--format", "json"]);
    let diagnostics = parsed["diagnostics"].as_array().unwrap();
    let files: std::collections::HashSet<_> = diagnostics.iter().map(|d| d["file"].as_str().unwrap()).collect();
    // Both Dockerfiles (each missing FROM) are scanned; the plain text
    // file is never picked up.
    assert_eq!(files.len(), 2);
    assert!(files.contains("Dockerfile"));
    assert!(files.contains("Dockerfile.prod"));
}

#[test]
fn check_fail_on_warning_exits_1_for_warnings_only() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "FROM alpine\nMAINTAINER me@example.com\n");

    cmd().args(["check", file.to_str().unwrap()]).assert().success();

    cmd()
        .args(["check", file.to_str().unwrap(), "--fail-on", "warning"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn fmt_without_write_prints_before_and_after_without_modifying_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "   FROM alpine\n");

    cmd()
        .args(["fmt", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("before"))
        .stdout(predicate::str::contains("after"));

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "   FROM alpine\n");
}

#[test]
fn fmt_write_applies_edits_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "   FROM alpine\n");

    cmd().args(["fmt", file.to_str().unwrap(), "--write"]).assert().success();

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "FROM alpine\n");
}

#[test]
fn fmt_write_on_already_formatted_file_reports_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "FROM alpine\n");

    cmd().args(["fmt", file.to_str().unwrap()]).assert().success();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "FROM alpine\n");
}

#[test]
fn init_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["init"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .dockerlintrc.toml"));

    assert!(dir.path().join(".dockerlintrc.toml").exists());
}

#[test]
fn init_fails_if_config_already_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".dockerlintrc.toml"), "").unwrap();

    cmd().args(["init"]).current_dir(dir.path()).assert().failure().code(1);
}

#[test]
fn explain_lists_every_rule_with_no_argument() {
    cmd()
        .args(["explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NoSourceImage"));
}

#[test]
fn explain_known_code_prints_its_description() {
    cmd()
        .args(["explain", "NoSourceImage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FROM"));
}

#[test]
fn explain_unknown_code_fails_with_the_catalog() {
    cmd()
        .args(["explain", "NotARealCode"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown error code"));
}

#[test]
fn dockerlintrc_overrides_are_honored() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dockerfile(dir.path(), "Dockerfile", "FROM alpine\nMAINTAINER me@example.com\n");
    std::fs::write(
        dir.path().join(".dockerlintrc.toml"),
        "[validator]\ndeprecatedMaintainer = \"ignore\"\n",
    )
    .unwrap();

    // check resolves the config relative to the file's own directory, so
    // this run picks up the .dockerlintrc.toml written above.
    cmd().args(["check", file.to_str().unwrap()]).assert().success();

    let parsed = json_output(&["check", file.to_str().unwrap(), "--format", "json"]);
    let diagnostics = parsed["diagnostics"].as_array().unwrap();
    let maintainer: Vec<_> = diagnostics
        .iter()
        .filter(|d| d["code"].as_str() == Some("DeprecatedMaintainer"))
        .collect();
    assert_eq!(maintainer.len(), 1);
    assert_eq!(maintainer[0]["severity"].as_str().unwrap(), "ignore");
}
