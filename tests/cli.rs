use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("source file to be written");
    path
}

#[test]
fn reports_duplicate_conditions_as_text() {
    let dir = TempDir::new().unwrap();
    let file = write_source(
        &dir,
        "chain.js",
        "if (x > 0) {\n  a();\n} else if (x > 0) {\n  b();\n}\n",
    );

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path()).arg(&file);

    let output_pred = predicate::str::contains(
        ":3:12: error: This branch duplicates the one on line 1 [no-identical-conditions]",
    )
    .and(predicate::str::contains(":1:5: Original"));

    cmd.assert().failure().code(1).stdout(output_pred);
}

#[test]
fn warnings_alone_exit_cleanly() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "negation.js", "var ok = !(a < b);\n");

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path()).arg(&file);

    cmd.assert().success().stdout(predicate::str::contains(
        ":1:10: warning: Use the opposite operator (>=) instead. [no-inverted-boolean-check]",
    ));
}

#[test]
fn emits_json_reports() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "negation.js", "f(!(a === b));\n");

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path())
        .arg(&file)
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let reports: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    let diagnostic = &reports[0]["diagnostics"][0];
    assert_eq!(diagnostic["code"], "no-inverted-boolean-check");
    assert_eq!(diagnostic["severity"], "warning");
    assert_eq!(diagnostic["fix"]["text"], "a !== b");
}

#[test]
fn emits_yaml_reports() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "chain.js", "if (a) {} else if (a) {}\n");

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path())
        .arg(&file)
        .arg("--format")
        .arg("yaml");

    let output = cmd.assert().failure().code(1).get_output().stdout.clone();
    let reports: serde_yaml::Value = serde_yaml::from_slice(&output).expect("valid yaml");
    let diagnostic = &reports[0]["diagnostics"][0];
    assert_eq!(diagnostic["code"].as_str(), Some("no-identical-conditions"));
    assert_eq!(diagnostic["severity"].as_str(), Some("error"));
    assert_eq!(diagnostic["secondary"][0]["label"].as_str(), Some("Original"));
}

#[test]
fn fix_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "fix.js", "if (!(a > b)) {\n  go();\n}\n");

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path()).arg(&file).arg("--fix");

    cmd.assert().success().stdout(predicate::str::is_empty());
    assert_eq!(fs::read_to_string(&file).unwrap(), "if (a <= b) {\n  go();\n}\n");
}

#[test]
fn config_file_changes_severity() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "chain.js", "if (a) {} else if (a) {}\n");
    let config = write_source(
        &dir,
        "custom.toml",
        "[rules.no_identical_conditions]\nseverity = \"info\"\n",
    );

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path())
        .arg(&file)
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("info: This branch duplicates"));
}

#[test]
fn local_config_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "chain.js", "if (a) {} else if (a) {}\n");
    write_source(
        &dir,
        ".radar.toml",
        "[rules.no_identical_conditions]\nenabled = false\n",
    );

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path()).arg(&file);

    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn parse_errors_fail_with_context() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "broken.js", "if (a {\n}\n");

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path()).arg(&file);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("broken.js").and(predicate::str::contains(">> ")));
}

#[test]
fn good_files_are_reported_alongside_a_broken_one() {
    let dir = TempDir::new().unwrap();
    let good = write_source(&dir, "good.js", "var ok = !(a < b);\n");
    let broken = write_source(&dir, "broken.js", "while (a {\n}\n");

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path()).arg(&good).arg(&broken);

    cmd.assert()
        .failure()
        .code(1)
        .stdout(
            predicate::str::contains("good.js:1:10: warning")
                .and(predicate::str::contains("broken.js").not()),
        )
        .stderr(predicate::str::contains("broken.js").and(predicate::str::contains("good.js").not()));
}

#[test]
fn missing_files_fail() {
    let dir = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("radar");
    cmd.current_dir(dir.path()).arg("does-not-exist.js");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot read file"));
}

#[test]
fn lists_rules() {
    let mut cmd = cargo_bin_cmd!("radar");
    cmd.arg("--list-rules");

    cmd.assert().success().stdout(
        predicate::str::contains("no-identical-conditions")
            .and(predicate::str::contains("no-inverted-boolean-check"))
            .and(predicate::str::contains("fixable")),
    );
}
