mod common;

use altrouter::cli::{run, Cli};
use clap::Parser;
use common::temp_files;
use serde_json::Value;
use std::process::Command;

const TABLE: &str = r#"
[[route]]
pattern = '^/blog/(\d+)/post/(\d+)$'
methods = ["GET"]

[[route]]
pattern = '^/user/(?P<id>\d+)$'
methods = ["GET", "DELETE"]
"#;

fn run_lines(args: &[&str]) -> Vec<Value> {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    run(cli, &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_route_command_reports_each_path() {
    let file = temp_files::create_toml(TABLE);
    let path = file.path().to_str().unwrap();
    let lines = run_lines(&[
        "altrouter",
        "route",
        "--routes",
        path,
        "/blog/3/post/4",
        "/user/5",
        "/nowhere",
    ]);
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["dispatch"]["outcome"], "handled");
    assert_eq!(lines[0]["dispatch"]["route_slot"], 0);
    assert_eq!(lines[0]["body"]["params"], serde_json::json!(["3", "4"]));

    assert_eq!(lines[1]["dispatch"]["route_slot"], 1);
    assert_eq!(lines[1]["body"]["named_params"]["id"], "5");

    assert_eq!(lines[2]["dispatch"]["outcome"], "not_found");
    assert_eq!(lines[2]["status"], 404);
    assert_eq!(lines[2]["body"], "404 page not found\n");
}

#[test]
fn test_route_command_method_without_handler() {
    let file = temp_files::create_toml(TABLE);
    let path = file.path().to_str().unwrap();
    let lines = run_lines(&[
        "altrouter", "route", "--routes", path, "--method", "DELETE", "/blog/1/post/2",
    ]);
    assert_eq!(lines[0]["dispatch"]["outcome"], "no_handler_for_method");
    assert_eq!(lines[0]["dispatch"]["method"], "DELETE");
    assert_eq!(lines[0]["written"], false);
}

#[test]
fn test_check_command_prints_index() {
    let file = temp_files::create_toml(TABLE);
    let path = file.path().to_str().unwrap();
    let lines = run_lines(&["altrouter", "check", "--routes", path]);
    assert_eq!(lines.len(), 1);
    let report = &lines[0];
    assert_eq!(report["routes"], 2);
    assert_eq!(
        report["combined"],
        r"(^/blog/(\d+)/post/(\d+)$)|(^/user/(?P<id>\d+)$)"
    );
    assert_eq!(report["index"][0]["group"], 1);
    assert_eq!(report["index"][0]["sub_groups"], serde_json::json!([2, 3]));
    assert_eq!(report["index"][1]["group"], 4);
    assert_eq!(report["index"][1]["route_slot"], 1);
    assert_eq!(report["index"][1]["pattern"], r"^/user/(?P<id>\d+)$");
}

#[test]
fn test_check_command_fails_on_bad_pattern() {
    let file = temp_files::create_toml("[[route]]\npattern = '^/a/('\nmethods = [\"GET\"]\n");
    let cli = Cli::try_parse_from(["altrouter", "check", "--routes", file.path().to_str().unwrap()])
        .unwrap();
    let err = run(cli, &mut Vec::<u8>::new()).unwrap_err();
    assert!(err.to_string().contains("does not compile"));
}

#[test]
fn test_route_requires_paths() {
    assert!(Cli::try_parse_from(["altrouter", "route", "--routes", "x.toml"]).is_err());
}

#[test]
fn test_binary_routes_paths() {
    let file = temp_files::create_toml(TABLE);
    let output = Command::new(env!("CARGO_BIN_EXE_altrouter"))
        .env("ALTR_LOG_LEVEL", "error")
        .args(["route", "--routes"])
        .arg(file.path())
        .arg("/user/11")
        .output()
        .expect("run altrouter");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let line: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(line["body"]["named_params"]["id"], "11");
}

#[test]
fn test_binary_applies_env_overrides() {
    let file = temp_files::create_toml(TABLE);
    let output = Command::new(env!("CARGO_BIN_EXE_altrouter"))
        .env("ALTR_LOG_LEVEL", "error")
        .env("ALTR_REGEX_SIZE_LIMIT", "16")
        .args(["check", "--routes"])
        .arg(file.path())
        .output()
        .expect("run altrouter");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not compile"), "{stderr}");
}
