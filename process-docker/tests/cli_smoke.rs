//! Binary smoke tests for the `juju-process-docker` CLI.
//!
//! The real docker binary is swapped for a shell script (selected through
//! `JUJU_PROCESS_DOCKER_BIN`) that records every invocation and answers like
//! docker would.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const FAKE_DOCKER: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_DOCKER_LOG"
case " $FAKE_DOCKER_FAIL " in
    *" $1 "*)
        echo "Error response from daemon: no such id: foo" >&2
        exit 1
        ;;
esac
case "$1" in
    inspect) cat "$FAKE_DOCKER_INSPECT" ;;
    version) printf 'Client:\n Version:      1.8.1\n API version:  1.20\n' ;;
    *) echo somebigid ;;
esac
"#;

const FAKE_INSPECT_OUTPUT: &str = r#"[
{
    "Id": "b508c7d5c2722b7ac4f105fedf835789fb705f71feb6e264f542dc33cdc41232",
    "Name": "/sad_perlman",
    "State": {
        "Running": true,
        "Paused": false,
        "Restarting": false,
        "OOMKilled": false,
        "Dead": false,
        "Pid": 11820,
        "ExitCode": 0,
        "Error": ""
    }
}
]"#;

const WHALESAY: &str = r#"{
    "Name": "juju-name",
    "Description": "desc",
    "Type": "docker",
    "Command": "cowsay boo!",
    "Image": "docker/whalesay",
    "Ports": [
        {"External": 8080, "Internal": 80},
        {"External": 8022, "Internal": 22}
    ],
    "Volumes": [
        {"ExternalMount": "/foo", "InternalMount": "/bar", "Mode": "ro"},
        {"ExternalMount": "/baz", "InternalMount": "/bat", "Mode": "rw"}
    ],
    "EnvVars": {"foo": "bar", "baz": "bat"}
}"#;

/// A temp dir holding the fake docker, its inspect payload, and its call log.
struct FakeDocker {
    dir: TempDir,
}

impl FakeDocker {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("docker");
        fs::write(&bin, FAKE_DOCKER).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("inspect.json"), FAKE_INSPECT_OUTPUT).unwrap();
        Self { dir }
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    /// Every docker invocation so far, one per line.
    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn set_inspect_output(&self, out: &str) {
        fs::write(self.dir.path().join("inspect.json"), out).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = plugin();
        cmd.env("JUJU_PROCESS_DOCKER_BIN", self.dir.path().join("docker"))
            .env("FAKE_DOCKER_LOG", self.log_path())
            .env("FAKE_DOCKER_INSPECT", self.dir.path().join("inspect.json"))
            .env_remove("FAKE_DOCKER_FAIL")
            .env_remove("JUJU_PROCESS_DOCKER_API_VERSION")
            .env_remove("JUJU_PROCESS_DOCKER_LOG");
        cmd
    }
}

#[allow(deprecated)] // cargo_bin works fine for our use case
fn plugin() -> Command {
    Command::cargo_bin("juju-process-docker").unwrap()
}

// ── Help ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let output = plugin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in &["launch", "status", "destroy", "help"] {
        assert!(
            stdout.contains(cmd),
            "Help text should mention '{cmd}' subcommand"
        );
    }
}

#[test]
fn help_for_launch_describes_the_descriptor() {
    plugin()
        .args(["help", "launch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RepoFile"))
        .stdout(predicate::str::contains("ExternalMount"));
}

#[test]
fn no_arguments_is_a_usage_error() {
    plugin().assert().failure();
}

#[test]
fn unknown_command_is_a_usage_error() {
    plugin().arg("explode").assert().failure();
}

#[test]
fn missing_id_is_a_usage_error() {
    let docker = FakeDocker::new();
    docker.cmd().arg("status").assert().failure();
    assert!(docker.calls().is_empty());
}

// ── Launch ──────────────────────────────────────────────────────────────────

#[test]
fn launch_prints_details() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .args(["launch", WHALESAY])
        .assert()
        .success()
        .stdout(r#"{"id":"sad_perlman","status":{"state":"Running"}}"#.to_string() + "\n");

    assert_eq!(
        docker.calls(),
        [
            "run --detach --name juju-name -e baz=bat -e foo=bar -p 8080:80/tcp -p 8022:22/tcp \
             -v /foo:/bar:ro -v /baz:/bat:rw docker/whalesay cowsay boo!",
            "inspect somebigid",
        ]
    );
}

#[test]
fn launch_with_bad_json_fails() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .args(["launch", "{not json"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("can't decode proc-info"));
    assert!(docker.calls().is_empty());
}

#[test]
fn launch_with_invalid_descriptor_fails() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .args(["launch", r#"{"Image": "docker/whalesay"}"#])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid proc-info: missing name"));
    assert!(docker.calls().is_empty());
}

#[test]
fn launch_run_failure_reports_stderr() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .env("FAKE_DOCKER_FAIL", "run")
        .args(["launch", WHALESAY])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no such id: foo"));
    assert_eq!(docker.calls().len(), 1);
}

// ── Status ──────────────────────────────────────────────────────────────────

#[test]
fn status_prints_state() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .args(["status", "someid"])
        .assert()
        .success()
        .stdout("{\"state\":\"Running\"}\n");
    assert_eq!(docker.calls(), ["inspect someid"]);
}

#[test]
fn status_with_no_records_fails() {
    let docker = FakeDocker::new();
    docker.set_inspect_output("[]");
    docker
        .cmd()
        .args(["status", "someid"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "no status returned from docker inspect someid",
        ));
}

#[test]
fn status_honours_legacy_api_version() {
    let docker = FakeDocker::new();
    docker.set_inspect_output(r#"[{"Id":"x","Name":"/x","State":{"Status":"paused"}}]"#);
    docker
        .cmd()
        .args(["status", "x"])
        .assert()
        .success()
        .stdout("{\"state\":\"Paused\"}\n");
    docker
        .cmd()
        .env("JUJU_PROCESS_DOCKER_API_VERSION", "1.18")
        .args(["status", "x"])
        .assert()
        .success()
        .stdout("{\"state\":\"Unknown\"}\n");
}

#[test]
fn bad_log_filter_warns_on_stderr() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .env("JUJU_PROCESS_DOCKER_LOG", "process_docker=loud")
        .args(["status", "someid"])
        .assert()
        .success()
        .stdout("{\"state\":\"Running\"}\n")
        .stderr(predicate::str::contains(
            "invalid JUJU_PROCESS_DOCKER_LOG, falling back to warn",
        ));
}

// ── Destroy ─────────────────────────────────────────────────────────────────

#[test]
fn destroy_stops_and_removes() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .args(["destroy", "someid"])
        .assert()
        .success()
        .stdout("");
    assert_eq!(docker.calls(), ["stop someid", "rm someid"]);
}

#[test]
fn destroy_stop_failure_skips_rm() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .env("FAKE_DOCKER_FAIL", "stop")
        .args(["destroy", "foo"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "error while stopping container \"foo\"",
        ));
    assert_eq!(docker.calls(), ["stop foo"]);
}

#[test]
fn destroy_rm_failure_is_reported() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .env("FAKE_DOCKER_FAIL", "rm")
        .args(["destroy", "foo"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "error while removing container \"foo\"",
        ));
    assert_eq!(docker.calls(), ["stop foo", "rm foo"]);
}

// ── Version ─────────────────────────────────────────────────────────────────

#[test]
fn version_reports_docker_client() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("juju-process-docker "))
        .stdout(predicate::str::contains("docker 1.8.1 (API 1.20)"));
}

#[test]
fn missing_docker_binary_fails_cleanly() {
    let docker = FakeDocker::new();
    docker
        .cmd()
        .env("JUJU_PROCESS_DOCKER_BIN", docker.dir.path().join("nope"))
        .args(["status", "someid"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("failed to run"));
}
