// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use assert_cmd::Command;
use predicates::prelude::*;

const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn hackerhouse() -> Command {
    let mut cmd = Command::cargo_bin("hackerhouse").unwrap();
    cmd.env_remove("RPC_URL")
        .env_remove("PRIVATE_KEY")
        .env_remove("CHAIN_ID")
        .env_remove("H2_CONTRACT_ADDRESS")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_command() {
    hackerhouse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("selector"))
        .stdout(predicate::str::contains("storage"));
}

#[test]
fn test_selector_command() {
    hackerhouse()
        .args(["selector", "function callMeZero(uint256 someNumber, address someAddress)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("callMeZero(uint256,address)"))
        .stdout(predicate::str::contains("0x"));
}

#[test]
fn test_selector_rejects_garbage() {
    hackerhouse().args(["selector", "not a ( signature"]).assert().code(2);
}

#[test]
fn test_json_logs_stay_off_stdout() {
    hackerhouse()
        .env("RUST_LOG", "debug")
        .args(["--log-json", "selector", "callMeZero(uint256,address)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("callMeZero(uint256,address)"))
        .stdout(predicate::str::contains(r#""level""#).not())
        .stderr(predicate::str::contains(r#""level":"DEBUG""#));
}

#[test]
fn test_list_command() {
    hackerhouse()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("e1"))
        .stdout(predicate::str::contains("h3"))
        .stdout(predicate::str::contains("--target required"));
}

#[test]
fn test_run_without_target_exits_with_config_error() {
    // Nothing listens on this port; the run must stop before connecting.
    hackerhouse()
        .args(["run", "m2", "--rpc-url", "http://127.0.0.1:9", "--private-key", KEY])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--target"));
}

#[test]
fn test_run_requires_an_endpoint() {
    hackerhouse().args(["run", "e1", "--private-key", KEY]).assert().failure();
}
