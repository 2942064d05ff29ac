use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn strict_loops_from_config_file() {
    let cfg = config_file("[interpreter]\nstrict_loops = true\n");
    Command::cargo_bin("bf").unwrap()
        .timeout(Duration::from_secs(2))
        .env("BF_CONFIG", cfg.path())
        .args(["--code", "+["])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched open bracket"));
}

#[test]
fn env_overrides_config_file() {
    let cfg = config_file("[interpreter]\nstrict_loops = true\n");
    Command::cargo_bin("bf").unwrap()
        .timeout(Duration::from_secs(2))
        .env("BF_CONFIG", cfg.path())
        .env("BF_STRICT", "0")
        .args(["--code", "+["])
        .assert()
        .success();
}

#[test]
fn flags_override_config_file() {
    let cfg = config_file("[interpreter]\nmax_tape_cells = 2\n");
    Command::cargo_bin("bf").unwrap()
        .timeout(Duration::from_secs(2))
        .env("BF_CONFIG", cfg.path())
        .args(["--max-tape-cells", "64", "--tape-cells", "1", "--code", ">>>>"])
        .assert()
        .success();
}
