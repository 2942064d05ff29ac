use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command { Command::cargo_bin("bf").unwrap() }

fn program_file(content: &[u8]) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    tf.write_all(content).unwrap();
    tf
}

#[test]
fn multiplication_program_prints_byte_64() {
    let tf = program_file(b"++++++++[>++++++++<-]>.");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout("@")
        .stderr(predicate::str::is_empty());
}

#[test]
fn comments_only_program_is_silent() {
    let tf = program_file(b"This file has no instructions at all\n");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn hello_world_with_comments_and_newlines() {
    let tf = program_file(
        b"print Hello\n++++++++++[>+++++++>++++++++++>+++>+<<<<-]\n>++.>+.+++++++..+++.>++.\n",
    );
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout("Hello ");
}

#[test]
fn inline_code_runs_without_a_file() {
    cargo_bin()
        .args(["--code", "+++."])
        .assert()
        .success()
        .stdout("\u{3}");
}

#[test]
fn missing_program_file_fails() {
    cargo_bin()
        .arg("/no/such/dir/program.bf")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot read program"));
}

#[test]
fn no_program_prints_usage() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help_flag_exits_zero() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("--max-steps"));
}
