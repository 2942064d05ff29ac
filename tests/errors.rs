use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command { Command::cargo_bin("bf").unwrap() }

#[test]
fn test_unmatched_close_bracket_before_output() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["--code", "]["])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unmatched close bracket"))
        .stderr(predicate::str::contains("at instruction 0"));
}

#[test]
fn test_tape_underflow() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["--code", "+.<"])
        .assert()
        .code(1)
        .stdout("\u{1}")
        .stderr(predicate::str::contains("tape underflow"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn test_unterminated_skipped_loop() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["--code", "[+"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched open bracket"));
}

#[test]
fn test_open_loop_at_end_is_accepted_unless_strict() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["--code", "+["])
        .assert()
        .success();

    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["--strict", "--code", "+["])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched bracket '['"));
}

#[test]
fn test_tape_ceiling_reports_out_of_memory() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["--tape-cells", "2", "--max-tape-cells", "4", "--code", ">>>>"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("out of memory"));
}

#[test]
fn test_unallocatable_tape_reports_allocation_failure() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["--tape-cells", &usize::MAX.to_string(), "--code", "+."])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("allocation failure"))
        .stderr(predicate::str::contains("failed to allocate initial tape"));
}
