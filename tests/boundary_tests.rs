use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_sub_cent_amount_is_emitted_as_zero() {
    let mut cmd = Command::new(cargo_bin!("promptpos"));
    cmd.args(["payload", "--amount", "0.001"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("530376454040.005802TH6304B0AA"));
}

#[test]
fn test_zero_amount_omits_amount_field() {
    let mut cmd = Command::new(cargo_bin!("promptpos"));
    cmd.args(["payload", "--amount", "0"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("53037645802TH6304B369"));
}

#[test]
fn test_largest_amount_that_fits() {
    let mut cmd = Command::new(cargo_bin!("promptpos"));
    cmd.args(["payload", "--amount", "9999999999.99"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("54139999999999.99"));
}

#[test]
fn test_oversized_amount_is_rejected() {
    let mut cmd = Command::new(cargo_bin!("promptpos"));
    cmd.args(["payload", "--amount", "10000000000"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[test]
fn test_negative_amount_is_rejected() {
    let mut cmd = Command::new(cargo_bin!("promptpos"));
    cmd.args(["payload", "--amount", "-1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[test]
fn test_invalid_phone_is_rejected() {
    let mut cmd = Command::new(cargo_bin!("promptpos"));
    cmd.args(["payload", "--amount", "1", "--phone", "09-1779-7477"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid identifier"));
}
