use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("wallet-ledger"));
    cmd.arg("apply").arg("tests/fixtures/payments.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("account,balance"))
        .stdout(predicate::str::contains("1,499.50"))
        .stdout(predicate::str::contains("2,1400.20"))
        .stdout(predicate::str::contains("3,1100.30"));

    Ok(())
}

#[test]
fn test_cli_unknown_account_lookup_fails() {
    let mut cmd = Command::new(cargo_bin!("wallet-ledger"));
    cmd.arg("account").arg("42");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("account 42 is not found"));
}

#[test]
fn test_cli_empty_history() {
    let mut cmd = Command::new(cargo_bin!("wallet-ledger"));
    cmd.arg("payments").arg("7");

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("id,from,to,amount,created_at\n"));
}
