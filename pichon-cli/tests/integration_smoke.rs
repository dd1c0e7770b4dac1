//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("pichon").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("pichon").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--cors-permissive"))
        .stdout(predicate::str::contains("--skip-migrations"));
}

#[test]
fn test_serve_without_database_names_variable() {
    let mut cmd = Command::cargo_bin("pichon").unwrap();
    cmd.env_clear().current_dir(std::env::temp_dir()).arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("POSTGRES_URI_LOCAL"));
}

#[test]
fn test_production_needs_prod_uri() {
    let mut cmd = Command::cargo_bin("pichon").unwrap();
    cmd.env_clear()
        .current_dir(std::env::temp_dir())
        .env("ENVIRONMENT", "production")
        .arg("migrate");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("POSTGRES_URI_PROD"));
}

#[test]
fn test_serve_without_mailchimp_names_variable() {
    let mut cmd = Command::cargo_bin("pichon").unwrap();
    cmd.env_clear()
        .current_dir(std::env::temp_dir())
        .args(["serve", "--database-url", "postgres://localhost/unused"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("MAILCHIMP_API_KEY"));
}
