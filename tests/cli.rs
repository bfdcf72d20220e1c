use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STATEMENT: &str = "\
Transaction Date,Transaction Type,Sort Code,Account Number,Transaction Description,Debit Amount,Credit Amount,Balance
20/03/2024,FPI,'11-22-33,12345678,JANE DOE 123456789012345678 MEMBERSHIP 2024,,50.00,150.00
18/03/2024,FPO,'11-22-33,12345678,JOHN SMITH 123456789012345678 UMPIRE FEES,30.00,,100.00
15/03/2024,DD,'11-22-33,12345678,MYSTERY SHOP,5.00,,130.00
";

struct Env {
    home: TempDir,
    data: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
            data: tempfile::tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("treasurer").unwrap();
        cmd.env("HOME", self.home.path())
            .env("TREASURER_DATA_DIR", self.data.path())
            .env("NO_COLOR", "1")
            .env_remove("TREASURER_LOG");
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.home.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn import_statement(&self) -> PathBuf {
        let path = self.write("statement.csv", STATEMENT);
        self.cmd().arg("import").arg(&path).assert().success();
        path
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_parse_prints_name_and_reference() {
    let env = Env::new();
    env.cmd()
        .args([
            "parse",
            "EDINBURGH UNIVERSI 000123456789012345 CLUBDUES 654321 10:00",
            "--type",
            "FPO",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("EUWHC"))
        .stdout(predicate::str::contains("CLUBDUES"))
        .stdout(predicate::str::contains("Faster payment out"));
}

#[test]
fn test_init_then_status() {
    let env = Env::new();
    env.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Categories:     30"));
    assert!(env.data.path().join("treasurer.db").exists());

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:      0"));
}

#[test]
fn test_status_before_init() {
    let env = Env::new();
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store not found"));
}

#[test]
fn test_import_and_duplicate() {
    let env = Env::new();
    let path = env.write("statement.csv", STATEMENT);
    env.cmd()
        .args(["import", arg(&path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 imported"));
    env.cmd()
        .args(["import", arg(&path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("already been imported"));
}

#[test]
fn test_import_malformed_file_fails() {
    let env = Env::new();
    let path = env.write("bad.csv", "Date,Amount\n01/01/2024,5\n");
    env.cmd()
        .args(["import", arg(&path)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Missing CSV column"));
}

#[test]
fn test_categorize_assigns_and_lists() {
    let env = Env::new();
    env.import_statement();
    env.cmd()
        .arg("categorize")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 categorized, 1 still uncategorized"));

    env.cmd()
        .arg("transactions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Match Costs"))
        .stdout(predicate::str::contains("Membership fees"))
        .stdout(predicate::str::contains("March 2024"));

    env.cmd()
        .args(["transactions", "--uncategorized"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MYSTERY SHOP"))
        .stdout(predicate::str::contains("UMPIRE").not());

    // already categorized, nothing further to do
    env.cmd()
        .arg("categorize")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 categorized"));
}

#[test]
fn test_edit_saves_mapping() {
    let env = Env::new();
    env.import_statement();
    env.cmd()
        .args(["edit", "MYSTERY SHOP", "--name", "Club Shop", "--category", "Kit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 1 transaction(s)"));

    env.cmd()
        .args(["mappings", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MYSTERY SHOP"))
        .stdout(predicate::str::contains("Club Shop"))
        .stdout(predicate::str::contains("Kit"));

    env.cmd()
        .args(["edit", "MYSTERY SHOP", "--category", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category: Nope"));
}

#[test]
fn test_edit_shared_category_name_follows_direction() {
    let env = Env::new();
    env.import_statement();
    env.cmd()
        .args(["edit", "MYSTERY SHOP", "--category", "Miscellaneous"])
        .assert()
        .success();
    env.cmd()
        .args(["budget", "set", "expense_misc", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Miscellaneous"));
    env.cmd()
        .args(["report", "budget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("£5.00"))
        .stdout(predicate::str::contains("£15.00"));

    env.cmd()
        .args(["budget", "set", "Tests", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous"))
        .stderr(predicate::str::contains("expense_tests"));
}

#[test]
fn test_categories_add_and_delete() {
    let env = Env::new();
    env.cmd()
        .args(["categories", "add", "Tour", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added category: Tour"));
    env.cmd()
        .args(["categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tour"));
    env.cmd()
        .args(["categories", "delete", "Tour"])
        .assert()
        .success();
    env.cmd()
        .args(["categories", "delete", "Kit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be deleted"));
}

#[test]
fn test_budget_report() {
    let env = Env::new();
    env.import_statement();
    env.cmd().arg("categorize").assert().success();
    env.cmd()
        .args(["budget", "set", "Match Costs", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("£100.00"));
    env.cmd()
        .args(["report", "budget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Match Costs"))
        .stdout(predicate::str::contains("£70.00"));
}

#[test]
fn test_yearly_report() {
    let env = Env::new();
    env.import_statement();
    env.cmd().arg("categorize").assert().success();
    env.cmd()
        .args(["report", "yearly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yearly Summary 2023/24"))
        .stdout(predicate::str::contains("Unassigned"))
        .stdout(predicate::str::contains("£50.00"));
}

#[test]
fn test_backup_export_and_restore() {
    let env = Env::new();
    env.import_statement();
    let backup = env.home.path().join("backup.json");
    env.cmd()
        .args(["backup", "export", "--output", arg(&backup)])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 transactions"));
    let json = std::fs::read_to_string(&backup).unwrap();
    assert!(json.contains("\"version\": \"1.0\""));

    let other = Env::new();
    other
        .cmd()
        .args(["backup", "restore", arg(&backup)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 3 transactions"));
    other
        .cmd()
        .arg("transactions")
        .assert()
        .success()
        .stdout(predicate::str::contains("MYSTERY SHOP"));
}

#[test]
fn test_clear_cache_requires_confirmation() {
    let env = Env::new();
    env.import_statement();
    env.cmd()
        .arg("clear-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    env.cmd().args(["clear-cache", "--yes"]).assert().success();
    env.cmd()
        .arg("transactions")
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions"));
}
