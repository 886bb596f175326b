//! Integration tests for the CredVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  Every
//! test runs in its own temp dir with `CREDVAULT_PASSPHRASE` set, so no
//! prompt is ever shown.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const OPENAI_KEY: &str = "sk-abc12345678901234567890";

/// Helper: get a Command pointing at the credvault binary.
fn credvault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("credvault").expect("binary should exist")
}

/// Helper: a command running inside `dir` with a fixed passphrase.
fn in_vault(dir: &TempDir) -> Command {
    let mut cmd = credvault();
    cmd.current_dir(dir.path())
        .env("CREDVAULT_PASSPHRASE", "test-passphrase")
        .env_remove("CREDVAULT_LOG");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    credvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted vault for provider API keys"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn version_flag_shows_version() {
    credvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}

#[test]
fn no_args_shows_help() {
    credvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn detect_prints_provider_id() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["detect", "sk-ant-REDACTED"])
        .assert()
        .success()
        .stdout("anthropic\n");

    in_vault(&tmp)
        .arg("detect")
        .write_stdin("randomtoken1234567890\n")
        .assert()
        .success()
        .stdout("custom\n");
}

#[test]
fn mask_hides_the_middle() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["mask", "sk-abc123456789xyz"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("sk-a"))
        .stdout(predicate::str::contains("*"))
        .stdout(predicate::str::contains("sk-abc123456789xyz").not());
}

#[test]
fn set_then_get_roundtrip() {
    let tmp = TempDir::new().unwrap();

    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success()
        .stdout(predicate::str::contains("added"));

    tmp.child(".credvault/credvault.credentials")
        .assert(predicate::path::exists());
    tmp.child(".credvault/credvault.credentials")
        .assert(predicate::str::contains(OPENAI_KEY).not());

    in_vault(&tmp)
        .args(["get", "openai", "--no-setup"])
        .assert()
        .success()
        .stdout(format!("{OPENAI_KEY}\n"));
}

#[test]
fn set_auto_detects_provider() {
    let tmp = TempDir::new().unwrap();

    in_vault(&tmp)
        .args(["set", "auto"])
        .write_stdin("gsk_abcdefghijklmnopqrst")
        .assert()
        .success()
        .stdout(predicate::str::contains("groq"));

    in_vault(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("groq"))
        .stdout(predicate::str::contains("gsk_abcdefghijklmnopqrst").not());
}

#[test]
fn set_rejects_short_key() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin("short")
        .assert()
        .failure();

    tmp.child(".credvault/credvault.credentials")
        .assert(predicate::path::missing());
}

#[test]
fn get_missing_key_fails() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["get", "openai", "--no-setup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("openai"));
}

#[test]
fn get_with_wrong_passphrase_fails() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();

    in_vault(&tmp)
        .env("CREDVAULT_PASSPHRASE", "another-passphrase")
        .args(["get", "openai", "--no-setup"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(OPENAI_KEY).not());
}

#[test]
fn set_with_wrong_passphrase_keeps_existing_keys() {
    let tmp = TempDir::new().unwrap();
    for (provider, key) in [
        ("openai", OPENAI_KEY),
        ("anthropic", "sk-ant-REDACTED"),
    ] {
        in_vault(&tmp)
            .args(["set", provider])
            .write_stdin(key)
            .assert()
            .success();
    }
    let blob = tmp.child(".credvault/credvault.credentials");
    let before = std::fs::read(blob.path()).unwrap();

    in_vault(&tmp)
        .env("CREDVAULT_PASSPHRASE", "typo")
        .args(["set", "groq"])
        .write_stdin("gsk_abcdefghijklmnopqrst")
        .assert()
        .failure()
        .stdout(predicate::str::contains("added").not())
        .stderr(predicate::str::contains("--force"));

    assert_eq!(std::fs::read(blob.path()).unwrap(), before);
    in_vault(&tmp)
        .args(["get", "openai", "--no-setup"])
        .assert()
        .success()
        .stdout(format!("{OPENAI_KEY}\n"));
}

#[test]
fn set_force_replaces_unreadable_vault() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();

    in_vault(&tmp)
        .env("CREDVAULT_PASSPHRASE", "new-passphrase")
        .args(["set", "groq", "--force"])
        .write_stdin("gsk_abcdefghijklmnopqrst")
        .assert()
        .success()
        .stderr(predicate::str::contains("could not be read"));

    in_vault(&tmp)
        .env("CREDVAULT_PASSPHRASE", "new-passphrase")
        .args(["get", "groq", "--no-setup"])
        .assert()
        .success()
        .stdout("gsk_abcdefghijklmnopqrst\n");
}

#[test]
fn delete_removes_blob_when_last_key_goes() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();

    in_vault(&tmp)
        .args(["delete", "openai", "--force"])
        .assert()
        .success();

    tmp.child(".credvault/credvault.credentials")
        .assert(predicate::path::missing());
    tmp.child(".credvault/credvault.credentials.meta")
        .assert(predicate::str::contains("deleted"));
}

#[test]
fn status_lists_recognized_providers() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();

    in_vault(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("openai"))
        .stdout(predicate::str::contains("anthropic"))
        .stdout(predicate::str::contains("1 of"));
}

#[test]
fn settings_file_changes_app_namespace() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".credvault.toml")
        .write_str("app_name = \"editor\"\n")
        .unwrap();

    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();

    tmp.child(".credvault/editor.credentials")
        .assert(predicate::path::exists());
}

#[test]
fn clear_force_wipes_everything() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();

    in_vault(&tmp).args(["clear", "--force"]).assert().success();

    tmp.child(".credvault/credvault.credentials")
        .assert(predicate::path::missing());
    tmp.child(".credvault/credvault.credentials.meta")
        .assert(predicate::path::missing());
}

#[test]
fn history_shows_recorded_events() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();

    in_vault(&tmp)
        .args(["history", "--last", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stored"))
        .stdout(predicate::str::contains("openai"));
}

#[test]
fn history_only_shows_the_selected_app() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["set", "openai"])
        .write_stdin(OPENAI_KEY)
        .assert()
        .success();
    in_vault(&tmp)
        .args(["--app", "editor", "set", "groq"])
        .write_stdin("gsk_abcdefghijklmnopqrst")
        .assert()
        .success();

    in_vault(&tmp)
        .args(["--app", "editor", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("groq"))
        .stdout(predicate::str::contains("openai").not());
}

#[test]
fn completions_generate_script() {
    credvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}

#[test]
fn completions_reject_unknown_shell() {
    credvault()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
