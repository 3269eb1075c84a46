//! End-to-end tests for the `config` command.

mod common;
use common::prelude::*;

#[test]
fn test_config_outside_pride_uses_global_file() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["config", "gradle.home", "/opt/gradle"])
        .assert()
        .success();

    let global = std::fs::read_to_string(fixture.global_config()).unwrap();
    assert!(global.contains("gradle.home=/opt/gradle"));

    fixture
        .command()
        .args(["config", "gradle.home"])
        .assert()
        .success()
        .stdout("/opt/gradle\n");
}

#[test]
fn test_config_get_missing_key_exits_with_1() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["config", "no.such.key"])
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn test_config_unset_missing_key_writes_nothing() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["config", "--unset", "no.such.key"])
        .assert()
        .code(1);

    assert!(!fixture.global_config().exists());
}

#[test]
fn test_config_unset_existing_key() {
    let fixture = TestFixture::new().with_global_setting("git.command", "/usr/local/bin/git");

    fixture
        .command()
        .args(["config", "--unset", "git.command"])
        .assert()
        .success();

    fixture
        .command()
        .args(["config", "git.command"])
        .assert()
        .code(1);
}

#[test]
fn test_config_default_keeps_existing_value() {
    let fixture = TestFixture::new().with_global_setting("gradle.wrapper", "true");

    fixture
        .command()
        .args(["config", "--default", "gradle.wrapper", "false"])
        .assert()
        .success();
    fixture
        .command()
        .args(["config", "--default", "svn.command", "svn2"])
        .assert()
        .success();

    fixture
        .command()
        .args(["config", "gradle.wrapper"])
        .assert()
        .stdout("true\n");
    fixture
        .command()
        .args(["config", "svn.command"])
        .assert()
        .stdout("svn2\n");
}

#[test]
fn test_config_inside_pride_writes_local_file() {
    let fixture = TestFixture::new().with_pride(&["app"]);

    fixture
        .command()
        .args(["config", "gradle.home", "/local/gradle"])
        .assert()
        .success();

    let local = fixture.read(".pride/config");
    assert!(local.contains("gradle.home=/local/gradle"));
    // The module registry survives config writes
    assert!(local.contains("modules.0.name=app"));
    assert!(!fixture.global_config().exists());

    fixture
        .command()
        .args(["config", "--global", "gradle.home"])
        .assert()
        .code(1);
}

#[test]
fn test_config_local_overrides_global() {
    let fixture = TestFixture::new()
        .with_global_setting("gradle.home", "/global/gradle")
        .with_global_setting("git.command", "git-global")
        .with_pride(&[]);

    fixture
        .command()
        .args(["config", "--local", "gradle.home", "/local/gradle"])
        .assert()
        .success();

    fixture
        .command()
        .args(["config", "gradle.home"])
        .assert()
        .stdout("/local/gradle\n");
    fixture
        .command()
        .args(["config", "git.command"])
        .assert()
        .stdout("git-global\n");
    fixture
        .command()
        .args(["config", "--local", "git.command"])
        .assert()
        .code(1);
}

#[test]
fn test_config_local_outside_pride_fails() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["config", "--local", "gradle.home"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No pride found"));
}

#[test]
fn test_config_refuses_module_keys() {
    let fixture = TestFixture::new().with_pride(&["app"]);

    fixture
        .command()
        .args(["config", "modules.0.name", "other"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("pride add"));

    assert!(fixture.read(".pride/config").contains("modules.0.name=app"));
}

#[test]
fn test_config_conflicting_scopes() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["config", "--global", "--local", "gradle.home"])
        .assert()
        .code(2);
}
