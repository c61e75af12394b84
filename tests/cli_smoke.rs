use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn bt_help_works() {
    Command::cargo_bin("bt")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("lifecycle"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "init", "new", "list", "show", "vote", "confirm", "possess", "resolve", "verify",
        "reopen", "delete",
    ];

    for cmd in subcommands {
        Command::cargo_bin("bt")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn resolve_requires_reason() {
    Command::cargo_bin("bt")
        .expect("binary")
        .args(["resolve", "0"])
        .assert()
        .failure()
        .stderr(contains("--reason"));
}
