use assert_cmd::Command;
use folio_authz::TokenService;
use folio_kernel::settings::AuthSettings;
use tempfile::TempDir;

const SECRET: &str = "cli-test-secret";

/// `folio` isolated in `dir`: empty config directory, private database file,
/// cheap bcrypt cost, and no inherited auth variables.
fn folio(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.current_dir(dir.path())
        .env("FOLIO_CONFIG_DIR", dir.path())
        .env(
            "FOLIO_DATABASE__URL",
            format!("sqlite://{}", dir.path().join("folio.db").display()),
        )
        .env("FOLIO_AUTH__BCRYPT_COST", "4")
        .env("SECRET_KEY", SECRET)
        .env("RUST_LOG", "off")
        .env_remove("FOLIO_ENV")
        .env_remove("ALGORITHM")
        .env_remove("FOLIO_AUTH__SECRET_KEY")
        .env_remove("FOLIO_USER_PASSWORD");
    cmd
}

fn create_user(dir: &TempDir, username: &str, password: &str) -> std::process::Output {
    folio(dir)
        .args(["user", "create", "--username", username])
        .args(["--email", &format!("{username}@example.com")])
        .args(["--password", password])
        .output()
        .unwrap()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("folio")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["serve", "schema", "user", "token"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("folio")
        .unwrap()
        .arg("reindex")
        .assert()
        .failure();
}

#[test]
fn user_create_prints_new_ids() {
    let dir = TempDir::new().unwrap();

    let first = create_user(&dir, "reader", "secret-pass");
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert_eq!(stdout(&first), "1");

    let second = create_user(&dir, "writer", "secret-pass");
    assert!(second.status.success());
    assert_eq!(stdout(&second), "2");
}

#[test]
fn user_create_rejects_short_password() {
    let dir = TempDir::new().unwrap();

    let output = create_user(&dir, "reader", "short");
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 6 characters"));
}

#[test]
fn token_issue_signs_for_existing_user() {
    let dir = TempDir::new().unwrap();
    let created = create_user(&dir, "reader", "secret-pass");
    let user_id: i64 = stdout(&created).parse().unwrap();

    let output = folio(&dir)
        .args(["token", "issue", "--user-id", &user_id.to_string()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let tokens = TokenService::from_settings(&AuthSettings {
        secret_key: Some(SECRET.to_string()),
        ..AuthSettings::default()
    })
    .unwrap();
    let identity = tokens.verify(&stdout(&output)).unwrap();
    assert_eq!(identity.user_id, user_id);
    assert_eq!(identity.username, "reader");
    assert_eq!(identity.role, "user");
}

#[test]
fn token_issue_for_unknown_user_fails() {
    let dir = TempDir::new().unwrap();

    folio(&dir)
        .args(["token", "issue", "--user-id", "41"])
        .assert()
        .failure();
}

#[test]
fn schema_runs_without_a_secret() {
    let dir = TempDir::new().unwrap();

    folio(&dir)
        .env_remove("SECRET_KEY")
        .arg("schema")
        .assert()
        .success();
    assert!(dir.path().join("folio.db").exists());
}
