use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

const FAKE_LOGCLI: &str = r#"#!/bin/sh
sub="$1"; shift
[ "$sub" = "labels" ] || exit 1
if [ "$1" = "--quiet" ]; then
    printf 'app\nenv\n'
else
    case "$1" in
        app) printf 'nginx\nredis\n' ;;
        env) printf 'prod\nstaging\n' ;;
        *) exit 1 ;;
    esac
fi
"#;

// Stand-in fuzzy picker: always takes the first candidate.
const FAKE_FZF: &str = r#"#!/bin/sh
head -n 1
"#;

fn install_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// A `lokq` command with fake `logcli`/`fzf` executables first on PATH and
/// LOKI_ADDR set.
fn lokq(bin_dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lokq").unwrap();
    let path = format!(
        "{}:{}",
        bin_dir.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    cmd.env("PATH", path).env("LOKI_ADDR", "http://localhost:3100");
    cmd
}

fn fake_bin_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    install_script(dir.path(), "logcli", FAKE_LOGCLI);
    install_script(dir.path(), "fzf", FAKE_FZF);
    dir
}

#[test]
fn version_flag_succeeds() {
    #[allow(deprecated)]
    Command::cargo_bin("lokq")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("lokq"));
}

#[test]
fn help_flag_succeeds() {
    #[allow(deprecated)]
    Command::cargo_bin("lokq")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("--cache"));
}

#[test]
fn missing_loki_addr_fails() {
    #[allow(deprecated)]
    Command::cargo_bin("lokq")
        .unwrap()
        .env_remove("LOKI_ADDR")
        .write_stdin("1\n1h\nn\nn\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("LOKI_ADDR"));
}

#[test]
fn prints_relative_range_query() {
    let bin = fake_bin_dir();
    lokq(bin.path())
        // time type, duration, operator (default), more labels, line filter
        .write_stdin("1\n1h\n\nn\nn\n")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            r#"logcli query '{app="nginx"}' --since 1h"#,
        ));
}

#[test]
fn prints_absolute_range_query() {
    let bin = fake_bin_dir();
    let assert = lokq(bin.path())
        .write_stdin("2\n2025-08-14\n2025-08-14\n\nn\nn\n")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("--from"), "stdout: {stdout}");
    assert!(stdout.contains("T00:00:00"), "stdout: {stdout}");
    assert!(stdout.contains("--to"), "stdout: {stdout}");
    assert!(stdout.contains("T23:59:59"), "stdout: {stdout}");
}

#[test]
fn appends_line_filter() {
    let bin = fake_bin_dir();
    lokq(bin.path())
        // filter operator defaults to |= on empty input
        .write_stdin("1\n1h\n\nn\ny\n\nerror\n")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            r#"logcli query '{app="nginx"} |= "error"' --since 1h"#,
        ));
}

#[test]
fn invalid_time_range_choice_fails() {
    let bin = fake_bin_dir();
    lokq(bin.path())
        .write_stdin("9\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid choice: 9"));
}

#[test]
fn invalid_operator_choice_fails() {
    let bin = fake_bin_dir();
    lokq(bin.path())
        .write_stdin("1\n1h\n5\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid choice: 5"));
}

#[test]
fn cache_answers_without_touching_logcli() {
    let bin = TempDir::new().unwrap();
    // Any live lookup would fail loudly; only the cache can answer.
    install_script(bin.path(), "logcli", "#!/bin/sh\nexit 1\n");
    install_script(bin.path(), "fzf", FAKE_FZF);

    let cache_home = TempDir::new().unwrap();
    let app_dir = cache_home.path().join("lokq");
    fs::create_dir_all(&app_dir).unwrap();
    fs::write(
        app_dir.join("labels.json"),
        r#"{"labels": ["job"], "values": {"job": ["api"]}}"#,
    )
    .unwrap();

    lokq(bin.path())
        .arg("--cache")
        .env("XDG_CACHE_HOME", cache_home.path())
        .write_stdin("1\n1h\n\nn\nn\n")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            r#"logcli query '{job="api"}' --since 1h"#,
        ));
}

#[test]
fn cache_without_labels_key_falls_back_to_logcli() {
    let bin = fake_bin_dir();

    let cache_home = TempDir::new().unwrap();
    let app_dir = cache_home.path().join("lokq");
    fs::create_dir_all(&app_dir).unwrap();
    // "labels" key absent: label listing must come from logcli, and the
    // value lookup for "app" (not in the cached map) must too.
    fs::write(
        app_dir.join("labels.json"),
        r#"{"values": {"job": ["api"]}}"#,
    )
    .unwrap();

    lokq(bin.path())
        .arg("--cache")
        .env("XDG_CACHE_HOME", cache_home.path())
        .write_stdin("1\n1h\n\nn\nn\n")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            r#"logcli query '{app="nginx"}' --since 1h"#,
        ));
}

#[test]
fn broken_cache_falls_back_to_logcli() {
    let bin = fake_bin_dir();

    let cache_home = TempDir::new().unwrap();
    let app_dir = cache_home.path().join("lokq");
    fs::create_dir_all(&app_dir).unwrap();
    fs::write(app_dir.join("labels.json"), "{not json").unwrap();

    lokq(bin.path())
        .arg("--cache")
        .env("XDG_CACHE_HOME", cache_home.path())
        .write_stdin("1\n1h\n\nn\nn\n")
        .assert()
        .success()
        .stdout(predicates::str::contains(r#"'{app="nginx"}'"#));
}

#[test]
fn execute_mode_runs_the_assembled_command() {
    let bin = TempDir::new().unwrap();
    let record = bin.path().join("argv.txt");
    let script = format!(
        r#"#!/bin/sh
case "$1" in
    query)
        printf '%s\n' "$@" > "{record}"
        ;;
    labels)
        if [ "$2" = "--quiet" ]; then printf 'app\nenv\n'; else printf 'nginx\nredis\n'; fi
        ;;
    *) exit 1 ;;
esac
"#,
        record = record.display()
    );
    install_script(bin.path(), "logcli", &script);
    install_script(bin.path(), "fzf", FAKE_FZF);

    lokq(bin.path())
        .arg("--execute")
        .write_stdin("1\n1h\n\nn\nn\n")
        .assert()
        .success();

    let argv = fs::read_to_string(&record).unwrap();
    assert_eq!(argv, "query\n{app=\"nginx\"}\n--since\n1h\n");
}

#[test]
fn execute_mode_surfaces_a_failing_command() {
    let bin = TempDir::new().unwrap();
    let script = r#"#!/bin/sh
case "$1" in
    query) exit 3 ;;
    labels)
        if [ "$2" = "--quiet" ]; then printf 'app\nenv\n'; else printf 'nginx\nredis\n'; fi
        ;;
    *) exit 1 ;;
esac
"#;
    install_script(bin.path(), "logcli", script);
    install_script(bin.path(), "fzf", FAKE_FZF);

    lokq(bin.path())
        .arg("-x")
        .write_stdin("1\n1h\n\nn\nn\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("execution failed"));
}

#[test]
fn cancelled_picker_reports_no_selection() {
    let bin = TempDir::new().unwrap();
    // Enough labels to overrun the pipe buffer, so the picker exits with
    // its input still unread.
    install_script(
        bin.path(),
        "logcli",
        "#!/bin/sh\n[ \"$1\" = \"labels\" ] || exit 1\nseq -f 'label%g' 20000\n",
    );
    install_script(bin.path(), "fzf", "#!/bin/sh\nexit 130\n");

    lokq(bin.path())
        .write_stdin("1\n1h\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("no selection made"));
}

#[test]
fn failing_logcli_is_reported() {
    let bin = TempDir::new().unwrap();
    install_script(bin.path(), "logcli", "#!/bin/sh\necho 'boom' >&2\nexit 1\n");
    install_script(bin.path(), "fzf", FAKE_FZF);

    lokq(bin.path())
        .write_stdin("1\n1h\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("provider failed"));
}
