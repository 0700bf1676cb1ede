use predicates::str::contains;

mod common;
use common::{gat, setup_test_db};

fn init(home: &std::path::Path, db: &str) {
    gat(home)
        .args(["--db", db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));
}

/// Run `link` and pull the token out of stdout.
fn issue_token(home: &std::path::Path, db: &str, event_id: &str) -> String {
    let out = gat(home)
        .args(["--db", db, "link", event_id, "--ttl", "3600"])
        .output()
        .expect("run link");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    stdout
        .lines()
        .find_map(|l| l.strip_prefix("token: "))
        .map(|t| t.trim().to_string())
        .expect("token line in output")
}

#[test]
fn full_check_in_flow() {
    let (dir, db) = setup_test_db("cli_flow");
    let home = dir.path();
    init(home, &db);

    gat(home)
        .args(["--db", &db, "create", "Algorithms 101", "--radius", "50"])
        .assert()
        .success()
        .stdout(contains("Created event 1 'Algorithms 101' (radius 50m)"));

    gat(home)
        .args(["--db", &db, "link", "1"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Precondition failed"));

    gat(home)
        .args([
            "--db", &db, "confirm", "1", "--lat", "37.7749", "--lng", "-122.4194", "--accuracy",
            "10",
        ])
        .assert()
        .success()
        .stdout(contains("Location confirmed for event 1"));

    let token = issue_token(home, &db, "1");
    assert_eq!(token.len(), 43);

    // tokens may start with '-', so they go after `--`
    gat(home)
        .args(["--db", &db, "resolve", "--", &token])
        .assert()
        .success()
        .stdout(contains("Algorithms 101"))
        .stdout(contains("within 50m"));

    gat(home)
        .args([
            "--db", &db, "checkin", "--lat", "37.7750", "--lng", "-122.4194", "--accuracy", "15",
            "--user", "s1", "--student", "S-0001", "--", &token,
        ])
        .assert()
        .success()
        .stdout(contains("You are marked present"))
        .stdout(contains("status: present | distance: 11.12m"));

    gat(home)
        .args([
            "--db", &db, "checkin", "--lat", "37.7750", "--lng", "-122.4194", "--accuracy", "15",
            "--user", "s1", "--", &token,
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("already checked in"));

    gat(home)
        .args([
            "--db", &db, "checkin", "--lat", "37.7750", "--lng", "-122.4194", "--accuracy", "150",
            "--user", "s2", "--", &token,
        ])
        .assert()
        .failure()
        .stderr(contains("GPS accuracy too low (150m)"));

    gat(home)
        .args([
            "--db", &db, "checkin", "--lat", "37.7800", "--lng", "-122.4194", "--accuracy", "8",
            "--user", "s3", "--", &token,
        ])
        .assert()
        .success()
        .stdout(contains("Status: Absent"))
        .stdout(contains("status: absent"));

    gat(home)
        .args(["--db", &db, "list", "1"])
        .assert()
        .success()
        .stdout(contains("Records: 2 | Present: 1"))
        .stdout(contains("S-0001"))
        .stdout(contains("Outside check-in radius"));

    gat(home)
        .args(["--db", &db, "list", "--user", "s1", "--json"])
        .assert()
        .success()
        .stdout(contains("\"status\": \"present\""))
        .stdout(contains("\"student_number\": \"S-0001\""));

    gat(home)
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("checkin"))
        .stdout(contains("issue_link"));
}

#[test]
fn bad_inputs_fail_cleanly() {
    let (dir, db) = setup_test_db("cli_bad_inputs");
    let home = dir.path();
    init(home, &db);

    gat(home)
        .args(["--db", &db, "create", "Tiny", "--radius", "5"])
        .assert()
        .failure()
        .stderr(contains("Invalid radius 5m"));

    gat(home)
        .args(["--db", &db, "resolve", "no-such-token"])
        .assert()
        .failure()
        .stderr(contains("Invalid or unknown attendance link"));

    gat(home)
        .args(["--db", &db, "show", "42"])
        .assert()
        .failure()
        .stderr(contains("Event 42 not found"));

    gat(home)
        .args([
            "--db", &db, "checkin", "--event", "1", "--lat", "95", "--lng", "0", "--accuracy", "5",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid coordinate"));

    gat(home)
        .args([
            "--db", &db, "checkin", "--event", "1", "--lat", "0", "--lng", "0", "--accuracy", "5",
            "--user", "",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid identity"));

    // --student without --user is rejected by the parser
    gat(home)
        .args([
            "--db", &db, "checkin", "--event", "1", "--lat", "0", "--lng", "0", "--accuracy", "5",
            "--student", "S-9",
        ])
        .assert()
        .failure();
}

#[test]
fn check_in_by_event_id() {
    let (dir, db) = setup_test_db("cli_by_event");
    let home = dir.path();
    init(home, &db);

    gat(home)
        .args(["--db", &db, "create", "Seminar"])
        .assert()
        .success()
        .stdout(contains("(radius 50m)"));
    gat(home)
        .args(["--db", &db, "confirm", "1", "--lat", "-33.8568", "--lng", "151.2153", "--accuracy", "4"])
        .assert()
        .success();
    issue_token(home, &db, "1");

    gat(home)
        .args([
            "--db", &db, "checkin", "--event", "1", "--lat", "-33.8568", "--lng", "151.2153",
            "--accuracy", "4",
        ])
        .assert()
        .success()
        .stdout(contains("status: present | distance: 0.00m"));

    gat(home)
        .args(["--db", &db, "show", "1"])
        .assert()
        .success()
        .stdout(contains("Location : -33.8568, 151.2153"))
        .stdout(contains("active"));

    gat(home)
        .args(["--db", &db, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("20250912_0001_create_events"));
}

#[test]
fn config_print_shows_defaults() {
    let (dir, _db) = setup_test_db("cli_config");
    gat(dir.path())
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("default_radius_m: 50"))
        .stdout(contains("link_ttl_hours: 24"));
}
