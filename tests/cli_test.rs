use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo_bin!("skyfare"))
}

#[test]
fn top_level_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Search and compare flights from the terminal",
        ))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("recent"))
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("skyfare search -f JFK -t LHR"));
}

#[test]
fn top_level_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skyfare 0.2.1"));
}

#[test]
fn search_help_shows_all_flags() {
    cmd()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-f, --from <IATA>"))
        .stdout(predicate::str::contains("-t, --to <IATA>"))
        .stdout(predicate::str::contains("-d, --date <YYYY-MM-DD>"))
        .stdout(predicate::str::contains("--return-date <YYYY-MM-DD>"))
        .stdout(predicate::str::contains("-p, --passengers <N>"))
        .stdout(predicate::str::contains("--cabin <CLASS>"))
        .stdout(predicate::str::contains("--currency <CODE>"))
        .stdout(predicate::str::contains("--from-url <URL>"))
        .stdout(predicate::str::contains("--max-price <N>"))
        .stdout(predicate::str::contains("--max-stops <N>"))
        .stdout(predicate::str::contains("--airlines <NAME,NAME,...>"))
        .stdout(predicate::str::contains("--sort <KEY>"))
        .stdout(predicate::str::contains("--top <N>"))
        .stdout(predicate::str::contains("--compact"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--pretty"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--serp"))
        .stdout(predicate::str::contains("--api-key <KEY>"))
        .stdout(predicate::str::contains("--proxy <URL>"))
        .stdout(predicate::str::contains("--timeout <SECS>"))
        .stdout(predicate::str::contains("--no-history"));
}

#[test]
fn search_help_shows_defaults() {
    cmd()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: economy]"))
        .stdout(predicate::str::contains("[default: USD]"))
        .stdout(predicate::str::contains("[default: price]"))
        .stdout(predicate::str::contains("[default: 1]"))
        .stdout(predicate::str::contains("[default: 30]"));
}

#[test]
fn recent_help_shows_clear_flag() {
    cmd()
        .args(["recent", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--clear"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn missing_from_is_a_usage_error() {
    cmd()
        .args(["search", "-t", "LHR", "-d", "2026-04-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--from is required"));
}

#[test]
fn invalid_airport_is_rejected() {
    cmd()
        .args(["search", "-f", "JFKX", "-t", "LHR", "-d", "2026-04-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid airport code"));
}

#[test]
fn invalid_date_is_rejected() {
    cmd()
        .args(["search", "-f", "JFK", "-t", "LHR", "-d", "2026-13-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn invalid_cabin_is_rejected() {
    cmd()
        .args([
            "search", "-f", "JFK", "-t", "LHR", "-d", "2026-04-01", "--cabin", "coach",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid cabin class"));
}

#[test]
fn invalid_sort_key_is_rejected() {
    cmd()
        .args([
            "search", "-f", "JFK", "-t", "LHR", "-d", "2026-04-01", "--sort", "altitude",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid sort key"));
}

#[test]
fn json_mode_reports_errors_as_json() {
    cmd()
        .args([
            "search", "-f", "JFK", "-t", "LHR", "-d", "2026-04-01", "-p", "0", "--json",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"kind\":\"validation_error\""));
}

#[test]
fn serp_without_key_is_rejected() {
    cmd()
        .env_remove("SERPAPI_KEY")
        .args(["search", "-f", "JFK", "-t", "LHR", "-d", "2026-04-01", "--serp"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires an API key"));
}

#[test]
fn url_flag_prints_a_deep_link() {
    cmd()
        .args(["search", "-f", "JFK", "-t", "LHR", "-d", "2026-04-01", "--url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://skyfare.app/search?"))
        .stdout(predicate::str::contains("origin=JFK"))
        .stdout(predicate::str::contains("destination=LHR"))
        .stdout(predicate::str::contains("returnDate="));
}

#[test]
fn search_returns_flights_as_json() {
    let output = cmd()
        .args([
            "search",
            "-f",
            "JFK",
            "-t",
            "LHR",
            "-d",
            "2026-04-01",
            "--json",
            "--no-history",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(parsed["params"]["origin"], "JFK");
    let flights = parsed["flights"].as_array().unwrap();
    assert_eq!(flights.len(), 10);
    assert_eq!(flights[0]["origin"], "JFK");
    assert_eq!(flights[0]["destination"], "LHR");
}

#[test]
fn top_limits_the_result_count() {
    let output = cmd()
        .args([
            "search",
            "-f",
            "JFK",
            "-t",
            "LHR",
            "-d",
            "2026-04-01",
            "--json",
            "--no-history",
            "--top",
            "3",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["flights"].as_array().unwrap().len(), 3);
}

#[test]
fn compact_output_is_one_line_per_flight() {
    let output = cmd()
        .args([
            "search",
            "-f",
            "JFK",
            "-t",
            "LHR",
            "-d",
            "2026-04-01",
            "--compact",
            "--no-history",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("JFK>LHR"));

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    assert_eq!(stdout.lines().count(), 10);
}
