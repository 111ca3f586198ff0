//! End-to-end CLI tests for threadline.
//!
//! These tests run the actual binary against message files in a temporary
//! directory and check what it prints and writes.
//!
//! # Test Categories
//!
//! - **Commands**: threads, responses, duplicates, search, merge, add-rule
//! - **Output formats**: CSV, JSON, JSONL to stdout and to files
//! - **Options**: rules, timeout, minimum length, filters
//! - **Error handling**: Proper error messages for bad input
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

const ME: &str = "+15550000000";

// ============================================================================
// Test Fixtures
// ============================================================================

/// Creates a temporary directory with message and rule files.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    let jsonl = r#"{"timestamp":"2024-03-01T09:00:00Z","direction":"received","from":{"name":"Mike","phone":"5551234567"},"to":{"name":"Me","phone":"+15550000000"},"body":"hi"}
{"timestamp":"2024-03-01T09:05:00Z","direction":"sent","from":{"name":"Me","phone":"+15550000000"},"to":{"name":"Michael Smith","phone":"+15551234567"},"body":"hey"}
{"timestamp":"2024-03-01T09:15:00Z","direction":"received","from":{"name":"Michael Smith","phone":"+15551234567"},"to":{"name":"Me","phone":"+15550000000"},"body":"you there?"}
{"timestamp":"2024-03-02T18:00:00Z","direction":"received","from":{"name":"Dana","phone":"+15559876543"},"to":{"name":"Me","phone":"+15550000000"},"body":"dinner?"}
{"timestamp":"2024-03-02T18:01:00Z","direction":"sent","from":{"name":"Me","phone":"+15550000000"},"to":{"name":"Dana","phone":"+15559876543"},"body":"yes; 7pm \"sharp\""}
"#;
    fs::write(dir.path().join("sms.jsonl"), jsonl).unwrap();

    let csv = "timestamp,direction,from_name,from_phone,to_name,to_phone,body
2024-03-01T09:00:00Z,received,Mike,5551234567,Me,+15550000000,hi
2024-03-01T09:05:00Z,sent,Me,+15550000000,Michael Smith,+15551234567,hey
";
    fs::write(dir.path().join("sms.csv"), csv).unwrap();

    let rules = r#"[
  {
    "source": {"name": "Mike", "phone": "5551234567"},
    "target": {"name": "Michael Smith", "phone": "+15551234567"},
    "result": {"name": "Michael Smith", "phone": "+15551234567"}
  }
]"#;
    fs::write(dir.path().join("rules.json"), rules).unwrap();

    fs::write(dir.path().join("empty.jsonl"), "").unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    dir
}

fn threadline_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_threadline"));
    Command::from_std(cmd)
}

fn fixture(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

fn output_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[test]
    fn test_threads_to_stdout() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args(["threads", &fixture(&fixtures, "sms.jsonl"), "--me", ME])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"contact_name\": \"Dana\""))
            .stdout(predicate::str::contains("\"contact_name\": \"Michael Smith\""))
            // Mike has a single message, below the default minimum of 2
            .stdout(predicate::str::contains("\"contact_name\": \"Mike\"").not());
    }

    #[test]
    fn test_threads_with_rules_join_contacts() {
        let fixtures = setup_fixtures();

        let output = threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.jsonl"),
                "--me",
                ME,
                "--rules",
                &fixture(&fixtures, "rules.json"),
                "-f",
                "jsonl",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let stdout = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["contact_name"], "Michael Smith");
        assert_eq!(first["messages"], 3);
        assert_eq!(first["start"], "2024-03-01T09:00:00Z");
    }

    #[test]
    fn test_threads_timeout_splits() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.jsonl"),
                "--me",
                ME,
                "--rules",
                &fixture(&fixtures, "rules.json"),
                "--timeout",
                "6m",
                "--min-length",
                "1",
                "-f",
                "csv",
            ])
            .assert()
            .success()
            // Michael: 09:00+09:05, then 09:15 alone; Dana: one thread
            .stdout(predicate::str::contains("Michael Smith").count(2))
            .stdout(predicate::str::contains("Dana").count(1));
    }

    #[test]
    fn test_thread_stats_document() {
        let fixtures = setup_fixtures();

        let output = threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.jsonl"),
                "--me",
                ME,
                "--stats",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(stats["total_threads"], 2);
        assert_eq!(stats["total_messages"], 4);
        assert_eq!(stats["threads_per_contact"]["Dana|+15559876543"], 1);
    }

    #[test]
    fn test_thread_stats_csv() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.jsonl"),
                "--me",
                ME,
                "--stats",
                "-f",
                "csv",
            ])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("contact;threads"))
            .stdout(predicate::str::contains("Dana|+15559876543;1"));
    }

    #[test]
    fn test_responses() {
        let fixtures = setup_fixtures();

        let output = threadline_cmd()
            .args(["responses", &fixture(&fixtures, "sms.jsonl"), "--me", ME])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let rows: Vec<serde_json::Value> = serde_json::from_slice(&output).unwrap();
        let dana = rows
            .iter()
            .find(|r| r["contact_name"] == "Dana")
            .expect("Dana row");
        assert_eq!(dana["our_count"], 1);
        assert_eq!(dana["our_average_secs"], 60.0);
        assert_eq!(dana["their_count"], 0);
    }

    #[test]
    fn test_duplicates() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args(["duplicates", &fixture(&fixtures, "sms.jsonl"), "--me", ME])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"5551234567\""))
            .stdout(predicate::str::contains("\"+15551234567\""))
            .stdout(predicate::str::contains("Dana").not());
    }

    #[test]
    fn test_duplicates_resolved_by_rules() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "duplicates",
                &fixture(&fixtures, "sms.jsonl"),
                "--me",
                ME,
                "--rules",
                &fixture(&fixtures, "rules.json"),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn test_search() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args(["search", &fixture(&fixtures, "sms.jsonl"), "dana", "--me", ME])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"name\": \"Dana\""))
            .stdout(predicate::str::contains("\"score\": 1000"))
            .stdout(predicate::str::contains("Michael").not());
    }

    #[test]
    fn test_merge_writes_file() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "merged.jsonl");

        threadline_cmd()
            .args([
                "merge",
                &fixture(&fixtures, "sms.jsonl"),
                "--rules",
                &fixture(&fixtures, "rules.json"),
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Done"))
            .stdout(predicate::str::contains("5 messages"));

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 5);
        assert!(!content.contains("\"Mike\""));
        assert!(content.contains("Michael Smith"));
    }

    #[test]
    fn test_merge_output_feeds_other_commands() {
        let fixtures = setup_fixtures();

        for name in ["merged.jsonl", "merged.json", "merged.csv"] {
            let merged = output_path(&fixtures, name);

            threadline_cmd()
                .args([
                    "merge",
                    &fixture(&fixtures, "sms.jsonl"),
                    "--rules",
                    &fixture(&fixtures, "rules.json"),
                    "-o",
                    merged.to_str().unwrap(),
                ])
                .assert()
                .success();

            threadline_cmd()
                .args(["threads", merged.to_str().unwrap(), "--me", ME, "-f", "jsonl"])
                .assert()
                .success()
                .stdout(predicate::str::contains(
                    "\"contact_name\":\"Michael Smith\"",
                ))
                .stdout(predicate::str::contains("\"messages\":3"));
        }
    }

    #[test]
    fn test_merge_keeps_subsecond_timestamps() {
        let fixtures = setup_fixtures();
        let input = output_path(&fixtures, "precise.jsonl");
        fs::write(
            &input,
            r#"{"timestamp":"2024-03-01T09:00:00.500Z","direction":"received","from":{"name":"Dana","phone":"+15559876543"},"to":{"name":"Me","phone":"+15550000000"},"body":"hi"}
"#,
        )
        .unwrap();

        for format in ["csv", "jsonl"] {
            threadline_cmd()
                .args(["merge", input.to_str().unwrap(), "--me", ME, "-f", format])
                .assert()
                .success()
                .stdout(predicate::str::contains("2024-03-01T09:00:00.500Z"));
        }
    }

    #[test]
    fn test_add_rule_creates_and_appends() {
        let fixtures = setup_fixtures();
        let rules = output_path(&fixtures, "new_rules.json");

        for _ in 0..2 {
            threadline_cmd()
                .args([
                    "add-rule",
                    "--rules",
                    rules.to_str().unwrap(),
                    "Mike|5551234567",
                    "Michael Smith|+15551234567",
                    "Michael Smith|+15551234567",
                ])
                .assert()
                .success()
                .stdout(predicate::str::contains("Saved"));
        }

        let content = fs::read_to_string(&rules).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["source"]["phone"], "5551234567");
        assert_eq!(parsed[0]["result"]["name"], "Michael Smith");
    }
}

// ============================================================================
// Output Format Tests
// ============================================================================

mod output_formats {
    use super::*;

    #[test]
    fn test_format_from_output_extension() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "threads.csv");

        threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.jsonl"),
                "--me",
                ME,
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Writing CSV"));

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("contact_name;contact_phone;start;end"));
    }

    #[test]
    fn test_extension_added_when_missing() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "report");

        threadline_cmd()
            .args([
                "responses",
                &fixture(&fixtures, "sms.jsonl"),
                "--me",
                ME,
                "-f",
                "jsonl",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        assert!(output_path(&fixtures, "report.jsonl").exists());
    }

    #[test]
    fn test_csv_escaping() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "merge",
                &fixture(&fixtures, "sms.jsonl"),
                "-f",
                "csv",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"yes; 7pm \"\"sharp\"\"\""));
    }

    #[test]
    fn test_csv_input() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.csv"),
                "--me",
                ME,
                "--rules",
                &fixture(&fixtures, "rules.json"),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"messages\": 2"));
    }

    #[test]
    fn test_ndjson_alias() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "search",
                &fixture(&fixtures, "sms.jsonl"),
                "555",
                "--me",
                ME,
                "--format",
                "ndjson",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"score\""));
    }
}

// ============================================================================
// Filter Tests
// ============================================================================

mod filters {
    use super::*;

    #[test]
    fn test_filter_after_date() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "merge",
                &fixture(&fixtures, "sms.jsonl"),
                "--after",
                "2024-03-02",
                "-f",
                "jsonl",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("dinner?"))
            .stdout(predicate::str::contains("you there?").not());
    }

    #[test]
    fn test_filter_by_contact() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "merge",
                &fixture(&fixtures, "sms.jsonl"),
                "--contact",
                "dana",
                "-f",
                "jsonl",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Michael").not())
            .stdout(predicate::str::contains("Dana"));
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_nonexistent_file() {
        threadline_cmd()
            .args(["threads", "/nonexistent/sms.jsonl", "--me", ME])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_invalid_json() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args(["threads", &fixture(&fixtures, "broken.json"), "--me", ME])
            .assert()
            .failure()
            .stderr(predicate::str::contains("❌ Error"));
    }

    #[test]
    fn test_invalid_timeout() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.jsonl"),
                "--timeout",
                "soon",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("soon"));
    }

    #[test]
    fn test_invalid_date() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "merge",
                &fixture(&fixtures, "sms.jsonl"),
                "--after",
                "yesterday",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_unknown_input_extension() {
        let fixtures = setup_fixtures();
        let input = output_path(&fixtures, "sms.txt");
        fs::write(&input, "hello").unwrap();

        threadline_cmd()
            .args(["threads", input.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_add_rule_rejects_malformed_identity() {
        let fixtures = setup_fixtures();
        let rules = output_path(&fixtures, "rules_bad.json");

        threadline_cmd()
            .args([
                "add-rule",
                "--rules",
                rules.to_str().unwrap(),
                "Mike",
                "Michael|+1555",
                "Michael|+1555",
            ])
            .assert()
            .failure();

        assert!(!rules.exists());
    }

    #[test]
    fn test_missing_input_argument() {
        threadline_cmd().arg("threads").assert().failure();
    }

    #[test]
    fn test_invalid_format_option() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args([
                "threads",
                &fixture(&fixtures, "sms.jsonl"),
                "--format",
                "xml",
            ])
            .assert()
            .failure();
    }
}

// ============================================================================
// Edge Cases
// ============================================================================

mod edge_cases {
    use super::*;

    #[test]
    fn test_empty_input() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args(["threads", &fixture(&fixtures, "empty.jsonl"), "--me", ME])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn test_missing_me_warns() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args(["responses", &fixture(&fixtures, "sms.jsonl")])
            .assert()
            .success()
            .stderr(predicate::str::contains("--me"));
    }

    #[test]
    fn test_verbose_logging() {
        let fixtures = setup_fixtures();

        threadline_cmd()
            .args(["-v", "threads", &fixture(&fixtures, "sms.jsonl"), "--me", ME])
            .assert()
            .success()
            .stderr(predicate::str::contains("segmented"));
    }
}
