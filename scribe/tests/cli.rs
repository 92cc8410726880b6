use std::time::Duration;

use assert_cmd::Command;
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;

fn scribe() -> Command {
    let mut cmd = Command::cargo_bin("scribe").unwrap();
    cmd.current_dir(std::env::temp_dir())
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GEMINI_BASE_URL")
        .env_remove("GEMINI_MODEL")
        .env_remove("GEMINI_MODEL_PREFERENCES")
        .env_remove("SCRIBE_ADDR");
    cmd
}

#[test]
fn binary_runs() {
    scribe().arg("--help").assert().success();
}

#[test]
fn missing_credential_fails_at_startup() {
    let output = scribe().args(["generate", "--notes", "-"]).write_stdin("notes").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GEMINI_API_KEY"), "{stderr}");
}

#[test]
fn generate_prints_draft_from_backend() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1beta/models");
        then.status(200).json_body(json!({
            "models": [{"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"]}]
        }));
    });
    let generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.5-flash:generateContent")
            .header("x-goog-api-key", "test-key");
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": [{"text": "Patient treated for UTI..."}]}}]
        }));
    });

    let output = scribe()
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.base_url())
        .args(["generate", "-t", "discharge-summary", "-d", "standard"])
        .write_stdin("01/02 admitted UTI. IV antibiotics. 05/02 discharged.")
        .output()
        .unwrap();

    generate.assert();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Patient treated for UTI...");
}

#[test]
fn empty_notes_exit_with_warning() {
    let server = MockServer::start();
    let generate = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });

    let output = scribe()
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.base_url())
        .args(["generate"])
        .write_stdin("   ")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid parameters"));
    generate.assert_hits(0);
}

#[test]
fn dotenv_feeds_command_line_defaults() {
    let dir = std::env::temp_dir().join(format!("scribe-env-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(".env"), "GEMINI_API_KEY=k\nSCRIBE_ADDR=not-an-address\n").unwrap();

    let output = scribe()
        .current_dir(&dir)
        .arg("serve")
        .timeout(Duration::from_secs(10))
        .output()
        .unwrap();

    std::fs::remove_dir_all(&dir).unwrap();
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("invalid socket address"),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
