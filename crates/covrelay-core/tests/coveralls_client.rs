//! Integration tests for the Coveralls HTTP client.
//!
//! A one-shot HTTP responder on a local port plays the Coveralls API.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use covrelay_core::config::HostConfig;
use covrelay_core::coveralls::CoverallsClient;
use covrelay_core::reporter::{CoverallsReporter, ExitReport};
use covrelay_core::trace::{LocatorConfig, MergedTrace, TraceFile};
use covrelay_core::upload::{CoverageService, UploadOutcome};

/// Accept one request, answer with `status` and `body`, return the raw request.
async fn one_shot_server(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {} OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (endpoint, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn client(endpoint: &str, cwd: &Path) -> CoverallsClient {
    let env: HashMap<String, String> = [
        ("COVERALLS_REPO_TOKEN", "env-token"),
        ("COVERALLS_SERVICE_NAME", "local"),
        ("COVERALLS_GIT_COMMIT", "0123abcd"),
        ("COVERALLS_RUN_AT", "2024-05-01T10:00:00Z"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    CoverallsClient::new()
        .with_endpoint(endpoint)
        .with_cwd(cwd)
        .with_env(env)
}

#[tokio::test]
async fn test_base_options_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let client = client("http://unused", dir.path());

    let options = client.base_options().await.unwrap();
    assert_eq!(options.repo_token.as_deref(), Some("env-token"));
    assert_eq!(options.service_name.as_deref(), Some("local"));
    assert_eq!(options.git.unwrap().head.id, "0123abcd");
    assert_eq!(
        options.run_at.unwrap().to_rfc3339(),
        "2024-05-01T10:00:00+00:00"
    );
    assert!(!options.parallel);
    assert_eq!(options.filepath, None);
}

#[tokio::test]
async fn test_send_posts_form_encoded_job() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.js"), "one();\ntwo();\n").unwrap();

    let (endpoint, server) =
        one_shot_server(200, r#"{"message":"Job #7","url":"https://coveralls.io/jobs/7"}"#).await;
    let client = client(&endpoint, dir.path());

    let trace = MergedTrace::from_files(vec![TraceFile {
        path: dir.path().join("lcov.info"),
        contents: "SF:app.js\nDA:1,1\nDA:2,0\nend_of_record\n".to_string(),
    }])
    .unwrap();

    let mut options = client.base_options().await.unwrap();
    options.filepath = Some(".".to_string());
    let job = client.convert_trace(&trace, &options).await.unwrap();
    assert_eq!(job.source_files.len(), 1);
    assert_eq!(job.source_files[0].name, "app.js");
    assert_eq!(job.source_files[0].coverage, vec![Some(1), Some(0)]);

    let response = client.send(job).await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("POST /api/v1/jobs HTTP/1.1"));
    assert!(request
        .to_ascii_lowercase()
        .contains("content-type: application/x-www-form-urlencoded"));
    assert!(request.contains("\r\n\r\njson="));

    let outcome = UploadOutcome::classify(Ok(response));
    assert_eq!(
        outcome,
        UploadOutcome::Delivered {
            status: 200,
            confirmation: "Job #7 (https://coveralls.io/jobs/7)".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let client = client(&endpoint, dir.path());
    let trace = MergedTrace::from_files(vec![TraceFile {
        path: dir.path().join("lcov.info"),
        contents: "TN:\nend_of_record\n".to_string(),
    }])
    .unwrap();

    let options = client.base_options().await.unwrap();
    let job = client.convert_trace(&trace, &options).await.unwrap();
    let err = client.send(job).await.unwrap_err();
    assert!(err.starts_with("HTTP request failed"));
}

#[tokio::test]
async fn test_reporter_end_to_end_against_stub() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("coverage/Chrome")).unwrap();
    std::fs::write(
        dir.path().join("coverage/Chrome/lcov.info"),
        "TN:\nSF:src/a.js\nDA:1,2\nend_of_record\n",
    )
    .unwrap();

    let (endpoint, server) = one_shot_server(200, "<html>maintenance</html>").await;

    let host: HostConfig = serde_json::from_value(serde_json::json!({
        "reporters": ["coverage", "coveralls"],
        "basePath": dir.path(),
        "coverageReporter": { "type": "lcov", "dir": "coverage" }
    }))
    .unwrap();

    let reporter = CoverallsReporter::with_cwd(&host, dir.path(), client(&endpoint, dir.path()))
        .unwrap()
        .with_locator_config(LocatorConfig {
            retry_delay: Duration::from_millis(5),
            ..LocatorConfig::default()
        });

    let report = reporter.run_exit_sequence().await.unwrap();
    server.await.unwrap();

    match report {
        ExitReport::Uploaded { outcome, sources } => {
            assert_eq!(sources.len(), 1);
            assert!(matches!(
                outcome,
                UploadOutcome::DeliveredUnparsed { status: 200, .. }
            ));
        }
        other => panic!("unexpected report: {other:?}"),
    }
}
