// tests/publish_test.rs
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use gitflow_release::config::GithubConfig;
use gitflow_release::publish::{GithubReleaseClient, ReleasePublisher};
use gitflow_release::GitflowError;

struct CapturedRequest {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

/// Serve exactly one request with `status` and `body`, handing back what was received
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            headers.push(line);
        }

        let mut body_bytes = vec![0; content_length];
        reader.read_exact(&mut body_bytes).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();

        sender
            .send(CapturedRequest {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(body_bytes).unwrap(),
            })
            .unwrap();
    });

    (url, receiver)
}

fn github_config(api_url: String) -> GithubConfig {
    GithubConfig {
        repository: Some("owner/repo".to_string()),
        api_url,
        token: Some("secret-token".to_string()),
    }
}

#[test]
fn test_create_release_posts_tag() {
    let (url, received) = serve_once("201 Created", "{\"id\": 1}");
    let client = GithubReleaseClient::new(&github_config(url)).unwrap();

    client.create_release("v1.0.0").unwrap();

    let request = received.recv().unwrap();
    assert_eq!(request.request_line, "POST /repos/owner/repo/releases HTTP/1.1");
    assert!(request
        .headers
        .iter()
        .any(|h| h.eq_ignore_ascii_case("authorization: Bearer secret-token")));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["name"], "v1.0.0");
    assert_eq!(body["tag_name"], "v1.0.0");
    assert_eq!(body["draft"], false);
    assert_eq!(body["prerelease"], false);
    assert_eq!(body["generate_release_notes"], false);
}

#[test]
fn test_non_success_status_is_remote_release_error() {
    let (url, _received) = serve_once(
        "422 Unprocessable Entity",
        "{\"message\": \"Validation Failed\"}",
    );
    let client = GithubReleaseClient::new(&github_config(url)).unwrap();

    let err = client.create_release("v1.0.0").unwrap_err();
    match err {
        GitflowError::RemoteRelease { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("Validation Failed"));
        }
        other => panic!("unexpected error: {}", other),
    }
}
