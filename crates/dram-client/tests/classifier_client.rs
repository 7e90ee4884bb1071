//! Classifier client integration tests against a mocked endpoint.

use dram_client::{ClassifierClient, ClassifierConfig, ClientError, ImageUpload};
use serde_json::json;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ClassifierClient {
    ClassifierClient::new(ClassifierConfig {
        endpoint: format!("{}/api/search", server.uri()),
        timeout: None,
    })
    .unwrap()
}

fn upload() -> ImageUpload {
    ImageUpload::png(b"\x89PNG\r\n\x1a\nfake-png-body".to_vec())
}

/// Posts a single multipart `image` part and decodes the ranked matches.
#[tokio::test]
async fn test_classify_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "whiskyName": "Lagavulin 16",
                "score": 0.97,
                "spiritType": "Single Malt Scotch",
                "abv": 43,
                "proof": 86,
                "size": "750ml",
                "shelfPrice": 99.99,
                "popularityScore": 88
            },
            {"whiskyName": "Laphroaig 10", "score": 0.91},
            {"whiskyName": "Ardbeg 10", "score": 0.9}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).classify(upload()).await.unwrap();

    assert_eq!(result.primary().whisky_name, "Lagavulin 16");
    assert_eq!(result.primary().confidence_percent(), Some(97));
    assert_eq!(result.similar_names(), vec!["Laphroaig 10", "Ardbeg 10"]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body).to_lowercase();
    assert!(body.contains("name=\"image\""));
    assert!(body.contains("filename=\"upload.png\""));
    assert!(body.contains("content-type: image/png"));
    assert!(body.contains("fake-png-body"));
}

/// Error bodies from the service are surfaced with their status.
#[tokio::test]
async fn test_classify_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": "Service unavailable: loading"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).classify(upload()).await.unwrap_err();
    match err {
        ClientError::RequestFailed { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service unavailable: loading");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// A plain-text error body is kept verbatim.
#[tokio::test]
async fn test_classify_plain_text_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).classify(upload()).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::RequestFailed { status: 500, ref message } if message == "boom"
    ));
}

#[tokio::test]
async fn test_classify_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client_for(&server).classify(upload()).await.unwrap_err();
    assert!(matches!(err, ClientError::EmptyResponse));
}

#[tokio::test]
async fn test_classify_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).classify(upload()).await.unwrap_err();
    assert!(matches!(err, ClientError::Json(_)));
}

/// Connection failures are reported once, without retrying.
#[tokio::test]
async fn test_classify_network_failure() {
    // MockServer ports are pooled and stay open after drop, so take a port
    // from a plain listener and close it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let endpoint = format!("http://127.0.0.1:{}/api/search", port);

    let client = ClassifierClient::new(ClassifierConfig {
        endpoint,
        timeout: None,
    })
    .unwrap();

    let err = client.classify(upload()).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.kind(), "network");
}
