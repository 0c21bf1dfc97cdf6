use glean_http::{HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_text_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/politics"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/politics", server.uri())).unwrap();
    let body = client.get_text("", RequestOpts::default()).await.unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn get_json_sends_query_pairs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kbyg/mapview"))
        .and(query_param("south", "33.1"))
        .and(query_param("name", "Trestles North"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": { "spots": [] } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/kbyg/mapview", server.uri())).unwrap();
    let opts = RequestOpts {
        query: Some(vec![
            ("south", Cow::Borrowed("33.1")),
            ("name", Cow::Borrowed("Trestles North")),
        ]),
        ..Default::default()
    };
    let body: serde_json::Value = client.get_json("", opts).await.unwrap();
    assert_eq!(body["data"]["spots"], serde_json::json!([]));
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("x-request-id", "abc-123")
                .set_body_json(serde_json::json!({ "message": "maintenance" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_text("anything", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status,
            message,
            request_id,
        } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "maintenance");
            assert_eq!(request_id, "abc-123");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client.get_text("", RequestOpts::default()).await.unwrap_err();
    assert!(
        matches!(err, HttpError::Timeout { timeout_ms: 100, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn invalid_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<serde_json::Value>("", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_, ref snippet) if snippet == "not json"));
}
